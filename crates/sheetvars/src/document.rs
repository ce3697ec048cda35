//! one conversion run
//!
//! [VarsDocument] is the single aggregation object of a run: an ordered
//! mapping from top-level attribute names to trees. Nothing survives between
//! runs; [build] takes loaded sheets and returns the document together with
//! the diverted policy payloads and the issues found on the way.
//!
//! Grouping happens here, not in the tree builder: each sheet becomes a
//! top-level `<mapped-sheet-name>_list` map keyed by resource name, and
//! common-workbook pairs become top-level scalars. The tree builder itself
//! only ever sees a name and a path.
use crate::path;
use crate::render;
use crate::tree::Node;
use crate::value::Scalar;
use crate::workbook::{CommonParameters, ParameterSheets, RowRecord};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

/// Rows addressing this path carry a JSON payload instead of a tree value
pub const POLICY_PATH: &str = "policy";

/// Ordered top-level attributes of one tfvars document
#[derive(Debug, Default)]
pub struct VarsDocument {
    entries: IndexMap<String, Node>,
}

impl VarsDocument {
    /// Set a top-level scalar attribute.
    pub fn set(&mut self, key: &str, value: Scalar) {
        self.entries.insert(sanitize(key), Node::Scalar(value));
    }

    /// Ensure a top-level tree, creating an empty map on first reference.
    pub fn tree_mut(&mut self, name: &str) -> &mut Node {
        let node = self.entries.entry(sanitize(name)).or_default();
        if !matches!(node, Node::Map(_)) {
            tracing::warn!(name, "top-level tree overwrites a non-map value");
            *node = Node::default();
        }
        node
    }

    pub fn entries(&self) -> &IndexMap<String, Node> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the document as tfvars text.
    pub fn to_hcl(&self) -> String {
        render::document(&self.entries)
    }
}

impl serde::ser::Serialize for VarsDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut ser = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            ser.serialize_entry(key, node)?;
        }
        ser.end()
    }
}

/// Normalize an arbitrary name into a valid HCL identifier.
fn sanitize(name: &str) -> String {
    hcl::Identifier::sanitized(name.trim()).to_string()
}

/// Sheet-name to resource-type-name mapping, loaded from a JSON object
#[derive(Debug, Default)]
pub struct SheetNameMap(HashMap<String, String>);

impl SheetNameMap {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self(serde_json::from_str(&text)?))
    }

    pub fn resolve<'a>(&'a self, sheet: &'a str) -> &'a str {
        self.0.get(sheet).map(String::as_str).unwrap_or(sheet)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for SheetNameMap {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(sheet, exact)| (sheet.to_string(), exact.to_string()))
                .collect(),
        )
    }
}

/// JSON payload diverted from a `policy` row
#[derive(Debug, PartialEq)]
pub struct PolicyDocument {
    pub workbook: String,
    pub resource: String,
    pub body: serde_json::Value,
}

/// Non-fatal problems found during a run; none of these abort the build
#[derive(Debug, PartialEq)]
pub enum Issue {
    MissingColumns {
        workbook: String,
        sheet: String,
        missing: Vec<&'static str>,
    },
    EmptyPath {
        resource: String,
        path: String,
    },
    PolicyInvalidJson {
        resource: String,
        error: String,
    },
}

#[derive(derive_new::new, Debug)]
pub struct Issues {
    #[new(default)]
    issues: Vec<Issue>,
}

impl Issues {
    pub fn log(&mut self, issue: Issue) {
        tracing::warn!(?issue, "issue found");
        self.issues.push(issue);
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Everything one build pass produces
#[derive(Debug)]
pub struct Conversion {
    pub document: VarsDocument,
    pub policies: Vec<PolicyDocument>,
    pub issues: Issues,
}

/// Build a tfvars document from loaded parameter sheets.
///
/// Rows are applied in sheet order, then row order within a sheet; identical
/// paths resolve last-write-wins. Common-workbook pairs are applied first so
/// they render ahead of every sheet group.
pub fn build(
    sheets: &ParameterSheets,
    map: &SheetNameMap,
    common: Option<&CommonParameters>,
) -> Conversion {
    let mut document = VarsDocument::default();
    let mut policies = Vec::new();
    let mut issues = Issues::new();

    if let Some(common) = common {
        for (key, value) in common.pairs() {
            document.set(key, value.clone());
        }
    }

    for sheet in sheets.tables() {
        if !sheet.missing_columns().is_empty() {
            issues.log(Issue::MissingColumns {
                workbook: sheet.workbook().to_string(),
                sheet: sheet.name().to_string(),
                missing: sheet.missing_columns().to_vec(),
            });
            continue;
        }

        let top_key = format!("{}_list", sanitize(map.resolve(sheet.name())));
        for row in sheet.rows() {
            apply_row(
                &mut document,
                &mut policies,
                &mut issues,
                &top_key,
                sheet.workbook(),
                row,
            );
        }
    }

    Conversion {
        document,
        policies,
        issues,
    }
}

fn apply_row(
    document: &mut VarsDocument,
    policies: &mut Vec<PolicyDocument>,
    issues: &mut Issues,
    top_key: &str,
    workbook: &str,
    row: &RowRecord,
) {
    let resource = sanitize(row.resource());

    // every resource seen gets an entry, even when all its rows are
    // flagged off; it renders as an empty block
    let tree = document.tree_mut(top_key).entry_map(&resource);

    if row.argument() == POLICY_PATH {
        match serde_json::from_str(&row.value_text()) {
            Ok(body) => policies.push(PolicyDocument {
                workbook: workbook.to_string(),
                resource,
                body,
            }),
            Err(error) => issues.log(Issue::PolicyInvalidJson {
                resource,
                error: error.to_string(),
            }),
        }
        return;
    }

    if !row.flag() {
        return;
    }

    let segments = path::parse(row.argument());
    if segments.is_empty() {
        issues.log(Issue::EmptyPath {
            resource,
            path: row.argument().to_string(),
        });
        return;
    }

    tree.apply(&segments, Scalar::from(row.value()));
}

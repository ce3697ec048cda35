//! parameter workbook loading
//!
//! [ParameterSheets] tracks every sheet of every loaded workbook:
//! - the source path
//! - the workbook stem (used to group policy documents)
//! - the sheet's row records, in file order
//!
//! Sheets missing required header columns are kept but flagged, so the build
//! can report them and continue with the rest of the input.
//!
//! The common workbook (`common.xlsx`) is different: a two-column `key` /
//! `value` table of run-wide parameters. It is loaded separately and never
//! picked up by [ParameterSheets::load_directory].
use crate::value::Scalar;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::{Path, PathBuf};

/// Header columns every parameter sheet must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["resource-name", "arguments", "value", "gen-tfvars-flag"];

/// File name of the run-wide key/value workbook
pub const COMMON_WORKBOOK: &str = "common.xlsx";

#[derive(Default, Debug)]
pub struct ParameterSheets {
    tables: Vec<SheetTable>,
}

impl ParameterSheets {
    /// Inserts a sheet table
    pub fn insert(&mut self, table: SheetTable) {
        self.tables.push(table);
    }

    pub fn tables(&self) -> impl Iterator<Item = &SheetTable> {
        self.tables.iter()
    }

    pub fn load_file(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading workbook");

        let mut workbook: Xlsx<_> = open_workbook(&file_path)?;
        let stem = file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name)?;
            self.insert(SheetTable::from_range(
                stem.clone(),
                sheet_name,
                file_path.clone(),
                &range,
            ));
        }

        Ok(())
    }

    /// Load every `.xlsx` workbook in a directory, in file-name order.
    ///
    /// The common workbook is skipped here; see [load_common].
    pub fn load_directory(&mut self, dir_path: &Path) -> Result<(), LoadError> {
        let mut workbook_paths = Vec::new();

        let read_dir = std::fs::read_dir(dir_path)?;
        for dir_entry in read_dir {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }

            let file_name = dir_entry.file_name().to_string_lossy().to_lowercase();
            if !file_name.ends_with(".xlsx") || file_name == COMMON_WORKBOOK {
                continue;
            }

            workbook_paths.push(dir_entry.path());
        }

        if workbook_paths.is_empty() {
            return Err(LoadError::NoFilesFound);
        }

        // directory iteration order is OS-defined; sort for stable output
        workbook_paths.sort();
        for file_path in &workbook_paths {
            self.load_file(file_path)?;
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("No parameter workbooks found in directory")]
    NoFilesFound,
    #[error("Common workbook has no 'key' and 'value' columns")]
    CommonColumnsMissing,
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to read workbook")]
    XlsxFailed(#[from] calamine::XlsxError),
}

/// One sheet of one workbook, reduced to its row records
#[derive(Debug)]
pub struct SheetTable {
    workbook: String,
    name: String,
    source: PathBuf,
    missing: Vec<&'static str>,
    rows: Vec<RowRecord>,
}

impl SheetTable {
    pub(crate) fn from_range(
        workbook: String,
        name: String,
        source: PathBuf,
        range: &Range<Data>,
    ) -> Self {
        let mut cell_rows = range.rows();

        let columns = match cell_rows.next().map(Columns::detect) {
            Some(Ok(columns)) => columns,
            Some(Err(missing)) => {
                return Self {
                    workbook,
                    name,
                    source,
                    missing,
                    rows: Vec::new(),
                }
            }
            None => {
                return Self {
                    workbook,
                    name,
                    source,
                    missing: REQUIRED_COLUMNS.to_vec(),
                    rows: Vec::new(),
                }
            }
        };

        let mut rows = Vec::new();
        for cells in cell_rows {
            let resource = cell_text(cells.get(columns.resource));
            if resource.is_empty() {
                continue;
            }

            rows.push(RowRecord::new(
                resource,
                cell_text(cells.get(columns.argument)),
                cells.get(columns.value).cloned().unwrap_or(Data::Empty),
                flag_cell(cells.get(columns.flag)),
            ));
        }

        Self {
            workbook,
            name,
            source,
            missing: Vec::new(),
            rows,
        }
    }

    /// Build a table directly from records, outside any workbook file.
    pub fn from_records(
        workbook: impl Into<String>,
        name: impl Into<String>,
        rows: Vec<RowRecord>,
    ) -> Self {
        Self {
            workbook: workbook.into(),
            name: name.into(),
            source: PathBuf::new(),
            missing: Vec::new(),
            rows,
        }
    }

    pub fn workbook(&self) -> &str {
        &self.workbook
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Required columns the header row lacks; non-empty means the sheet
    /// carries no rows and must be reported
    pub fn missing_columns(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }
}

/// One parameter row: `(resource, path, value, flag)`
#[derive(derive_new::new, Debug)]
pub struct RowRecord {
    resource: String,
    argument: String,
    value: Data,
    flag: bool,
}

impl RowRecord {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    pub fn value(&self) -> &Data {
        &self.value
    }

    pub fn flag(&self) -> bool {
        self.flag
    }

    /// Raw cell text, for payloads that are parsed rather than coerced
    pub fn value_text(&self) -> String {
        match &self.value {
            Data::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    resource: usize,
    argument: usize,
    value: usize,
    flag: usize,
}

impl Columns {
    fn detect(header: &[Data]) -> Result<Self, Vec<&'static str>> {
        let find = |wanted: &str| {
            header
                .iter()
                .position(|cell| cell.to_string().trim() == wanted)
        };

        match (
            find("resource-name"),
            find("arguments"),
            find("value"),
            find("gen-tfvars-flag"),
        ) {
            (Some(resource), Some(argument), Some(value), Some(flag)) => Ok(Self {
                resource,
                argument,
                value,
                flag,
            }),
            (resource, argument, value, flag) => {
                let missing = [resource, argument, value, flag]
                    .iter()
                    .zip(REQUIRED_COLUMNS)
                    .filter(|(position, _)| position.is_none())
                    .map(|(_, column)| column)
                    .collect();
                Err(missing)
            }
        }
    }
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(cell) => cell.to_string().trim().to_string(),
    }
}

/// A flag cell is true as a native boolean or as the text "true".
fn flag_cell(cell: Option<&Data>) -> bool {
    match cell {
        Some(Data::Bool(value)) => *value,
        Some(Data::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Run-wide key/value parameters from the common workbook
#[derive(Debug, Default)]
pub struct CommonParameters {
    pairs: Vec<(String, Scalar)>,
}

impl CommonParameters {
    pub fn from_pairs(pairs: Vec<(String, Scalar)>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(String, Scalar)] {
        &self.pairs
    }

    /// The environment name that routes the run's output
    pub fn env(&self) -> Option<String> {
        self.pairs
            .iter()
            .find(|(key, _)| key == "env")
            .map(|(_, value)| value.to_plain_string())
    }
}

/// Load the common workbook: first sheet, `key` and `value` columns.
pub fn load_common(file_path: &Path) -> Result<CommonParameters, LoadError> {
    let file_path = file_path.canonicalize()?;
    tracing::info!(path=%file_path.display(), "loading common workbook");

    let mut workbook: Xlsx<_> = open_workbook(&file_path)?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(LoadError::CommonColumnsMissing);
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut cell_rows = range.rows();

    let header = cell_rows.next().unwrap_or(&[]);
    let find = |wanted: &str| {
        header
            .iter()
            .position(|cell| cell.to_string().trim() == wanted)
    };
    let (Some(key_column), Some(value_column)) = (find("key"), find("value")) else {
        return Err(LoadError::CommonColumnsMissing);
    };

    let mut pairs = Vec::new();
    for cells in cell_rows {
        let key = cell_text(cells.get(key_column));
        if key.is_empty() {
            continue;
        }
        let value = Scalar::from(cells.get(value_column).unwrap_or(&Data::Empty));
        pairs.push((key, value));
    }

    Ok(CommonParameters { pairs })
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header(names: &[&str]) -> Vec<Data> {
        names
            .iter()
            .map(|name| Data::String(name.to_string()))
            .collect()
    }

    #[test]
    fn columns_found_in_any_order() {
        let cells = header(&["gen-tfvars-flag", "value", "resource-name", "arguments"]);
        let columns = Columns::detect(&cells).expect("all columns present");
        assert_eq!(columns.resource, 2);
        assert_eq!(columns.argument, 3);
        assert_eq!(columns.value, 1);
        assert_eq!(columns.flag, 0);
    }

    #[test]
    fn missing_columns_are_reported_by_name() {
        let cells = header(&["resource-name", "value"]);
        let missing = Columns::detect(&cells).expect_err("columns missing");
        assert_eq!(missing, vec!["arguments", "gen-tfvars-flag"]);
    }

    #[test]
    fn flag_cells_accept_booleans_and_text() {
        assert!(flag_cell(Some(&Data::Bool(true))));
        assert!(flag_cell(Some(&Data::String(" TRUE ".to_string()))));
        assert!(!flag_cell(Some(&Data::String("yes".to_string()))));
        assert!(!flag_cell(Some(&Data::Bool(false))));
        assert!(!flag_cell(Some(&Data::Empty)));
        assert!(!flag_cell(None));
    }

    #[test]
    fn loading_a_missing_directory_fails() {
        let mut sheets = ParameterSheets::default();
        let result = sheets.load_directory(Path::new("does/not/exist"));
        assert!(matches!(result, Err(LoadError::IoError(_))));
    }
}

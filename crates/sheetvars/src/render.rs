//! tfvars rendering
//!
//! Renders finished trees as HCL attribute syntax: `key = value`,
//! `key = { ... }`, `key = [ ... ]`. Rendering is a pure function of the
//! tree; maps keep insertion order, so identical trees produce byte-identical
//! text. Indentation is two spaces per nesting level and carries no meaning.
//!
//! String literals are double-quoted. `${` is escaped to `$${` so the output
//! never contains live interpolation; backslashes and double quotes are
//! escaped so the document always parses.
use crate::tree::Node;
use crate::value::Scalar;
use indexmap::IndexMap;

/// Render all top-level entries as the body of a tfvars document.
pub fn document(entries: &IndexMap<String, Node>) -> String {
    body(entries, 0)
}

fn body(entries: &IndexMap<String, Node>, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let mut lines = Vec::new();

    for (key, node) in entries {
        match node {
            Node::Map(children) if children.is_empty() => {
                lines.push(format!("{pad}{key} = {{}}"));
            }
            Node::Map(children) => {
                lines.push(format!("{pad}{key} = {{"));
                lines.push(body(children, indent + 1));
                lines.push(format!("{pad}}}"));
            }
            Node::List(items) => lines.push(format!("{pad}{key} = {}", list(items, indent))),
            Node::Scalar(value) => lines.push(format!("{pad}{key} = {}", scalar(value))),
            Node::Empty => lines.push(format!("{pad}{key} = {{}}")),
        }
    }

    lines.join("\n")
}

fn list(items: &[Node], indent: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }

    let pad = "  ".repeat(indent);
    let inner = "  ".repeat(indent + 1);
    let mut lines = vec!["[".to_string()];

    for item in items {
        match item {
            Node::Map(children) if children.is_empty() => lines.push(format!("{inner}{{}},")),
            Node::Map(children) => {
                lines.push(format!("{inner}{{"));
                lines.push(body(children, indent + 2));
                lines.push(format!("{inner}}},"));
            }
            Node::List(nested) => lines.push(format!("{inner}{},", list(nested, indent + 1))),
            Node::Scalar(value) => lines.push(format!("{inner}{},", scalar(value))),
            // an unwritten slot renders as an empty block
            Node::Empty => lines.push(format!("{inner}{{}},")),
        }
    }

    lines.push(format!("{pad}]"));
    lines.join("\n")
}

/// One scalar as an HCL literal
fn scalar(value: &Scalar) -> String {
    match value {
        Scalar::Boolean(true) => "true".to_string(),
        Scalar::Boolean(false) => "false".to_string(),
        Scalar::Integer(int) => int.to_string(),
        Scalar::Decimal(dec) => dec.to_string(),
        Scalar::String(text) => format!("\"{}\"", escape(text)),
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("${", "$${")
}

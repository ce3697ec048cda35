//! # sheetvars - parameter sheets to tfvars
//!
//! For a user guide and material related to CLI usage see the README.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `sheetvars` works internally.
//!
//! ### Terms
//!
//! Input is tabular: workbooks of sheets, sheets of rows. One row describes
//! one configuration attribute of one resource:
//!
//! | resource-name | arguments                       | value | gen-tfvars-flag |
//! |---------------|---------------------------------|-------|-----------------|
//! | i1            | tags.Name                       | web   | true            |
//! | i1            | root_block_device[0].volume_size | 20   | true            |
//!
//! - the `arguments` column holds a **path**: dotted, optionally indexed
//!   (`tags.Name`, `root_block_device[0].volume_size`; the dot-index
//!   spelling `root_block_device.0.volume_size` is equivalent)
//! - the `value` cell is **coerced** into one of four scalar kinds
//!   ([value::Scalar])
//! - rows whose flag is not true are never applied
//!
//! ### Loading workbooks
//!
//! [workbook::ParameterSheets] loads every `.xlsx` file of the parameter
//! directory and keeps each sheet's rows together with the source path.
//! Sheets missing required header columns are flagged so the build can
//! report them and continue. The optional common workbook (run-wide
//! key/value pairs, including the `env` output-routing key) loads
//! separately via [workbook::load_common].
//!
//! ### Building
//!
//! see [document::build]
//!
//! One build pass owns one [document::VarsDocument]: an insertion-ordered
//! map of top-level names to trees. Each sheet becomes a
//! `<mapped-sheet-name>_list` group keyed by resource name (sheet names
//! resolve through [document::SheetNameMap] first, then are sanitized into
//! valid HCL identifiers). Every applicable row is decomposed by
//! [path::parse] and applied to the resource's [tree::Node], auto-vivifying
//! intermediate maps and lists; list indices may arrive in any order and
//! unwritten slots stay as [tree::Node::Empty] holes. Rows addressing the
//! `policy` path divert their JSON payload into standalone documents
//! instead. Problems that do not abort the run are collected as
//! [document::Issue]s.
//!
//! ### Output
//!
//! [render::document] walks the finished trees and produces tfvars text:
//! `key = value`, `key = { ... }`, `key = [ ... ]`, deterministic because
//! maps keep insertion order. The binary writes the text (routed into a
//! per-environment directory when the common workbook defines `env`),
//! writes policy documents as pretty-printed JSON, and finally offers the
//! file to `terraform fmt` ([terraform::fmt]) - a formatter failure is only
//! a warning.
pub mod document;
pub mod path;
pub mod render;
pub mod terraform;
pub mod tree;
pub mod value;
pub mod workbook;

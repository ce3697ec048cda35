//! End-to-end conversion tests
//!
//! Rows are fed through the document builder and the rendered tfvars text is
//! pinned with inline snapshots. Every rendered document is also re-parsed
//! as HCL to keep the output grammar honest.

use calamine::Data;
use sheetvars::document::{build, SheetNameMap, VarsDocument};
use sheetvars::path;
use sheetvars::value::Scalar;
use sheetvars::workbook::{ParameterSheets, RowRecord, SheetTable};

fn row(resource: &str, argument: &str, value: &str, flag: bool) -> RowRecord {
    RowRecord::new(
        resource.to_string(),
        argument.to_string(),
        Data::String(value.to_string()),
        flag,
    )
}

fn one_sheet(name: &str, rows: Vec<RowRecord>) -> ParameterSheets {
    let mut sheets = ParameterSheets::default();
    sheets.insert(SheetTable::from_records("ec2", name, rows));
    sheets
}

fn assert_parses(rendered: &str) {
    hcl_edit::parser::parse_body(rendered).expect("rendered tfvars must parse as HCL");
}

#[test]
fn instance_sheet_end_to_end() {
    let sheets = one_sheet(
        "instance",
        vec![
            row("i1", "tags.Name", "web", true),
            row("i1", "root_block_device.0.volume_size", "20", true),
            row("i1", "count", "2", true),
            row("i1", "unused", "x", false),
        ],
    );

    let conversion = build(&sheets, &SheetNameMap::default(), None);
    let rendered = conversion.document.to_hcl();

    insta::assert_snapshot!(rendered, @r###"
    instance_list = {
      i1 = {
        tags = {
          Name = "web"
        }
        root_block_device = [
          {
            volume_size = 20
          },
        ]
        count = 2
      }
    }
    "###);
    assert_parses(&rendered);
    assert!(conversion.issues.is_empty());
}

#[test]
fn flat_grouping_without_the_list_wrapper() {
    // grouping is caller policy; the core renders whatever names it is given
    let mut document = VarsDocument::default();
    let tree = document.tree_mut("i1");
    tree.apply(&path::parse("tags.Name"), Scalar::coerce("web"));
    tree.apply(
        &path::parse("root_block_device[0].volume_size"),
        Scalar::coerce("20"),
    );
    tree.apply(&path::parse("count"), Scalar::coerce("2"));

    let rendered = document.to_hcl();
    insta::assert_snapshot!(rendered, @r###"
    i1 = {
      tags = {
        Name = "web"
      }
      root_block_device = [
        {
          volume_size = 20
        },
      ]
      count = 2
    }
    "###);
    assert_parses(&rendered);
}

#[test]
fn out_of_order_list_indices_render_with_holes() {
    let sheets = one_sheet(
        "waf",
        vec![
            row("acl", "rules.2.name", "last", true),
            row("acl", "rules.0.name", "first", true),
        ],
    );

    let rendered = build(&sheets, &SheetNameMap::default(), None)
        .document
        .to_hcl();

    insta::assert_snapshot!(rendered, @r###"
    waf_list = {
      acl = {
        rules = [
          {
            name = "first"
          },
          {},
          {
            name = "last"
          },
        ]
      }
    }
    "###);
    assert_parses(&rendered);
}

#[test]
fn interpolation_and_quotes_stay_inert() {
    let sheets = one_sheet(
        "instance",
        vec![
            row("i1", "user_data", "echo ${HOME}", true),
            row("i1", "description", "a \"quoted\" name", true),
        ],
    );

    let rendered = build(&sheets, &SheetNameMap::default(), None)
        .document
        .to_hcl();

    insta::assert_snapshot!(rendered, @r###"
    instance_list = {
      i1 = {
        user_data = "echo $${HOME}"
        description = "a \"quoted\" name"
      }
    }
    "###);
    assert_parses(&rendered);
}

#[test]
fn two_resources_render_independently() {
    let sheets = one_sheet(
        "instance",
        vec![
            row("i1", "tags.Name", "web", true),
            row("i2", "tags.Name", "db", true),
            row("i1", "count", "2", true),
        ],
    );

    let rendered = build(&sheets, &SheetNameMap::default(), None)
        .document
        .to_hcl();

    insta::assert_snapshot!(rendered, @r###"
    instance_list = {
      i1 = {
        tags = {
          Name = "web"
        }
        count = 2
      }
      i2 = {
        tags = {
          Name = "db"
        }
      }
    }
    "###);
    assert_parses(&rendered);
}

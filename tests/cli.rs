mod common;

use std::fs;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::prelude::*;

const SHIRT_EXPORT: &str = concat!(
    "Handle,Title,Body (HTML),Variant SKU,Variant Price,",
    "Variant Inventory Qty,Published,Option1 Name,Option1 Value,Tags\n",
    "shirt,Classic Tee,A classic tee,SHIRT-RED,10,5,TRUE,Size,Red,\"mens,shirts\"\n",
    "shirt,,,SHIRT-BLUE,12,3,,,Blue,\n",
);

fn cmd() -> Command {
    Command::cargo_bin("shopify-migrate").expect("binary builds")
}

#[test]
fn convert_writes_a_merged_spree_csv() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", SHIRT_EXPORT);
    let output = workspace.path().join("spree.csv");

    cmd()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).expect("output file");
    let mut lines = written.lines();
    let header = lines.next().expect("header row");
    assert!(header.starts_with("\"SKU\",\"Shipping Category\",\"Price\""));

    let row = lines.next().expect("merged product row");
    assert!(row.contains("\"SHIRT\""));
    assert!(row.contains("\"SHIRT-RED|SHIRT-BLUE\""));
    assert!(row.contains("\"10|12\""));
    assert!(row.contains("\"default:5|default:3\""));
    assert!(row.contains("\"Size:Red|Size:Blue\""));
    assert!(row.contains("\"mens|shirts\""));
    assert_eq!(lines.next(), None);
}

#[test]
fn convert_streams_to_stdout_when_no_output_is_given() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", SHIRT_EXPORT);

    cmd()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"SHIRT-RED|SHIRT-BLUE\""));
}

#[test]
fn convert_preview_renders_a_table() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", SHIRT_EXPORT);

    cmd()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("--preview")
        .assert()
        .success()
        .stdout(predicate::str::contains("SHIRT-RED|SHIRT-BLUE"))
        .stdout(predicate::str::contains("Shipping Category"));
}

#[test]
fn convert_respects_a_profile_file() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", SHIRT_EXPORT);
    let profile = workspace.write("profile.yaml", "sku_prefix_len: 3\n");

    cmd()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-p")
        .arg(&profile)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"SHI\""));
}

#[test]
fn convert_rejects_preview_with_output() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", SHIRT_EXPORT);

    cmd()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(workspace.path().join("out.csv"))
        .arg("--preview")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "--preview cannot be combined with --output",
        ));
}

#[test]
fn convert_fails_fast_on_a_missing_required_column() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", "Handle,Title\nshirt,Classic Tee\n");

    cmd()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Required column 'variant_sku' not found",
        ));
}

#[test]
fn columns_lists_the_header_mapping() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("export.csv", SHIRT_EXPORT);

    cmd()
        .arg("columns")
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Body (HTML)"))
        .stdout(predicate::str::contains("Description"))
        .stdout(predicate::str::contains("Variants"));
}

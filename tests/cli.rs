mod common;

use assert_cmd::Command;
use common::{dataset_fixture, tree_available};
use predicates::prelude::*;
use tree_datalad::{DS_MARKER, EXIT_SPAWN_FAILURE};

fn tree_datalad_cmd() -> Command {
    Command::cargo_bin("tree-datalad").expect("Failed to find tree-datalad binary for testing")
}

#[test]
fn test_missing_engine_exit_code() {
    tree_datalad_cmd()
        .args(["--ds-tree-bin", "/nonexistent/tree-datalad-engine", "-a", "."])
        .assert()
        .code(EXIT_SPAWN_FAILURE)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to launch"));
}

#[test]
fn test_engine_from_environment() {
    tree_datalad_cmd()
        .env("TREE_DATALAD_TREE_BIN", "/nonexistent/tree-datalad-engine")
        .arg(".")
        .assert()
        .code(EXIT_SPAWN_FAILURE);
}

#[test]
fn test_invalid_level_is_rejected() {
    tree_datalad_cmd()
        .args(["-L", "deep", "."])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid level 'deep'"));
}

#[test]
fn test_marks_datasets_like_tree() {
    if !tree_available() {
        eprintln!("tree not installed, skipping");
        return;
    }
    let fixture = dataset_fixture();
    let root = fixture.path().to_string_lossy().into_owned();

    let plain = std::process::Command::new("tree")
        .args(["-a", "-L", "4", "-I", ".git", root.as_str()])
        .output()
        .unwrap();
    let output = tree_datalad_cmd()
        .args(["-a", "-L", "4", root.as_str()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), plain.status.code());
    let annotated = String::from_utf8(output.stdout).unwrap();
    assert_eq!(annotated.matches(DS_MARKER).count(), 2);
    assert_eq!(
        annotated.replace(DS_MARKER, ""),
        String::from_utf8(plain.stdout).unwrap()
    );
}

#[test]
fn test_forwards_tree_help_and_exit_code() {
    if !tree_available() {
        eprintln!("tree not installed, skipping");
        return;
    }
    let plain = std::process::Command::new("tree")
        .args(["--help", "-I", ".git"])
        .output()
        .unwrap();
    let output = tree_datalad_cmd().arg("--help").output().unwrap();
    assert_eq!(output.status.code(), plain.status.code());
    assert_eq!(output.stdout, plain.stdout);
}

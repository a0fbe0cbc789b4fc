//! Integration tests for `asterhub remove`

mod common;

use predicates::prelude::*;

fn installed_button() -> common::TestWorkspace {
    let workspace = common::TestWorkspace::new();
    workspace.publish_button();
    workspace.cmd().args(["add", "button"]).assert().success();
    workspace
}

#[test]
fn test_remove_deletes_files_and_config_entry() {
    let workspace = installed_button();

    workspace
        .cmd()
        .args(["remove", "button", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed ui:button"));

    assert!(!workspace.file_exists("components/ui/button.tsx"));
    assert!(workspace.file_exists("lib/utils.ts"));

    let config = workspace.config();
    assert!(config["installed"]["ui"].get("button").is_none());
    assert!(config["installed"]["lib"].get("utils").is_some());
    assert!(!workspace.journal_path().exists());
}

#[test]
fn test_remove_with_kind_prefix() {
    let workspace = installed_button();

    workspace
        .cmd()
        .args(["remove", "lib:utils", "--yes"])
        .assert()
        .success();

    assert!(!workspace.file_exists("lib/utils.ts"));
    assert!(workspace.file_exists("components/ui/button.tsx"));
}

#[test]
fn test_remove_not_installed() {
    let workspace = common::TestWorkspace::new();

    workspace
        .cmd()
        .args(["remove", "button", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not installed"));
}

#[test]
fn test_remove_skips_unknown_names() {
    let workspace = installed_button();

    workspace
        .cmd()
        .args(["remove", "ghost", "button", "-y"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ghost is not installed"));

    assert!(!workspace.file_exists("components/ui/button.tsx"));
}

//! End-to-end tests for the depsync CLI
//!
//! These tests verify:
//! - Exit codes for usage errors and graceful skips
//! - The interactive check flow over real fixtures (no network needed:
//!   scans only touch the registry for wildcard resolution)

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Creates a monorepo fixture with one workspace per entry
fn create_fixture(workspaces: &[(&str, &str)], dependencies: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "root", "workspaces": ["apps/*"] }"#,
    )
    .unwrap();

    for (path, manifest) in workspaces {
        let ws = dir.path().join(path);
        fs::create_dir_all(&ws).unwrap();
        fs::write(ws.join("package.json"), manifest).unwrap();
    }

    let configs = dir.path().join("tooling/configs");
    fs::create_dir_all(&configs).unwrap();
    fs::write(configs.join("dependencies.json"), dependencies).unwrap();
    fs::write(configs.join("update-config.json"), "{}").unwrap();

    dir
}

fn depsync() -> Command {
    Command::cargo_bin("depsync").expect("Failed to find depsync binary")
}

#[test]
fn test_no_command_prints_usage_and_fails() {
    depsync()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_command_fails() {
    depsync().arg("sync-everything").assert().failure().code(1);
}

#[test]
fn test_help_exits_zero() {
    depsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("depsync"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_version_exits_zero() {
    depsync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("depsync"));
}

#[test]
fn test_check_fails_without_configuration() {
    let dir = tempfile::tempdir().unwrap();
    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_clean_tree_exits_zero() {
    let dir = create_fixture(
        &[("apps/web", r#"{ "dependencies": { "react": "18.2.0" } }"#)],
        r#"{ "ui": { "react": "18.2.0" } }"#,
    );

    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "All workspace versions match the dependency configuration.",
        ));
}

#[test]
fn test_check_reports_mismatch_and_skip_exits_zero() {
    let dir = create_fixture(
        &[("apps/web", r#"{ "dependencies": { "react": "18.3.0" } }"#)],
        r#"{ "ui": { "react": "18.2.0" } }"#,
    );

    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .arg("check")
        .write_stdin("3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version mismatches found"))
        .stdout(predicate::str::contains("react"))
        .stdout(predicate::str::contains("Update skipped."));
}

#[test]
fn test_check_invalid_menu_choice_skips() {
    let dir = create_fixture(
        &[("apps/web", r#"{ "dependencies": { "react": "18.1.0" } }"#)],
        r#"{ "ui": { "react": "18.2.0" } }"#,
    );

    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .arg("check")
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid selection"));
}

#[test]
fn test_check_reports_undefined_package_when_declined() {
    let dir = create_fixture(
        &[
            ("apps/web", r#"{ "dependencies": { "left-pad": "1.0.0" } }"#),
            ("apps/docs", r#"{ "dependencies": { "left-pad": "1.1.0" } }"#),
        ],
        "{}",
    );

    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .arg("check")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("left-pad"))
        .stdout(predicate::str::contains("1.1.0"));
}

#[test]
fn test_check_registers_undefined_package_when_confirmed() {
    let dir = create_fixture(
        &[("apps/web", r#"{ "dependencies": { "left-pad": "1.1.0" } }"#)],
        "{}",
    );

    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .arg("check")
        .write_stdin("y\n")
        .assert()
        .success();

    let config =
        fs::read_to_string(dir.path().join("tooling/configs/dependencies.json")).unwrap();
    assert!(config.contains("left-pad"));
    assert!(config.contains("1.1.0"));
}

#[test]
fn test_update_unknown_group_fails() {
    let dir = create_fixture(
        &[("apps/web", r#"{ "dependencies": { "react": "18.2.0" } }"#)],
        r#"{ "ui": { "react": "18.2.0" } }"#,
    );

    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .args(["update", "ghost-group"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ghost-group"));
}

#[test]
fn test_update_selected_with_no_mismatches_exits_zero() {
    let dir = create_fixture(
        &[("apps/web", r#"{ "dependencies": { "react": "18.2.0" } }"#)],
        r#"{ "ui": { "react": "18.2.0" } }"#,
    );

    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .arg("update:selected")
        .assert()
        .success()
        .stdout(predicate::str::contains("No version mismatches found."));
}

#[test]
fn test_update_selected_empty_selection_exits_zero() {
    let dir = create_fixture(
        &[("apps/web", r#"{ "dependencies": { "react": "18.1.0" } }"#)],
        r#"{ "ui": { "react": "18.2.0" } }"#,
    );

    depsync()
        .args(["--quiet", "--root"])
        .arg(dir.path())
        .arg("update:selected")
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages selected."));
}

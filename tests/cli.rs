//! Tests for the command-line surface that never reach external tools

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn ormharness() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ormharness"))
}

#[test]
fn test_dry_run_prints_rendered_files() {
    let output = ormharness()
        .args([
            "--driver",
            "knut",
            "--dialect",
            "ours",
            "--jdbc-url",
            "jdbc:example://host/db",
            "--tests",
            "SQLTest",
            "--dry-run",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("jar: knut-jdbc-shaded.jar"));
    assert!(stdout.contains("-- hibernate-orm/gradle/databases.gradle --"));
    assert!(stdout.contains("'jdbc.driver' : 'com.google.cloud.spanner.jdbc.JdbcDriver'"));
    assert!(stdout.contains("'jdbc.url' : 'jdbc:example://host/db'"));
    assert!(stdout.contains("libs/knut-jdbc-shaded.jar"));
}

#[test]
fn test_unknown_driver_exits_with_valid_ids() {
    let output = ormharness()
        .args(["--driver", "oracle", "--dry-run"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("oracle"));
    assert!(stderr.contains("knut, simba"));
}

#[test]
fn test_unknown_dialect_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output = ormharness()
        .current_dir(temp_dir.path())
        .args(["--driver", "knut", "--dialect", "mysql", "--skip-install"])
        .arg("--workspace")
        .arg(temp_dir.path())
        .arg("--project-dir")
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("knut, ours"));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_malformed_asset_is_usage_error() {
    let output = ormharness()
        .args(["--asset", "no-separator", "--dry-run"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

//! 命令列介面測試

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_auto_folder_organize"))
}

#[test]
fn test_missing_argument_fails_with_usage() {
    let output = cli().output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "應該印出用法: {stderr}");
}

#[test]
fn test_extra_argument_fails_without_touching_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("photo.jpg"), "i").unwrap();

    let output = cli()
        .arg(temp_dir.path())
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(temp_dir.path().join("photo.jpg").exists());
    assert!(!temp_dir.path().join("images").exists());
}

#[test]
fn test_nonexistent_directory_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = cli().arg(temp_dir.path().join("missing")).output().unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_organizes_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("photo.jpg"), "i").unwrap();

    let output = cli().arg(temp_dir.path()).output().unwrap();

    assert!(output.status.success());
    assert!(temp_dir.path().join("images/photo.jpg").exists());
}

//! End-to-end tests for the qllt-expand binary

mod common;

use std::fs;
use std::process::{Command, Output};

use common::{chained_library, write_tree};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qllt-expand"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Should run binary")
}

fn run_logged(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qllt-expand"))
        .args(args)
        .env("RUST_LOG", "debug")
        .output()
        .expect("Should run binary")
}

#[test]
fn test_check_then_expand_then_check() {
    let dir = chained_library();
    let root = dir.path().to_str().unwrap();

    let stale = run(&["--check", root]);
    assert_eq!(stale.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&stale.stderr).contains("missing:"));

    let expanded = run(&[root]);
    assert!(expanded.status.success());
    let stdout = String::from_utf8_lossy(&expanded.stdout);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("FooBaz.qll"));

    let clean = run(&["--check", root]);
    assert!(clean.status.success());
}

#[test]
fn test_malformed_metadata_reports_location() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[("Bad.qllt", "/*template\n{\"params\": [\"T\",]}\n*/\n")],
    );

    let output = run(&[dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed metadata block"));
    assert!(stderr.contains("Bad.qllt"));
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(
        dir.path(),
        &[(
            "Foo.tmpl",
            "/*template\n{\"params\": [], \"instantiations\": [{\"name\": \"Out\", \"args\": []}]}\n*/\nbody\n",
        )],
    );
    let config = dir.path().join("expand.toml");
    fs::write(&config, "template_extension = \"tmpl\"\n").unwrap();

    let output = run(&[
        "--config",
        config.to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(dir.path().join("Out.qll").exists());
}

#[test]
fn test_bad_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("expand.toml");
    fs::write(&config, "begin_marker = '('\n").unwrap();

    let output = run(&["-c", config.to_str().unwrap(), dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error loading config"));
}

#[test]
fn test_failure_reported_once_with_logging() {
    let dir = chained_library();
    write_tree(
        dir.path(),
        &[(
            "lib/Broken.qllt",
            "/*template\n{\"params\": [\"T\"], \"imports\": [{\"module\": \"lib.Bar\", \"args\": [\"T\"]}], \"instantiations\": [{\"name\": \"gen.Broken\", \"args\": [\"lib.Other\"]}]}\n*/\n",
        )],
    );

    let output = run_logged(&[dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("no instantiation of lib.Bar<lib.Other> is declared").count(),
        1,
        "stderr was:\n{}",
        stderr
    );
    assert!(stderr.contains("Error: "));
}

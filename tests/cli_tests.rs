// Command-line contract: invocation errors exit non-zero with usage on stderr

use std::process::{Command, Output};

use tempfile::TempDir;

fn deploybench(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deploybench"))
        .args(args)
        .env_remove("CONFIG_FILE")
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn publish_unknown_provider_prints_usage() {
    let dir = TempDir::new().unwrap();
    let output = deploybench(&["publish", "bogus", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Usage:"), "stderr: {err}");
    assert!(err.contains("Invalid cloud provider: bogus"), "stderr: {err}");
    assert!(err.contains("aws-lambda"), "stderr: {err}");
}

#[test]
fn publish_missing_directory_prints_usage() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-run");
    let output = deploybench(&["publish", "aws", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Usage:"), "stderr: {err}");
    assert!(err.contains("Results directory not found"), "stderr: {err}");
}

#[test]
fn publish_without_arguments_prints_usage() {
    let output = deploybench(&["publish"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage:"));
}

#[test]
fn no_subcommand_prints_usage() {
    let output = deploybench(&[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage:"));
}

#[test]
fn version_prints_banner() {
    let output = deploybench(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("deploybench"));
}

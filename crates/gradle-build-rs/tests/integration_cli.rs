//! End-to-end tests for the gradle-build-rs binary.
//!
//! A shell script stands in for `gradlew` in a temporary build root.
//!
//! Note: These tests are skipped on Windows; they rely on `/bin/sh`.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// TEST INFRASTRUCTURE
// ============================================================================

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gradle-build-rs"))
}

/// Creates a build root whose `gradlew` runs `body`.
fn fixture(body: &str, mode: u32) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let wrapper = dir.path().join("gradlew");
    std::fs::write(&wrapper, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&wrapper, std::fs::Permissions::from_mode(mode)).unwrap();
    dir
}

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(binary_path())
        .arg("--build-root")
        .arg(root)
        .args(args)
        .env_remove("INPUT_BUILD-ROOT-DIRECTORY")
        .env_remove("INPUT_GRADLE-EXECUTABLE")
        .env_remove("INPUT_ARGUMENTS")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

const COMPILER_OUTPUT: &str = r#"
echo '> Task :app:compileJava'
echo 'Foo.java:10: error: cannot find symbol'
echo 'e: /src/Bar.kt: (5, 12): unresolved reference' 1>&2
echo 'Note: Baz.java uses unchecked or unsafe operations.'
"#;

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn machine_output_lists_annotations() {
    let dir = fixture(&format!("{COMPILER_OUTPUT}\nexit 1"), 0o755);

    let output = run(dir.path(), &["--output", "machine", "--split", "lines"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("ERROR Foo.java:10:0:10:0 cannot find symbol"));
    assert!(stdout.contains("ERROR /src/Bar.kt:5:12:5:12 unresolved reference"));
    assert!(stdout.contains("NOTICE Baz.java:0:0:0:0 Note: Baz.java uses unchecked or unsafe operations."));
    assert!(stdout.contains("Gradle build failed (exit status 1)"));
    assert!(!stdout.contains("> Task"));
}

#[test]
fn github_output_uses_workflow_commands() {
    let dir = fixture(
        &format!("{COMPILER_OUTPUT}\nprintf 'https://scans.example/abc' > gradle-build-scan.txt\nexit 1"),
        0o755,
    );

    let output = run(dir.path(), &["--output", "github", "--split", "lines"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("::error file=Foo.java,line=10,endLine=10:: cannot find symbol"));
    assert!(stdout.contains(
        "::error file=/src/Bar.kt,line=5,endLine=5,col=12,endColumn=12::unresolved reference"
    ));
    assert!(stdout.contains("::error::Gradle build failed: https://scans.example/abc"));
    assert!(stdout.contains("> Task :app:compileJava"));
}

#[test]
fn json_output_is_valid() {
    let dir = fixture(&format!("{COMPILER_OUTPUT}\nexit 0"), 0o755);

    let output = run(dir.path(), &["--output", "json", "--split", "lines"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(output.status.code(), Some(0));
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e["type"] != "Failure"));
}

#[test]
fn successful_build_exits_zero() {
    let dir = fixture("echo 'BUILD SUCCESSFUL'\nexit 0", 0o755);

    let output = run(dir.path(), &["--output", "machine"]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn warnings_fail_when_requested() {
    let dir = fixture("echo 'w: A.kt: (1, 2): unused'\nexit 0", 0o755);

    let output = run(dir.path(), &["--output", "machine", "--split", "lines"]);
    assert_eq!(output.status.code(), Some(0));

    let output = run(
        dir.path(),
        &["--output", "machine", "--split", "lines", "--fail-on-warnings"],
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn gradle_arguments_are_forwarded() {
    let dir = fixture("echo \"$@\" > args.txt\nexit 0", 0o755);

    let output = run(dir.path(), &["--output", "machine", "--", "build", "--scan"]);

    assert_eq!(output.status.code(), Some(0));
    let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert_eq!(args, "build --scan\n");
}

#[test]
fn action_inputs_are_read_from_environment() {
    let dir = fixture("echo \"$@\" > args.txt\nexit 0", 0o755);

    let output = Command::new(binary_path())
        .args(["--output", "machine"])
        .env("INPUT_BUILD-ROOT-DIRECTORY", dir.path())
        .env("INPUT_ARGUMENTS", "assemble -Pname='a b'")
        .env_remove("INPUT_GRADLE-EXECUTABLE")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
    assert_eq!(args, "assemble -Pname=a b\n");
}

#[test]
fn non_executable_wrapper_is_an_error() {
    let dir = fixture("touch launched.txt", 0o644);

    let output = run(dir.path(), &["--output", "machine"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("executable"));
    assert!(!dir.path().join("launched.txt").exists());
}

//! Integration tests for the command-line interface
//!
//! Drives the `jsrefactor` binary over temporary workspaces.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to create a workspace holding the given files
fn setup_test_workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), "{ \"name\": \"test\" }\n").unwrap();
    for (path, code) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, code).unwrap();
    }
    dir
}

fn jsrefactor(workspace: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jsrefactor"))
        .current_dir(workspace)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("JSREFACTOR_WORKSPACE")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = jsrefactor(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("apply"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("references"));
}

#[test]
fn test_apply_writes_file() {
    let workspace = setup_test_workspace(&[("main.js", "a == b;\n")]);
    let output = jsrefactor(
        workspace.path(),
        &["apply", "flip-operator", "main.js", "--cursor", "1:3"],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Modified"));
    assert_eq!(
        fs::read_to_string(workspace.path().join("main.js")).unwrap(),
        "b == a;\n"
    );
}

#[test]
fn test_apply_dry_run_with_diff() {
    let workspace = setup_test_workspace(&[("main.js", "a == b;\n")]);
    let output = jsrefactor(
        workspace.path(),
        &[
            "apply",
            "flip-operator",
            "main.js",
            "--cursor",
            "1:3",
            "--dry-run",
            "--diff",
        ],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Would modify"));
    assert!(stdout.contains("-a == b;"));
    assert!(stdout.contains("+b == a;"));
    assert_eq!(
        fs::read_to_string(workspace.path().join("main.js")).unwrap(),
        "a == b;\n"
    );
}

#[test]
fn test_apply_json_report() {
    let workspace = setup_test_workspace(&[("main.js", "run(a + b);\n")]);
    let output = jsrefactor(
        workspace.path(),
        &[
            "apply",
            "extract-variable",
            "main.js",
            "--range",
            "1:5-1:10",
            "--json",
        ],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["outcome"], "applied");
    assert_eq!(report["cursor"], "1:7");
    assert_eq!(
        report["changes"][0]["after"],
        "const extracted = a + b;\nrun(extracted);\n"
    );
}

#[test]
fn test_not_applicable_exits_with_failure() {
    let workspace = setup_test_workspace(&[("main.js", "call();\n")]);
    let output = jsrefactor(
        workspace.path(),
        &["apply", "flip-operator", "main.js", "--cursor", "1:1"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("I didn't find an operator to flip"));
    assert_eq!(
        fs::read_to_string(workspace.path().join("main.js")).unwrap(),
        "call();\n"
    );
}

#[test]
fn test_unknown_refactoring_suggests_closest() {
    let workspace = setup_test_workspace(&[("main.js", "a == b;\n")]);
    let output = jsrefactor(
        workspace.path(),
        &["apply", "flip-operater", "main.js", "--cursor", "1:3"],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("did you mean `flip-operator`?"));
}

#[test]
fn test_choice_answers_extract_prompt() {
    let workspace = setup_test_workspace(&[("main.js", "log(a * 2);\nsave(a * 2);\n")]);
    let output = jsrefactor(
        workspace.path(),
        &[
            "apply",
            "extract-variable",
            "main.js",
            "--range",
            "1:5-1:10",
            "--choice",
            "1",
        ],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(workspace.path().join("main.js")).unwrap(),
        "const extracted = a * 2;\nlog(extracted);\nsave(extracted);\n"
    );
}

#[test]
fn test_input_answers_rename_prompt() {
    let workspace = setup_test_workspace(&[
        ("src/limits.js", "export const limit = 3;\n"),
        ("src/app.js", "import { limit } from './limits';\nlimit;\n"),
    ]);
    let output = jsrefactor(
        workspace.path(),
        &[
            "apply",
            "rename-symbol",
            "src/limits.js",
            "--cursor",
            "1:15",
            "--input",
            "max",
        ],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(workspace.path().join("src/app.js")).unwrap(),
        "import { max } from './limits';\nmax;\n"
    );
}

#[test]
fn test_list_honours_config() {
    let workspace = setup_test_workspace(&[(
        ".jsrefactor.toml",
        "[refactorings]\ndisabled = [\"flip-if-else\"]\n",
    )]);
    let output = jsrefactor(workspace.path(), &["list"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("extract-variable"));
    assert!(stdout.contains("flip-operator"));
    assert!(!stdout.contains("flip-if-else"));
}

#[test]
fn test_invalid_config_is_an_error() {
    let workspace = setup_test_workspace(&[
        (".jsrefactor.toml", "[extract]\ndefault_name = \"class\"\n"),
        ("main.js", "a == b;\n"),
    ]);
    let output = jsrefactor(
        workspace.path(),
        &["apply", "flip-operator", "main.js", "--cursor", "1:3"],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid config"));
}

#[test]
fn test_references_command() {
    let workspace = setup_test_workspace(&[("main.js", "let count = 0;\ncount += 1;\n")]);
    let output = jsrefactor(
        workspace.path(),
        &["references", "main.js", "--cursor", "1:5"],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("main.js:1:5"));
    assert!(stdout.contains("main.js:2:1"));
}

#[test]
fn test_invalid_position_is_rejected() {
    let workspace = setup_test_workspace(&[("main.js", "a == b;\n")]);
    let output = jsrefactor(
        workspace.path(),
        &["apply", "flip-operator", "main.js", "--cursor", "0:3"],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid position"));
}

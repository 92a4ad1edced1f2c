//! Integration tests for `.jsrefactor.toml` loading
//!
//! Covers defaults, validation, and how the config shapes the registry and the
//! workspace listing.

use jsrefactor::config::{
    load_from_path, load_from_str, load_or_default, Config, ConfigError, ValidationIssue,
    CONFIG_FILE,
};
use jsrefactor::{Editor, FileEditor, Registry, Selection};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_full_config() {
    let toml = r#"
[workspace]
ignored_folders = ["dist", "coverage"]

[refactorings]
disabled = ["flip-if-else", "rename-symbol"]

[extract]
default_name = "result"
"#;
    let config = load_from_str(toml).unwrap();
    assert_eq!(config.workspace.ignored_folders, vec!["dist", "coverage"]);
    assert_eq!(config.extract.default_name, "result");

    let registry = Registry::from_config(&config);
    assert!(registry.get("flip-if-else").is_none());
    assert!(registry.get("rename-symbol").is_none());
    assert_eq!(registry.iter().count(), 9);
    assert_eq!(registry.context().default_name, "result");
}

#[test]
fn test_empty_config_means_defaults() {
    assert_eq!(load_from_str("").unwrap(), Config::default());
}

#[test]
fn test_validation_reports_every_issue() {
    let toml = r#"
[refactorings]
disabled = ["inline-everything"]

[extract]
default_name = "2fast"
"#;
    let error = load_from_str(toml).unwrap_err();
    let ConfigError::Validation { source, .. } = &error else {
        panic!("expected a validation error, got {error}");
    };
    assert_eq!(source.issues.len(), 2);
    assert!(matches!(
        &source.issues[0],
        ValidationIssue::UnknownRefactoring { id } if id == "inline-everything"
    ));
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "[workspace\n").unwrap();

    let error = load_from_path(&path).unwrap_err();
    assert!(matches!(error, ConfigError::Toml { path: Some(_), .. }));
    assert!(error.to_string().contains(CONFIG_FILE));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let error = load_from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(error, ConfigError::Io { .. }));
}

#[test]
fn test_ignored_folders_hide_files_from_workspace() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        "[workspace]\nignored_folders = [\"dist\"]\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("dist")).unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("dist/bundle.js"), "var a;\n").unwrap();
    fs::write(dir.path().join("src/main.js"), "let a;\n").unwrap();

    let config = load_or_default(dir.path()).unwrap();
    let editor = FileEditor::open("src/main.js", dir.path(), Selection::default())
        .unwrap()
        .with_ignored_folders(config.workspace.ignored_folders);
    let files = editor.workspace_files().unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("src/main.js"));
}

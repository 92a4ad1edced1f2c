//! Refactorings over files on disk.

use jsrefactor::config::{load_or_default, CONFIG_FILE};
use jsrefactor::{
    Editor, FileEditor, Outcome, RefactorError, Registry, ScriptedPrompter, Selection,
};
use std::fs;
use tempfile::TempDir;

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, code) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, code).unwrap();
    }
    dir
}

#[test]
fn extract_variable_writes_the_file() {
    let dir = workspace(&[("src/total.js", "function total(price) {\n  return price * 1.2;\n}\n")]);
    let mut editor = FileEditor::open(
        "src/total.js",
        dir.path(),
        Selection::new((1, 9), (1, 20)),
    )
    .unwrap();

    let outcome = Registry::default()
        .execute("extract-variable", &mut editor)
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(
        fs::read_to_string(dir.path().join("src/total.js")).unwrap(),
        "function total(price) {\n  const extracted = price * 1.2;\n  return extracted;\n}\n"
    );
    assert_eq!(editor.changes().len(), 1);
}

#[test]
fn rename_reaches_importing_files() {
    let dir = workspace(&[
        ("src/limits.js", "export const limit = 3;\n"),
        (
            "src/app.js",
            "import { limit } from \"./limits\";\nconsole.log(limit);\n",
        ),
        ("src/unrelated.js", "const limit = 1;\n"),
    ]);
    let mut editor = FileEditor::open("src/limits.js", dir.path(), Selection::cursor_at(0, 14))
        .unwrap()
        .with_prompter(ScriptedPrompter::new().answer_input("maxItems"));

    let outcome = Registry::default()
        .execute("rename-symbol", &mut editor)
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);

    let read = |path: &str| fs::read_to_string(dir.path().join(path)).unwrap();
    assert_eq!(read("src/limits.js"), "export const maxItems = 3;\n");
    assert_eq!(
        read("src/app.js"),
        "import { maxItems } from \"./limits\";\nconsole.log(maxItems);\n"
    );
    assert_eq!(read("src/unrelated.js"), "const limit = 1;\n");
}

#[test]
fn dry_run_reports_without_writing() {
    let original = "if (a) {\n  x();\n} else {\n  y();\n}\n";
    let dir = workspace(&[("main.ts", original)]);
    let mut editor = FileEditor::open("main.ts", dir.path(), Selection::cursor_at(0, 0))
        .unwrap()
        .with_dry_run(true);

    let outcome = Registry::default()
        .execute("flip-if-else", &mut editor)
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(fs::read_to_string(dir.path().join("main.ts")).unwrap(), original);

    let changes = editor.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].after, "if (!a) {\n  y();\n} else {\n  x();\n}\n");
}

#[test]
fn disabled_refactorings_are_unknown() {
    let dir = workspace(&[
        (CONFIG_FILE, "[refactorings]\ndisabled = [\"flip-operator\"]\n"),
        ("main.js", "a == b;\n"),
    ]);
    let config = load_or_default(dir.path()).unwrap();
    let registry = Registry::from_config(&config);
    let mut editor = FileEditor::open("main.js", dir.path(), Selection::cursor_at(0, 2)).unwrap();

    let result = registry.execute("flip-operator", &mut editor);
    assert!(matches!(
        result,
        Err(RefactorError::UnknownRefactoring { .. })
    ));
    assert_eq!(editor.code(), "a == b;\n");
}

#[test]
fn configured_default_name_is_used() {
    let dir = workspace(&[
        (CONFIG_FILE, "[extract]\ndefault_name = \"value\"\n"),
        ("main.js", "run(a + b);\n"),
    ]);
    let config = load_or_default(dir.path()).unwrap();
    let mut editor =
        FileEditor::open("main.js", dir.path(), Selection::new((0, 4), (0, 9))).unwrap();

    Registry::from_config(&config)
        .execute("extract-variable", &mut editor)
        .unwrap();
    assert_eq!(editor.code(), "const value = a + b;\nrun(value);\n");
}

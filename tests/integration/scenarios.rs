//! End-to-end scenarios over an in-memory editor.

use jsrefactor::ts::parse;
use jsrefactor::ts::NodeKind;
use jsrefactor::{
    closest_match, Editor, InMemoryEditor, Modification, Outcome, Position, Registry, Selection,
};

fn run(id: &str, marked: &str) -> (InMemoryEditor, Outcome) {
    let mut editor = InMemoryEditor::new(marked);
    let outcome = Registry::default().execute(id, &mut editor).unwrap();
    (editor, outcome)
}

#[test]
fn insertion_through_read_then_write() {
    let mut editor = InMemoryEditor::with_selection(
        "console.log(\"Hello\")",
        Selection::cursor_at(0, 0),
    );
    editor
        .read_then_write(
            Selection::cursor_at(0, 0),
            &mut |_| Ok(vec![Modification::insertion(Position::new(0, 18), " World!")]),
            None,
        )
        .unwrap();
    assert_eq!(editor.code(), "console.log(\"Hello World!\")");
}

#[test]
fn bubble_up_nested_if() {
    let editor = InMemoryEditor::with_selection(
        "if (isValid) {\n  if (isCorrect) {\n    doSomething();\n  }\n}",
        Selection::cursor_at(1, 2),
    );
    let mut editor = editor;
    let outcome = Registry::default()
        .execute("bubble-up-if-statement", &mut editor)
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(
        editor.code(),
        "if (isCorrect) {\n  if (isValid) {\n    doSomething();\n  }\n}"
    );
}

#[test]
fn flip_operator() {
    let (editor, outcome) = run("flip-operator", "a ==[cursor] b");
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(editor.code(), "b == a");
}

#[test]
fn default_only_switch() {
    let (editor, outcome) = run(
        "convert-switch-to-if-else",
        "switch(tempScore){[cursor]default: score += scores[tempScore]; break;}",
    );
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(editor.code(), "score += scores[tempScore];");
}

#[test]
fn remove_braces() {
    let (editor, outcome) = run(
        "remove-braces-from-arrow-function",
        "() => { return [cursor]\"Hello!\"; }",
    );
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(editor.code(), "() => \"Hello!\"");

    let marked = "() => {\n  [cursor]log();\n  return \"Hello!\";\n}";
    let (editor, outcome) = run("remove-braces-from-arrow-function", marked);
    assert!(matches!(outcome, Outcome::Reported(_)));
    assert_eq!(editor.code(), "() => {\n  log();\n  return \"Hello!\";\n}");
    assert_eq!(editor.errors().len(), 1);
}

#[test]
fn closest_match_yields_one_node() {
    let source = "if (a) {\n  if (b) {\n    if (c) {}\n  }\n}";
    let tree = parse(source).unwrap();
    let found = closest_match(tree.root(), &Selection::cursor_at(2, 4), |node, _| {
        node.is(NodeKind::IfStatement).then_some(())
    })
    .unwrap();
    assert_eq!(found.node.text(), "if (c) {}");
}

#[test]
fn refactorings_chain_on_one_buffer() {
    let registry = Registry::default();
    let mut editor = InMemoryEditor::new("const f = (x) => [cursor]x * 2;");

    let outcome = registry
        .execute("add-braces-to-arrow-function", &mut editor)
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(editor.code(), "const f = (x) => {\n  return x * 2;\n};");

    let outcome = registry
        .execute("remove-braces-from-arrow-function", &mut editor)
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(editor.code(), "const f = (x) => x * 2;");
}

#[test]
fn every_refactoring_reports_on_empty_buffer() {
    let registry = Registry::default();
    for refactoring in registry.iter() {
        let mut editor = InMemoryEditor::new("");
        let outcome = registry.execute(refactoring.id, &mut editor).unwrap();
        assert!(
            matches!(outcome, Outcome::Reported(_)),
            "{} did not report",
            refactoring.id
        );
        assert_eq!(editor.code(), "");
    }
}

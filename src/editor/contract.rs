//! Behaviour every [`Editor`](super::Editor) adapter must share.
//!
//! `editor_contract_tests!(make)` expands to a `contract` test module. `make`
//! builds an adapter from `(code, selection, other_files, prompter)` and may
//! return a temporary directory to keep alive for the test's duration.

macro_rules! editor_contract_tests {
    ($make:ident) => {
        mod contract {
            use crate::edit::{EditError, Modification};
            use crate::editor::{ComputeError, Editor, EditorError, ScriptedPrompter};
            use crate::position::Position;
            use crate::selection::Selection;

            fn make(
                code: &str,
                selection: Selection,
            ) -> (impl Editor, Option<tempfile::TempDir>) {
                super::$make(code, selection, &[], ScriptedPrompter::new())
            }

            fn constant(
                modifications: Vec<Modification>,
            ) -> impl FnMut(&str) -> Result<Vec<Modification>, ComputeError> {
                move |_| Ok(modifications.clone())
            }

            #[test]
            fn exposes_code_and_selection() {
                let (editor, _dir) = make("a;\nb;", Selection::new((1, 0), (1, 2)));
                assert_eq!(editor.code(), "a;\nb;");
                assert_eq!(editor.selection(), Selection::new((1, 0), (1, 2)));
            }

            #[test]
            fn insertion_inside_string() {
                let (mut editor, _dir) =
                    make("console.log(\"Hello\")", Selection::cursor_at(0, 18));
                let mut compute = constant(vec![Modification::insertion(
                    Position::new(0, 18),
                    " World!",
                )]);
                editor
                    .read_then_write(editor.selection(), &mut compute, None)
                    .unwrap();
                assert_eq!(editor.code(), "console.log(\"Hello World!\")");
                assert_eq!(editor.selection(), Selection::cursor_at(0, 25));
            }

            #[test]
            fn compute_receives_selected_text() {
                let (mut editor, _dir) =
                    make("console.log(\"Hello\")", Selection::new((0, 0), (0, 7)));
                let mut seen = String::new();
                let mut compute = |text: &str| -> Result<Vec<Modification>, ComputeError> {
                    seen = text.to_string();
                    Ok(Vec::new())
                };
                editor
                    .read_then_write(editor.selection(), &mut compute, None)
                    .unwrap();
                assert_eq!(seen, "console");
            }

            #[test]
            fn no_modifications_leave_code_identical() {
                let code = "function f() {\n\n  return 1;\n}\n";
                let (mut editor, _dir) = make(code, Selection::cursor_at(2, 3));
                editor
                    .read_then_write(editor.selection(), &mut constant(Vec::new()), None)
                    .unwrap();
                assert_eq!(editor.code(), code);
                assert_eq!(editor.selection(), Selection::cursor_at(2, 3));
            }

            #[test]
            fn modifications_apply_in_any_order() {
                let code = "first();\n\nsecond();\n";
                let modifications = vec![
                    Modification::new(Selection::new((2, 0), (2, 6)), "last"),
                    Modification::new(Selection::new((0, 0), (0, 5)), "one\ntwo"),
                ];
                let (mut forward, _a) = make(code, Selection::cursor_at(0, 0));
                forward
                    .read_then_write(
                        Selection::cursor_at(0, 0),
                        &mut constant(modifications.clone()),
                        None,
                    )
                    .unwrap();
                let reversed: Vec<_> = modifications.into_iter().rev().collect();
                let (mut backward, _b) = make(code, Selection::cursor_at(0, 0));
                backward
                    .read_then_write(Selection::cursor_at(0, 0), &mut constant(reversed), None)
                    .unwrap();
                assert_eq!(forward.code(), "one\ntwo();\n\nlast();\n");
                assert_eq!(forward.code(), backward.code());
            }

            #[test]
            fn explicit_cursor_wins() {
                let (mut editor, _dir) = make("a + b;", Selection::cursor_at(0, 0));
                let mut compute = constant(vec![Modification::new(
                    Selection::new((0, 0), (0, 5)),
                    "b + a",
                )]);
                editor
                    .read_then_write(
                        Selection::cursor_at(0, 0),
                        &mut compute,
                        Some(Position::new(0, 4)),
                    )
                    .unwrap();
                assert_eq!(editor.code(), "b + a;");
                assert_eq!(editor.selection(), Selection::cursor_at(0, 4));
            }

            #[test]
            fn failed_compute_writes_nothing() {
                let (mut editor, _dir) = make("keep();", Selection::cursor_at(0, 0));
                let mut compute = |_: &str| -> Result<Vec<Modification>, ComputeError> {
                    Err("no luck".into())
                };
                let result = editor.read_then_write(Selection::cursor_at(0, 0), &mut compute, None);
                assert!(matches!(result, Err(EditorError::Compute(_))));
                assert_eq!(editor.code(), "keep();");
            }

            #[test]
            fn overlapping_modifications_write_nothing() {
                let (mut editor, _dir) = make("abcdef", Selection::cursor_at(0, 0));
                let mut compute = constant(vec![
                    Modification::new(Selection::new((0, 0), (0, 4)), "x"),
                    Modification::new(Selection::new((0, 2), (0, 6)), "y"),
                ]);
                let result = editor.read_then_write(Selection::cursor_at(0, 0), &mut compute, None);
                assert!(matches!(
                    result,
                    Err(EditorError::Edit(EditError::Overlapping { .. }))
                ));
                assert_eq!(editor.code(), "abcdef");
            }

            #[test]
            fn write_moves_cursor() {
                let (mut editor, _dir) = make("a;", Selection::cursor_at(0, 1));
                editor.write("b;\nc;", Some(Position::new(1, 1))).unwrap();
                assert_eq!(editor.code(), "b;\nc;");
                assert_eq!(editor.selection(), Selection::cursor_at(1, 1));
                editor.move_cursor_to(Position::new(0, 0));
                assert_eq!(editor.selection(), Selection::cursor_at(0, 0));
            }

            #[test]
            fn show_error_keeps_code() {
                let (mut editor, _dir) = make("a;", Selection::cursor_at(0, 0));
                editor.show_error("cannot refactor here");
                assert_eq!(editor.code(), "a;");
            }

            #[test]
            fn prompts_use_the_prompter() {
                let prompter = ScriptedPrompter::new()
                    .answer_choice(1)
                    .dismiss_choice()
                    .answer_input("renamed");
                let (mut editor, _dir) =
                    super::$make("a;", Selection::cursor_at(0, 0), &[], prompter);
                let options = vec!["all".to_string(), "this one".to_string()];
                assert_eq!(editor.ask_user_choice(&options), Some(1));
                assert_eq!(editor.ask_user_choice(&options), None);
                assert_eq!(editor.ask_user_input(Some("a")).as_deref(), Some("renamed"));
                assert_eq!(editor.ask_user_input(Some("a")).as_deref(), Some("a"));
            }

            #[test]
            fn other_files_can_be_read_and_written() {
                let (mut editor, _dir) = super::$make(
                    "main();",
                    Selection::cursor_at(0, 0),
                    &[("other.js", "other();")],
                    ScriptedPrompter::new(),
                );
                let files = editor.workspace_files().unwrap();
                assert_eq!(files.len(), 2);
                let other = files
                    .iter()
                    .find(|f| f.ends_with("other.js"))
                    .cloned()
                    .unwrap();
                assert!(files.iter().any(|f| f.as_path() == editor.current_file()));

                assert_eq!(editor.code_of(&other).unwrap(), "other();");
                editor.write_in(&other, "changed();").unwrap();
                assert_eq!(editor.code_of(&other).unwrap(), "changed();");
                assert_eq!(editor.code(), "main();");
            }

            #[test]
            fn references_span_importing_files() {
                let (editor, _dir) = super::$make(
                    "export const limit = 1;\nlimit;",
                    Selection::cursor_at(1, 2),
                    &[("other.js", "import { limit } from './main';\nlimit + 1;")],
                    ScriptedPrompter::new(),
                );
                let references = editor.get_selection_references(editor.selection()).unwrap();
                assert_eq!(references.len(), 4);
                let in_other = references
                    .iter()
                    .filter(|r| r.file.ends_with("other.js"))
                    .count();
                assert_eq!(in_other, 2);
            }
        }
    };
}

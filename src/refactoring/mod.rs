//! Refactorings and their dispatcher.
//!
//! Every refactoring follows the same steps: parse the editor's buffer, find
//! the node designated by the selection with [`closest_match`], build
//! modifications through the tree operations and [`commit`] them. Refactorings
//! that cannot run return [`RefactorError::NoMatch`] or
//! [`RefactorError::PatternInvalid`]; the [`Registry`] shows those to the user
//! instead of failing.
//!
//! [`closest_match`]: crate::ts::closest_match

mod add_braces_to_arrow_function;
mod bubble_up_if_statement;
mod convert_if_else_to_ternary;
mod convert_switch_to_if_else;
mod extract_variable;
mod flip_if_else;
mod flip_operator;
mod negation;
mod registry;
mod remove_braces_from_arrow_function;
mod remove_redundant_else;
mod rename_symbol;
mod split_declaration_and_initialization;

pub use negation::negate;
pub use registry::{known_ids, Refactoring, Registry};

use crate::edit::{apply_modifications, EditError, Modification};
use crate::editor::{Editor, EditorError};
use crate::naming::DEFAULT_NAME;
use crate::position::Position;
use crate::ts::{introduced_errors, SyntaxNode, TreeSitterError};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RefactorError {
    /// Nothing under the selection fits the refactoring.
    #[error("{reason}")]
    NoMatch { reason: String },

    /// Something fits, but its shape cannot be transformed safely.
    #[error("{reason}")]
    PatternInvalid { reason: String },

    /// The user dismissed a prompt.
    #[error("cancelled")]
    Cancelled,

    #[error("unknown refactoring `{id}`{}", did_you_mean(.suggestion))]
    UnknownRefactoring {
        id: String,
        suggestion: Option<String>,
    },

    #[error(transparent)]
    Parse(#[from] TreeSitterError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("refactoring would introduce syntax errors: {0}")]
    IntroducesSyntaxErrors(#[source] TreeSitterError),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(", did you mean `{s}`?"))
        .unwrap_or_default()
}

impl RefactorError {
    pub fn no_match(reason: impl Into<String>) -> Self {
        Self::NoMatch {
            reason: reason.into(),
        }
    }

    pub fn pattern_invalid(reason: impl Into<String>) -> Self {
        Self::PatternInvalid {
            reason: reason.into(),
        }
    }
}

/// How a dispatched refactoring ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The buffer was rewritten.
    Applied,
    /// The refactoring could not run; the reason was shown to the user.
    Reported(String),
    /// The user dismissed a prompt; nothing changed.
    Cancelled,
}

/// Settings shared by all refactorings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefactorContext {
    /// Name given to extracted variables when none can be derived.
    pub default_name: String,
}

impl Default for RefactorContext {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_NAME.to_string(),
        }
    }
}

/// Validate `modifications` against the current buffer and write them.
///
/// The patched buffer must not have more syntax errors than the current one.
pub fn commit(
    editor: &mut dyn Editor,
    modifications: Vec<Modification>,
    cursor: Option<Position>,
) -> Result<(), RefactorError> {
    let code = editor.code().to_string();
    let patched = apply_modifications(&code, &modifications)?;
    introduced_errors(&code, &patched).map_err(RefactorError::IntroducesSyntaxErrors)?;
    debug!(modifications = modifications.len(), "committing refactoring");

    let selection = editor.selection();
    let mut pending = Some(modifications);
    editor.read_then_write(
        selection,
        &mut |_| Ok(pending.take().unwrap_or_default()),
        cursor,
    )?;
    Ok(())
}

/// The single statement of a block, or the statement itself if not a block.
pub(crate) fn single_statement<'t>(statement: SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if !statement.is(crate::ts::NodeKind::StatementBlock) {
        return Some(statement);
    }
    match statement.statements().as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Indentation one level deeper than `outer`, guessed from `inner`.
pub(crate) fn indent_unit(outer: &str, inner: &str) -> String {
    match inner.strip_prefix(outer) {
        Some(unit) if !unit.is_empty() => unit.to_string(),
        _ => "  ".to_string(),
    }
}

/// Move `text` from indentation `from` to indentation `to`.
///
/// The first line is left alone: it is placed by the caller.
pub(crate) fn reindent(text: &str, from: &str, to: &str) -> String {
    let mut lines = text.split('\n');
    let mut output = lines.next().unwrap_or_default().to_string();
    for line in lines {
        output.push('\n');
        match line.strip_prefix(from) {
            Some(rest) => {
                output.push_str(to);
                output.push_str(rest);
            }
            None if line.trim().is_empty() => {}
            None => output.push_str(line.trim_start()),
        }
    }
    output
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::editor::{InMemoryEditor, ScriptedPrompter};

    /// Run refactoring `id` over marked code.
    pub fn run(id: &str, marked: &str) -> (InMemoryEditor, Outcome) {
        run_with(id, InMemoryEditor::new(marked))
    }

    pub fn run_with(id: &str, mut editor: InMemoryEditor) -> (InMemoryEditor, Outcome) {
        let registry = Registry::new(RefactorContext::default());
        let outcome = registry.execute(id, &mut editor).unwrap();
        (editor, outcome)
    }

    pub fn run_prompted(id: &str, marked: &str, prompter: ScriptedPrompter) -> (InMemoryEditor, Outcome) {
        run_with(id, InMemoryEditor::new(marked).with_prompter(prompter))
    }

    /// Assert that `id` turns `marked` into `expected`.
    #[track_caller]
    pub fn assert_refactors(id: &str, marked: &str, expected: &str) {
        let (editor, outcome) = run(id, marked);
        assert_eq!(outcome, Outcome::Applied, "errors: {:?}", editor.errors());
        assert_eq!(editor.code(), expected);
    }

    /// Assert that `id` reports an error and leaves the buffer alone.
    #[track_caller]
    pub fn assert_reported(id: &str, marked: &str) {
        let (code, _) = crate::editor::parse_markers(marked);
        let (editor, outcome) = run(id, marked);
        assert!(
            matches!(outcome, Outcome::Reported(_)),
            "expected a reported error, got {outcome:?} with {:?}",
            editor.code()
        );
        assert_eq!(editor.code(), code);
        assert_eq!(editor.errors().len(), 1);
    }
}

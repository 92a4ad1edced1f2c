//! The editor port.
//!
//! Refactorings never touch files or terminals directly. They read the buffer
//! and the selection through an [`Editor`], describe their changes as
//! [`Modification`]s and hand them back through [`Editor::read_then_write`].
//! Two adapters exist: [`InMemoryEditor`] for tests and embedding, and
//! [`FileEditor`] for files on disk.

#[cfg(test)]
#[macro_use]
mod contract;

mod file;
mod in_memory;
mod prompt;

pub use file::{FileChange, FileEditor};
pub use in_memory::InMemoryEditor;
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};

use crate::edit::{EditError, Modification, TextPatch};
use crate::line_index::LineIndex;
use crate::position::Position;
use crate::safety::SafetyError;
use crate::selection::Selection;
use crate::ts::{find_references, CodeReference, TreeSitterError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Error returned by a `read_then_write` computation.
pub type ComputeError = Box<dyn std::error::Error + Send + Sync>;

/// Computation run by [`Editor::read_then_write`] over the selected text.
pub type Compute<'a> = dyn FnMut(&str) -> Result<Vec<Modification>, ComputeError> + 'a;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("failed to compute modifications: {0}")]
    Compute(#[source] ComputeError),

    #[error(transparent)]
    Parse(#[from] TreeSitterError),

    #[error(transparent)]
    Safety(#[from] SafetyError),

    #[error("file not in workspace: {path}")]
    UnknownFile { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A text buffer with a selection, backed by some workspace.
pub trait Editor {
    /// Path of the buffer being edited.
    fn current_file(&self) -> &Path;

    fn code(&self) -> &str;

    fn selection(&self) -> Selection;

    /// Replace the whole buffer. The selection collapses to `cursor` when
    /// given and is kept otherwise.
    fn write(&mut self, code: &str, cursor: Option<Position>) -> Result<(), EditorError>;

    /// Report a refactoring that could not run. Never modifies the buffer.
    fn show_error(&mut self, reason: &str);

    /// Let the user pick one of `options`. `None` when the prompt is dismissed.
    fn ask_user_choice(&mut self, options: &[String]) -> Option<usize>;

    /// Ask the user for free text, prefilled with `default`. `None` when dismissed.
    fn ask_user_input(&mut self, default: Option<&str>) -> Option<String>;

    fn move_cursor_to(&mut self, position: Position);

    /// Replace the content of another workspace file.
    fn write_in(&mut self, file: &Path, code: &str) -> Result<(), EditorError>;

    fn code_of(&self, file: &Path) -> Result<String, EditorError>;

    /// Every source file of the workspace, the current one included.
    fn workspace_files(&self) -> Result<Vec<PathBuf>, EditorError>;

    /// Compute modifications from the selected text and patch them in.
    ///
    /// `compute` receives the text under `selection` (empty for a cursor) and
    /// returns modifications expressed against the buffer as it is now. They
    /// are applied in a single pass. The cursor goes to `new_cursor`, or stays
    /// where it was relative to the surrounding text. Nothing is written when
    /// `compute` fails or the modifications overlap.
    fn read_then_write(
        &mut self,
        selection: Selection,
        compute: &mut Compute<'_>,
        new_cursor: Option<Position>,
    ) -> Result<(), EditorError> {
        let original = self.code().to_string();
        let index = LineIndex::new(&original);
        let from = index.offset_of(selection.start);
        let to = index.offset_of(selection.end).max(from);

        let modifications = compute(&original[from..to]).map_err(EditorError::Compute)?;
        let patch = TextPatch::new(&original, &modifications)?;
        if patch.is_empty() {
            debug!("nothing to write");
            if let Some(cursor) = new_cursor {
                self.move_cursor_to(cursor);
            }
            return Ok(());
        }

        let patched = patch.apply();
        let cursor =
            new_cursor.unwrap_or_else(|| patch.reproject(self.selection().start, &patched));
        self.write(&patched, Some(cursor))
    }

    /// Every reference to the symbol under `selection`, across the workspace.
    fn get_selection_references(
        &self,
        selection: Selection,
    ) -> Result<Vec<CodeReference>, EditorError> {
        let current = self.current_file().to_path_buf();
        let mut workspace = Vec::new();
        for file in self.workspace_files()? {
            if file == current {
                continue;
            }
            match self.code_of(&file) {
                Ok(code) => workspace.push((file, code)),
                Err(error) => warn!(file = %file.display(), %error, "skipping unreadable file"),
            }
        }
        Ok(find_references(&current, self.code(), &selection, &workspace)?)
    }
}

/// Split fixture text into code and selection.
///
/// `[cursor]` marks a cursor; `[start]` and `[end]` mark a selection. Without
/// markers the cursor is at the start of the buffer.
pub fn parse_markers(marked: &str) -> (String, Selection) {
    const CURSOR: &str = "[cursor]";
    const START: &str = "[start]";
    const END: &str = "[end]";

    if let Some(at) = marked.find(CURSOR) {
        let code = marked.replacen(CURSOR, "", 1);
        let position = LineIndex::new(&code).position_of(at);
        return (code, Selection::cursor_at_position(position));
    }

    match (marked.find(START), marked.find(END)) {
        (Some(start), Some(end)) if start < end => {
            let code = marked.replacen(START, "", 1).replacen(END, "", 1);
            let index = LineIndex::new(&code);
            let selection = Selection::from_positions(
                index.position_of(start),
                index.position_of(end - START.len()),
            );
            (code, selection)
        }
        _ => (marked.to_string(), Selection::default()),
    }
}

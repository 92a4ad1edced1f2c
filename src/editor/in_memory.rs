use super::{parse_markers, Editor, EditorError, Prompter, ScriptedPrompter};
use crate::position::Position;
use crate::selection::Selection;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_FILE: &str = "main.js";

/// An editor over strings, with a virtual workspace of other files.
pub struct InMemoryEditor {
    file: PathBuf,
    code: String,
    selection: Selection,
    others: BTreeMap<PathBuf, String>,
    errors: Vec<String>,
    prompter: Box<dyn Prompter>,
}

impl InMemoryEditor {
    /// Editor over `marked` code; see [`parse_markers`] for the markers.
    pub fn new(marked: &str) -> Self {
        let (code, selection) = parse_markers(marked);
        Self::with_selection(code, selection)
    }

    pub fn with_selection(code: impl Into<String>, selection: Selection) -> Self {
        Self {
            file: PathBuf::from(DEFAULT_FILE),
            code: code.into(),
            selection,
            others: BTreeMap::new(),
            errors: Vec::new(),
            prompter: Box::new(ScriptedPrompter::new()),
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    pub fn with_workspace_file(mut self, file: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        self.others.insert(file.into(), code.into());
        self
    }

    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    /// Errors shown so far, oldest first.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Editor for InMemoryEditor {
    fn current_file(&self) -> &Path {
        &self.file
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn write(&mut self, code: &str, cursor: Option<Position>) -> Result<(), EditorError> {
        self.code = code.to_string();
        if let Some(cursor) = cursor {
            self.selection = Selection::cursor_at_position(cursor);
        }
        Ok(())
    }

    fn show_error(&mut self, reason: &str) {
        warn!(%reason, "refactoring not applied");
        self.errors.push(reason.to_string());
    }

    fn ask_user_choice(&mut self, options: &[String]) -> Option<usize> {
        self.prompter.choose(options)
    }

    fn ask_user_input(&mut self, default: Option<&str>) -> Option<String> {
        self.prompter.input(default)
    }

    fn move_cursor_to(&mut self, position: Position) {
        self.selection = Selection::cursor_at_position(position);
    }

    fn write_in(&mut self, file: &Path, code: &str) -> Result<(), EditorError> {
        if file == self.file {
            return self.write(code, None);
        }
        self.others.insert(file.to_path_buf(), code.to_string());
        Ok(())
    }

    fn code_of(&self, file: &Path) -> Result<String, EditorError> {
        if file == self.file {
            return Ok(self.code.clone());
        }
        self.others
            .get(file)
            .cloned()
            .ok_or_else(|| EditorError::UnknownFile {
                path: file.to_path_buf(),
            })
    }

    fn workspace_files(&self) -> Result<Vec<PathBuf>, EditorError> {
        Ok(std::iter::once(self.file.clone())
            .chain(self.others.keys().cloned())
            .collect())
    }
}

use super::{Editor, EditorError, Prompter, TerminalPrompter};
use crate::edit::{atomic_write, EditError, Fingerprint};
use crate::position::Position;
use crate::safety::WorkspaceGuard;
use crate::selection::Selection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extensions of the files the TSX grammar can parse.
const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Content of one file before and after the edits made through a [`FileEditor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub before: String,
    pub after: String,
}

/// An editor over a file on disk, inside a guarded workspace.
///
/// Every write checks that the file still has the content it was read with,
/// then replaces it atomically. In dry-run mode writes are only recorded.
pub struct FileEditor {
    path: PathBuf,
    guard: WorkspaceGuard,
    code: String,
    selection: Selection,
    ignored_folders: Vec<String>,
    dry_run: bool,
    prompter: Box<dyn Prompter>,
    errors: Vec<String>,
    /// Fingerprint of each touched file as first read from disk.
    fingerprints: BTreeMap<PathBuf, Fingerprint>,
    /// Original and current content of each written file.
    changes: BTreeMap<PathBuf, (String, String)>,
}

fn read(path: &Path) -> Result<String, EditorError> {
    fs::read_to_string(path).map_err(|source| EditorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl FileEditor {
    /// Open `file` for editing within `workspace_root`.
    pub fn open(
        file: impl AsRef<Path>,
        workspace_root: impl AsRef<Path>,
        selection: Selection,
    ) -> Result<Self, EditorError> {
        let guard = WorkspaceGuard::new(workspace_root)?;
        let path = guard.validate_path(file)?;
        let code = read(&path)?;
        debug!(file = %path.display(), bytes = code.len(), "opened file");

        let mut fingerprints = BTreeMap::new();
        fingerprints.insert(path.clone(), Fingerprint::of(&code));

        Ok(Self {
            path,
            guard,
            code,
            selection,
            ignored_folders: Vec::new(),
            dry_run: false,
            prompter: Box::new(TerminalPrompter),
            errors: Vec::new(),
            fingerprints,
            changes: BTreeMap::new(),
        })
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    /// Folder names skipped when listing workspace files.
    pub fn with_ignored_folders(mut self, folders: Vec<String>) -> Self {
        self.ignored_folders = folders;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        self.guard.workspace_root()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Files changed so far, in path order.
    pub fn changes(&self) -> Vec<FileChange> {
        self.changes
            .iter()
            .filter(|(_, (before, after))| before != after)
            .map(|(path, (before, after))| FileChange {
                path: path.clone(),
                before: before.clone(),
                after: after.clone(),
            })
            .collect()
    }

    fn store(&mut self, path: &Path, code: &str) -> Result<(), EditorError> {
        let on_disk = read(path)?;
        let fingerprint = *self
            .fingerprints
            .entry(path.to_path_buf())
            .or_insert_with(|| Fingerprint::of(&on_disk));

        if !self.dry_run {
            // a previous real write updated the fingerprint, so this only
            // trips on edits made behind our back
            if !fingerprint.matches(&on_disk) {
                return Err(EditError::ChangedOnDisk {
                    file: path.display().to_string(),
                }
                .into());
            }
            atomic_write(path, code.as_bytes())?;
            self.fingerprints
                .insert(path.to_path_buf(), Fingerprint::of(code));
            info!(file = %path.display(), bytes = code.len(), "wrote file");
        } else {
            debug!(file = %path.display(), "dry run, write skipped");
        }

        self.changes
            .entry(path.to_path_buf())
            .and_modify(|(_, after)| *after = code.to_string())
            .or_insert_with(|| (on_disk, code.to_string()));
        Ok(())
    }

    fn is_ignored(&self, name: &str) -> bool {
        name == "node_modules"
            || (name.starts_with('.') && name.len() > 1)
            || self.ignored_folders.iter().any(|folder| folder == name)
    }
}

impl Editor for FileEditor {
    fn current_file(&self) -> &Path {
        &self.path
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn write(&mut self, code: &str, cursor: Option<Position>) -> Result<(), EditorError> {
        let path = self.path.clone();
        self.store(&path, code)?;
        self.code = code.to_string();
        if let Some(cursor) = cursor {
            self.selection = Selection::cursor_at_position(cursor);
        }
        Ok(())
    }

    fn show_error(&mut self, reason: &str) {
        warn!(file = %self.path.display(), %reason, "refactoring not applied");
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
        let path = self.guard.validate_path(file)?;
        if path == self.path {
            return self.write(code, None);
        }
        self.store(&path, code)
    }

    fn code_of(&self, file: &Path) -> Result<String, EditorError> {
        let path = self.guard.validate_path(file)?;
        if path == self.path {
            return Ok(self.code.clone());
        }
        // dry runs never reach the disk, so pending content wins
        if let Some((_, after)) = self.changes.get(&path) {
            return Ok(after.clone());
        }
        read(&path)
    }

    fn workspace_files(&self) -> Result<Vec<PathBuf>, EditorError> {
        let root = self.guard.workspace_root();
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !entry
                        .file_name()
                        .to_str()
                        .map(|name| self.is_ignored(name))
                        .unwrap_or(false)
            });

        for entry in walker {
            let entry = entry.map_err(|error| EditorError::Io {
                path: error.path().unwrap_or(root).to_path_buf(),
                source: error.into(),
            })?;
            let is_source = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
                .unwrap_or(false);
            if entry.file_type().is_file() && is_source {
                files.push(entry.into_path());
            }
        }
        debug!(count = files.len(), "listed workspace files");
        Ok(files)
    }
}

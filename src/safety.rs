use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keeps file edits inside the project being refactored.
///
/// Installed dependencies and package-manager caches look like ordinary
/// JavaScript sources but must never be rewritten.
#[derive(Debug, Clone)]
pub struct WorkspaceGuard {
    /// Canonical workspace root
    workspace_root: PathBuf,
    /// Canonical forbidden directories
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is outside workspace: {path} (workspace: {workspace})")]
    OutsideWorkspace { path: PathBuf, workspace: PathBuf },

    #[error("Path is in forbidden directory: {path} (forbidden: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

/// Package-manager caches under the home directory.
const HOME_CACHES: &[&str] = &[".npm", ".yarn", ".pnpm-store", ".bun/install/cache"];

/// Directories inside the workspace that hold installed or generated code.
const WORKSPACE_FORBIDDEN: &[&str] = &["node_modules", ".git"];

impl WorkspaceGuard {
    pub fn new(workspace_root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let workspace_root = workspace_root.as_ref().canonicalize()?;

        let mut forbidden_paths = Vec::new();
        if let Some(home) = home::home_dir() {
            forbidden_paths.extend(
                HOME_CACHES
                    .iter()
                    .filter_map(|cache| home.join(cache).canonicalize().ok()),
            );
        }
        forbidden_paths.extend(
            WORKSPACE_FORBIDDEN
                .iter()
                .filter_map(|dir| workspace_root.join(dir).canonicalize().ok()),
        );

        Ok(Self {
            workspace_root,
            forbidden_paths,
        })
    }

    /// Check if a path is safe to edit and return its canonical form.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };

        let canonical = absolute.canonicalize()?;
        self.check_canonical(&canonical)?;
        Ok(canonical)
    }

    fn check_canonical(&self, canonical: &Path) -> Result<(), SafetyError> {
        if !canonical.starts_with(&self.workspace_root) {
            return Err(SafetyError::OutsideWorkspace {
                path: canonical.to_path_buf(),
                workspace: self.workspace_root.clone(),
            });
        }

        // nested node_modules are forbidden wherever they appear
        let relative = canonical.strip_prefix(&self.workspace_root).unwrap_or(canonical);
        if let Some(nested) = relative
            .components()
            .find(|c| c.as_os_str() == "node_modules")
        {
            return Err(SafetyError::ForbiddenPath {
                path: canonical.to_path_buf(),
                forbidden: PathBuf::from(nested.as_os_str()),
            });
        }

        for forbidden in &self.forbidden_paths {
            if canonical.starts_with(forbidden) {
                return Err(SafetyError::ForbiddenPath {
                    path: canonical.to_path_buf(),
                    forbidden: forbidden.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

use crate::naming::{is_valid_identifier, DEFAULT_NAME};
use crate::refactoring::known_ids;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contents of `.jsrefactor.toml`.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub refactorings: RefactoringsConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Folder names skipped when listing workspace files, on top of
    /// `node_modules` and hidden folders.
    #[serde(default)]
    pub ignored_folders: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RefactoringsConfig {
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    #[serde(default = "default_name")]
    pub default_name: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            default_name: default_name(),
        }
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for id in &self.refactorings.disabled {
            if !known_ids().any(|known| known == id.as_str()) {
                issues.push(ValidationIssue::UnknownRefactoring { id: id.clone() });
            }
        }

        if !is_valid_identifier(&self.extract.default_name) {
            issues.push(ValidationIssue::InvalidName {
                field: "extract.default_name",
                value: self.extract.default_name.clone(),
            });
        }

        for folder in &self.workspace.ignored_folders {
            if folder.trim().is_empty() || folder.contains(['/', '\\']) {
                issues.push(ValidationIssue::InvalidFolder {
                    value: folder.clone(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    UnknownRefactoring { id: String },
    InvalidName { field: &'static str, value: String },
    InvalidFolder { value: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownRefactoring { id } => {
                write!(f, "unknown refactoring '{id}' in refactorings.disabled")
            }
            ValidationIssue::InvalidName { field, value } => {
                write!(f, "'{value}' is not a valid identifier for '{field}'")
            }
            ValidationIssue::InvalidFolder { value } => {
                write!(f, "ignored folder '{value}' must be a single folder name")
            }
        }
    }
}

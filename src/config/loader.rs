use crate::config::schema::{Config, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up at the workspace root.
pub const CONFIG_FILE: &str = ".jsrefactor.toml";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Io { .. } => self,
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config from {}: {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse config TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse config TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid config ({}): {}", path.display(), source),
                None => write!(f, "invalid config: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<Config, ConfigError> {
    let config: Config = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

/// Config of the workspace at `root`, defaults when it has none.
pub fn load_or_default(root: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = root.as_ref().join(CONFIG_FILE);
    if !path.is_file() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    debug!(path = %path.display(), "loading config");
    load_from_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_every_section() {
        let config = load_from_str(
            r#"
[workspace]
ignored_folders = ["dist"]

[refactorings]
disabled = ["flip-if-else"]

[extract]
default_name = "value"
"#,
        )
        .unwrap();
        assert_eq!(config.workspace.ignored_folders, vec!["dist"]);
        assert_eq!(config.refactorings.disabled, vec!["flip-if-else"]);
        assert_eq!(config.extract.default_name, "value");
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = load_from_str("[workspace]\n").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = load_from_str("[extract]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(error, ConfigError::Toml { path: None, .. }));
    }

    #[test]
    fn validation_errors_carry_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[refactorings]\ndisabled = [\"nope\"]\n").unwrap();

        let error = load_or_default(dir.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Validation { path: Some(_), .. }));
        assert!(error.to_string().contains("unknown refactoring 'nope'"));
    }

    #[test]
    fn absent_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_or_default(dir.path()).unwrap(), Config::default());
    }
}

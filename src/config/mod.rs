pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, load_or_default, ConfigError, CONFIG_FILE};
pub use schema::{
    Config, ExtractConfig, RefactoringsConfig, ValidationError, ValidationIssue, WorkspaceConfig,
};

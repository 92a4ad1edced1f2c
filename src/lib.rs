//! jsrefactor: cursor-driven refactorings for JavaScript and TypeScript
//!
//! Each refactoring parses the buffer with tree-sitter, finds the node the
//! selection designates and describes its edit as a set of non-overlapping
//! [`Modification`]s. Modifications are applied to the original text in a
//! single pass, so everything outside the edited ranges keeps its formatting.
//!
//! # Architecture
//!
//! Refactorings never touch files directly. They talk to an [`Editor`], which
//! owns the buffer, the selection and the user prompts. [`InMemoryEditor`]
//! backs tests and embedding; [`FileEditor`] works on files inside a guarded
//! workspace with atomic writes.
//!
//! # Safety
//!
//! - Overlapping modifications are rejected before anything is written
//! - Output that adds syntax errors is never written
//! - Files changed on disk since they were read are not overwritten
//! - Writes stay inside the workspace root
//!
//! # Example
//!
//! ```no_run
//! use jsrefactor::{Editor, InMemoryEditor, Outcome, Registry};
//!
//! let mut editor = InMemoryEditor::new("if (a [cursor]== b) {}");
//! let outcome = Registry::default().execute("flip-operator", &mut editor)?;
//! assert_eq!(outcome, Outcome::Applied);
//! assert_eq!(editor.code(), "if (b == a) {}");
//! # Ok::<(), jsrefactor::RefactorError>(())
//! ```

pub mod config;
pub mod edit;
pub mod editor;
pub mod line_index;
pub mod naming;
pub mod occurrence;
pub mod pool;
pub mod position;
pub mod refactoring;
pub mod safety;
pub mod selection;
pub mod ts;

// Re-exports
pub use config::{load_from_path, load_from_str, load_or_default, Config, ConfigError};
pub use edit::{apply_modifications, EditError, Modification, TextPatch};
pub use editor::{
    Editor, EditorError, FileChange, FileEditor, InMemoryEditor, Prompter, ScriptedPrompter,
    TerminalPrompter,
};
pub use position::Position;
pub use refactoring::{Outcome, RefactorContext, RefactorError, Refactoring, Registry};
pub use safety::{SafetyError, WorkspaceGuard};
pub use selection::Selection;
pub use ts::{closest_match, find_references, CodeReference, Match, SyntaxNode, TreeSitterError};

//! Tree-sitter integration for JavaScript and TypeScript buffers.
//!
//! This module owns everything that touches the concrete syntax tree: parsing
//! with the TSX grammar, the [`SyntaxNode`] view over tree-sitter nodes, the
//! closest-match locator, the node-level edit operations and the syntax
//! validation run before refactoring output is written.

pub mod errors;
pub mod locator;
pub mod node;
pub mod parser;
pub mod precedence;
pub mod references;
pub mod transform;
pub mod validator;

pub use errors::TreeSitterError;
pub use locator::{closest_match, Match};
pub use node::{AstPosition, NodeKind, SourceLocation, SyntaxNode};
pub use parser::{parse, JsParser, SyntaxTree};
pub use references::{find_references, CodeReference};
pub use validator::{introduced_errors, validate_syntax};

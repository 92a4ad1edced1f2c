//! Node-level edit operations.
//!
//! Refactorings never splice text themselves: they describe edits in terms of
//! the nodes they matched and these operations turn them into
//! [`Modification`]s over the original buffer. Everything outside the
//! returned ranges keeps its original formatting.

use crate::edit::Modification;
use crate::position::Position;
use crate::selection::Selection;
use crate::ts::node::SyntaxNode;

/// Replace `node` with `code`.
pub fn replace_node(node: &SyntaxNode<'_>, code: impl Into<String>) -> Modification {
    Modification::new(node.range(), code)
}

/// Replace `node` with several pieces of code, one after the other.
///
/// Pieces are joined with `separator`, typically a newline followed by the
/// indentation of the replaced node.
pub fn replace_with_multiple(
    node: &SyntaxNode<'_>,
    pieces: &[String],
    separator: &str,
) -> Modification {
    Modification::new(node.range(), pieces.join(separator))
}

/// Remove `node`.
///
/// A node standing alone on its lines takes those lines with it, indentation
/// and line break included, so no blank line is left behind.
pub fn remove_node(node: &SyntaxNode<'_>) -> Modification {
    Modification::deletion(removal_range(node))
}

/// Insert `code` right before `node`, followed by `separator`.
pub fn insert_before(node: &SyntaxNode<'_>, code: &str, separator: &str) -> Modification {
    Modification::insertion(node.start(), format!("{code}{separator}"))
}

/// Insert `code` right after `node`, preceded by `separator`.
pub fn insert_after(node: &SyntaxNode<'_>, code: &str, separator: &str) -> Modification {
    Modification::insertion(node.end(), format!("{separator}{code}"))
}

fn removal_range(node: &SyntaxNode<'_>) -> Selection {
    let source = node.source();
    let range = node.byte_range();
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[range.end..]
        .find('\n')
        .map_or(source.len(), |i| range.end + i);

    let alone_before = source[line_start..range.start].trim().is_empty();
    let alone_after = source[range.end..line_end].trim().is_empty();
    if !(alone_before && alone_after) {
        return node.range();
    }

    let start = node.start().put_at_start_of_line();
    if line_end < source.len() {
        Selection::from_positions(start, Position::new(node.end().line + 1, 0))
    } else if start.line > 0 {
        // last line of the buffer: eat the preceding line break instead
        Selection::from_positions(
            Position::new(start.line - 1, 0).put_at_end_of_line(),
            node.end().put_at_end_of_line(),
        )
    } else {
        Selection::from_positions(start, node.end().put_at_end_of_line())
    }
}

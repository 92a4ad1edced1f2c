use crate::position::Position;
use crate::ts::node::{SourceLocation, SyntaxNode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (start, end) pair of positions. Degenerates to a cursor when start == end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    /// Build a selection from two positions, swapping them if needed so that
    /// `start <= end` always holds.
    pub fn from_positions(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self::from_positions(Position::new(start.0, start.1), Position::new(end.0, end.1))
    }

    pub fn cursor_at(line: usize, character: usize) -> Self {
        Self::cursor_at_position(Position::new(line, character))
    }

    pub fn cursor_at_position(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Convert a parser location to an engine selection.
    ///
    /// Parser lines are 1-based, engine lines are 0-based. Columns are 0-based on
    /// both sides.
    pub fn from_ast(loc: &SourceLocation) -> Self {
        Self::from_positions(
            Position::new(loc.start.line.saturating_sub(1), loc.start.column),
            Position::new(loc.end.line.saturating_sub(1), loc.end.column),
        )
    }

    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }

    pub fn is_empty(&self) -> bool {
        self.is_cursor()
    }

    pub fn is_multi_lines(&self) -> bool {
        self.start.line != self.end.line
    }

    /// Number of lines covered, minus one.
    pub fn height(&self) -> usize {
        self.end.line.saturating_sub(self.start.line)
    }

    /// Character span on the start line. Zero for multi-line selections ending
    /// before their start column.
    pub fn width(&self) -> usize {
        self.end.character.saturating_sub(self.start.character)
    }

    /// Whether `self` lies fully within `other`.
    pub fn is_inside(&self, other: &Selection) -> bool {
        self.start.is_after(&other.start) && self.end.is_before(&other.end)
    }

    /// Whether the two ranges share at least one position.
    pub fn intersects(&self, other: &Selection) -> bool {
        self.start.is_before(&other.end) && other.start.is_before(&self.end)
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.is_after(&self.start) && position.is_before(&self.end)
    }

    /// Whether this selection designates `node`.
    ///
    /// A cursor designates a node when it sits within the node's range, bounds
    /// included. A non-empty selection designates every node whose range it
    /// intersects. Unselectable nodes are never designated.
    pub fn is_inside_path(&self, node: &SyntaxNode<'_>) -> bool {
        let Some(loc) = node.loc() else {
            return false;
        };
        let range = Selection::from_ast(&loc);
        if self.is_cursor() {
            range.contains(&self.start)
        } else {
            self.intersects(&range)
        }
    }

    /// Whether this selection lies fully within `node`.
    pub fn is_inside_node(&self, node: &SyntaxNode<'_>) -> bool {
        node.loc()
            .map(|loc| self.is_inside(&Selection::from_ast(&loc)))
            .unwrap_or(false)
    }

    /// Merge: keeps this start and takes the end of `other`.
    #[must_use]
    pub fn extend_start_to_end_of(self, other: Selection) -> Self {
        Self::from_positions(self.start, other.end)
    }

    /// Indentation level of the line this selection starts on, given the code.
    pub fn get_indentation_level(&self, code: &str) -> usize {
        code.split('\n')
            .nth(self.start.line)
            .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
            .unwrap_or(0)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cursor() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} -> {}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::node::AstPosition;
    use crate::ts::parser::parse;
    use proptest::prelude::*;

    fn loc(start: (usize, usize), end: (usize, usize)) -> SourceLocation {
        SourceLocation {
            start: AstPosition {
                line: start.0,
                column: start.1,
            },
            end: AstPosition {
                line: end.0,
                column: end.1,
            },
        }
    }

    #[test]
    fn from_ast_shifts_lines_only() {
        let selection = Selection::from_ast(&loc((1, 0), (3, 7)));
        assert_eq!(selection.start, Position::new(0, 0));
        assert_eq!(selection.end, Position::new(2, 7));
    }

    #[test]
    fn from_ast_on_first_line_of_file() {
        let selection = Selection::from_ast(&loc((1, 4), (1, 9)));
        assert_eq!(selection, Selection::new((0, 4), (0, 9)));
        assert_eq!(selection.width(), 5);
        assert_eq!(selection.height(), 0);
    }

    #[test]
    fn from_positions_normalizes_order() {
        let selection = Selection::from_positions(Position::new(3, 1), Position::new(1, 2));
        assert_eq!(selection.start, Position::new(1, 2));
        assert_eq!(selection.end, Position::new(3, 1));
    }

    #[test]
    fn swapped_ends_have_no_height() {
        let selection = Selection {
            start: Position::new(3, 0),
            end: Position::new(1, 0),
        };
        assert_eq!(selection.height(), 0);
        assert_eq!(selection.width(), 0);
    }

    #[test]
    fn cursor_properties() {
        let cursor = Selection::cursor_at(2, 4);
        assert!(cursor.is_cursor());
        assert!(!cursor.is_multi_lines());
        assert_eq!(cursor.height(), 0);
        assert_eq!(cursor.width(), 0);
    }

    #[test]
    fn containment_is_inclusive() {
        let outer = Selection::new((0, 0), (2, 5));
        assert!(Selection::new((0, 0), (2, 5)).is_inside(&outer));
        assert!(Selection::cursor_at(2, 5).is_inside(&outer));
        assert!(!Selection::cursor_at(2, 6).is_inside(&outer));
    }

    #[test]
    fn extend_start_to_end_of_merges() {
        let first = Selection::new((1, 2), (1, 8));
        let second = Selection::new((3, 0), (4, 1));
        assert_eq!(
            first.extend_start_to_end_of(second),
            Selection::new((1, 2), (4, 1))
        );
    }

    #[test]
    fn indentation_level_reads_code() {
        let code = "if (a) {\n    b();\n}";
        assert_eq!(Selection::cursor_at(1, 6).get_indentation_level(code), 4);
        assert_eq!(Selection::cursor_at(0, 2).get_indentation_level(code), 0);
    }

    #[test]
    fn is_inside_path_for_non_empty_selection_intersects() {
        let source = "const total = price * quantity;";
        let tree = parse(source).unwrap();
        let binary = tree
            .root()
            .descendants()
            .find(|n| n.kind_name() == "binary_expression")
            .unwrap();

        // `total = pr` overlaps the start of `price * quantity`
        assert!(Selection::new((0, 6), (0, 16)).is_inside_path(&binary));
        assert!(!Selection::new((0, 0), (0, 5)).is_inside_path(&binary));
        assert!(!Selection::new((0, 6), (0, 16)).is_inside_node(&binary));
    }

    proptest! {
        #[test]
        fn cursor_inside_path_iff_within_bounds(x in 0usize..40) {
            let source = "let value = first + second;            ";
            let tree = parse(source).unwrap();
            let binary = tree
                .root()
                .descendants()
                .find(|n| n.kind_name() == "binary_expression")
                .unwrap();
            let range = Selection::from_ast(&binary.loc().unwrap());
            let cursor = Selection::cursor_at(0, x);
            let expected = range.start.character <= x && x <= range.end.character;
            prop_assert_eq!(cursor.is_inside_path(&binary), expected);
        }
    }
}

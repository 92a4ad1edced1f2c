use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Character used by [`Position::put_at_end_of_line`].
///
/// The real width of a line is unknown without the buffer, so the end of a line
/// is represented by a character offset no line will ever reach.
pub const END_OF_LINE_CHARACTER: usize = 10_000;

/// A (line, character) coordinate in a text buffer.
///
/// Both components are 0-based. `character` counts UTF-16 code units, which is
/// what editors report for cursor columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// Parse a 1-based `LINE:COLUMN` pair, as printed by compilers and accepted
    /// on the command line.
    pub fn parse_one_based(input: &str) -> Option<Self> {
        let (line, column) = input.trim().split_once(':')?;
        let line: usize = line.trim().parse().ok()?;
        let column: usize = column.trim().parse().ok()?;
        if line == 0 || column == 0 {
            return None;
        }
        Some(Self::new(line - 1, column - 1))
    }

    /// Render as a 1-based `LINE:COLUMN` pair.
    pub fn to_one_based(self) -> String {
        format!("{}:{}", self.line + 1, self.character + 1)
    }

    /// `self <= other`.
    ///
    /// Reflexive: a position is both before and after itself.
    pub fn is_before(&self, other: &Position) -> bool {
        self <= other
    }

    /// `self >= other`.
    ///
    /// Reflexive: a position is both before and after itself.
    pub fn is_after(&self, other: &Position) -> bool {
        self >= other
    }

    pub fn is_strictly_before(&self, other: &Position) -> bool {
        self < other
    }

    pub fn is_strictly_after(&self, other: &Position) -> bool {
        self > other
    }

    pub fn is_equal_to(&self, other: &Position) -> bool {
        self == other
    }

    #[must_use]
    pub fn put_at_start_of_line(self) -> Self {
        Self::new(self.line, 0)
    }

    #[must_use]
    pub fn put_at_end_of_line(self) -> Self {
        Self::new(self.line, END_OF_LINE_CHARACTER)
    }

    #[must_use]
    pub fn add_lines(self, lines: usize) -> Self {
        Self::new(self.line + lines, self.character)
    }

    #[must_use]
    pub fn remove_lines(self, lines: usize) -> Self {
        Self::new(self.line.saturating_sub(lines), self.character)
    }

    #[must_use]
    pub fn add_characters(self, characters: usize) -> Self {
        Self::new(self.line, self.character + characters)
    }

    #[must_use]
    pub fn remove_characters(self, characters: usize) -> Self {
        Self::new(self.line, self.character.saturating_sub(characters))
    }

    /// Advance past `text` as if it had been typed at this position.
    #[must_use]
    pub fn advance_by(self, text: &str) -> Self {
        let mut lines = text.split('\n');
        let first = lines.next().unwrap_or_default();
        let mut position = self.add_characters(utf16_len(first));
        for line in lines {
            position = Self::new(position.line + 1, utf16_len(line));
        }
        position
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.character.cmp(&other.character))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.character)
    }
}

/// Number of UTF-16 code units in `text`.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

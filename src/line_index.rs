use crate::position::{utf16_len, Position};

/// Position ↔ byte offset conversion over a borrowed text.
///
/// Line starts are computed once; column conversion walks the single line
/// involved because positions count UTF-16 code units while the text is UTF-8.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset of the start of each line. Index 0 is always 0.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Text of `line`, without its terminating newline.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        Some(&self.text[start..end])
    }

    /// Byte offset of `position`.
    ///
    /// Characters past the end of the line clamp to the end of the line (before
    /// the newline), lines past the end of the text clamp to the end of the text.
    #[must_use]
    pub fn offset_of(&self, position: Position) -> usize {
        let Some(line) = self.line_text(position.line) else {
            return self.text.len();
        };
        let line_start = self.line_starts[position.line];
        let mut units = 0;
        for (byte, ch) in line.char_indices() {
            if units >= position.character {
                return line_start + byte;
            }
            units += ch.len_utf16();
        }
        line_start + line.len()
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    #[must_use]
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        let prefix = self.text.get(line_start..offset).unwrap_or_default();
        Position::new(line, utf16_len(prefix))
    }

    /// Position just past the last character of the text.
    #[must_use]
    pub fn end_position(&self) -> Position {
        self.position_of(self.text.len())
    }

    pub fn text(&self) -> &'a str {
        self.text
    }
}

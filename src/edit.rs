//! Modifications and the single-pass text patcher.
//!
//! Every refactoring compiles down to a list of [`Modification`]s: a range of
//! the ORIGINAL buffer and the text that replaces it. [`TextPatch`] folds the
//! whole list into the original text in one linear walk, so ranges computed
//! against the original never go stale while earlier edits change lengths or
//! line counts.

use crate::line_index::LineIndex;
use crate::position::Position;
use crate::selection::Selection;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

/// An atomic replacement: `range` of the original buffer becomes `code`.
///
/// A cursor range makes the modification a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use = "Modification does nothing until it is patched into a buffer"]
pub struct Modification {
    pub range: Selection,
    pub code: String,
}

impl Modification {
    pub fn new(range: Selection, code: impl Into<String>) -> Self {
        Self {
            range,
            code: code.into(),
        }
    }

    pub fn insertion(at: Position, code: impl Into<String>) -> Self {
        Self::new(Selection::cursor_at_position(at), code)
    }

    pub fn deletion(range: Selection) -> Self {
        Self::new(range, String::new())
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("modifications overlap: {first} and {second}")]
    Overlapping { first: Selection, second: Selection },

    #[error("{file} changed on disk since it was read")]
    ChangedOnDisk { file: String },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated set of modifications over one original text.
#[derive(Debug)]
pub struct TextPatch<'a> {
    original: &'a str,
    /// Byte spans of the original, sorted by start then end, with their
    /// replacement text.
    spans: Vec<(Range<usize>, &'a str)>,
}

impl<'a> TextPatch<'a> {
    /// Resolve `modifications` against `original`.
    ///
    /// Modifications are sorted by start (then end); ties keep their given
    /// order. Overlapping ranges are rejected: they can only come from a
    /// refactoring computing conflicting edits.
    pub fn new(original: &'a str, modifications: &'a [Modification]) -> Result<Self, EditError> {
        let index = LineIndex::new(original);
        let mut ordered: Vec<&Modification> = modifications.iter().collect();
        ordered.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then(a.range.end.cmp(&b.range.end))
        });

        for window in ordered.windows(2) {
            let (earlier, later) = (window[0], window[1]);
            if earlier.range.end > later.range.start {
                return Err(EditError::Overlapping {
                    first: earlier.range,
                    second: later.range,
                });
            }
        }

        let spans = ordered
            .into_iter()
            .map(|m| {
                let start = index.offset_of(m.range.start);
                let end = index.offset_of(m.range.end).max(start);
                (start..end, m.code.as_str())
            })
            .collect();

        Ok(Self { original, spans })
    }

    /// Fold every modification into the original text.
    ///
    /// Copies the untouched span before each modification verbatim, then its
    /// replacement, then the remainder after the last one.
    pub fn apply(&self) -> String {
        let inserted: usize = self.spans.iter().map(|(_, code)| code.len()).sum();
        let mut output = String::with_capacity(self.original.len() + inserted);
        let mut copied_up_to = 0;

        for (span, code) in &self.spans {
            // spans sorted and disjoint, but clamp so a sentinel range can't go back
            let start = span.start.max(copied_up_to);
            output.push_str(&self.original[copied_up_to..start]);
            output.push_str(code);
            copied_up_to = span.end.max(start);
        }
        output.push_str(&self.original[copied_up_to..]);

        debug!(
            modifications = self.spans.len(),
            before = self.original.len(),
            after = output.len(),
            "patched buffer"
        );
        output
    }

    /// Where `position` of the original lands in `patched`.
    ///
    /// Positions shift by the size change of every modification ending at or
    /// before them. A position strictly inside a replaced range moves to the
    /// start of its replacement.
    pub fn reproject(&self, position: Position, patched: &str) -> Position {
        let offset = LineIndex::new(self.original).offset_of(position);
        let mut delta: isize = 0;
        let mut target = offset;

        for (span, code) in &self.spans {
            if span.end <= offset {
                delta += code.len() as isize - span.len() as isize;
            } else if span.start < offset {
                target = span.start;
                break;
            } else {
                break;
            }
        }

        let moved = (target as isize + delta).max(0) as usize;
        LineIndex::new(patched).position_of(moved)
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Apply `modifications` to `original` in one pass.
pub fn apply_modifications(
    original: &str,
    modifications: &[Modification],
) -> Result<String, EditError> {
    Ok(TextPatch::new(original, modifications)?.apply())
}

/// Content fingerprint used to detect on-disk changes between read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        Self(xxh3_64(text.as_bytes()))
    }

    pub fn matches(&self, text: &str) -> bool {
        *self == Self::of(text)
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the file is left untouched. The mtime is
/// bumped so file watchers notice the change.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    // Create tempfile in same directory to ensure same filesystem
    let parent = path.parent().ok_or_else(|| {
        EditError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        ))
    })?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
    }

    let mut temp = tempfile::NamedTempFile::new_in(if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    })?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    filetime::set_file_mtime(path, filetime::FileTime::now())?;
    Ok(())
}

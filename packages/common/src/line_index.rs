//! Offset ↔ position mapping
//!
//! Engine results carry byte offsets into the document text; editors speak
//! 1-based line/column coordinates where the column counts UTF-16 code units.
//! The index is rebuilt whenever a binding's text is replaced, so conversions
//! are pure arithmetic over the cached line starts.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// 1-based editor coordinate, column in UTF-16 code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Cached line-break index for one text snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of each line; always starts with 0
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Map a byte offset into `text` to an editor position.
    ///
    /// Offsets beyond the text are a caller bug (engine results always refer
    /// to the text that produced them); asserted in debug builds, clamped in
    /// release.
    pub fn position_at(&self, text: &str, offset: usize) -> Position {
        debug_assert!(offset <= text.len(), "offset {} beyond text", offset);
        let mut offset = offset.min(text.len());
        while offset > 0 && !text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column: usize = text[line_start..offset]
            .chars()
            .map(|c| c.len_utf16())
            .sum();

        Position::new(line as u32 + 1, column as u32 + 1)
    }

    /// Map an editor position back to a byte offset into `text`.
    ///
    /// A column past the line end clamps to the line end; a line past the
    /// last line clamps to the end of text.
    pub fn offset_at(&self, text: &str, position: Position) -> usize {
        let line = position.line.saturating_sub(1) as usize;
        if line >= self.line_starts.len() {
            return text.len();
        }

        let line_start = self.line_starts[line];
        // The line extends up to (not including) the \n, so a \r terminator
        // byte stays addressable and position_at round-trips on CRLF text
        let line_end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(text.len());

        let mut units = position.column.saturating_sub(1) as usize;
        let mut offset = line_start;
        for c in text[line_start..line_end].chars() {
            let width = c.len_utf16();
            if units < width {
                break;
            }
            units -= width;
            offset += c.len_utf8();
        }
        offset
    }

    /// Editor-convention word range around a cursor: the maximal run of
    /// word characters (`A-Za-z0-9`, `_`, `-`, `.`) containing `offset`,
    /// or the empty span at `offset` when the cursor touches no word.
    pub fn word_range_at(text: &str, offset: usize) -> Span {
        let bytes = text.as_bytes();
        let offset = offset.min(bytes.len());
        let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.';

        let mut start = offset;
        while start > 0 && is_word(bytes[start - 1]) {
            start -= 1;
        }
        let mut end = offset;
        while end < bytes.len() && is_word(bytes[end]) {
            end += 1;
        }
        Span::new(start, end)
    }
}

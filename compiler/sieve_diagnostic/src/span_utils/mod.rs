//! Line-position index.
//!
//! Maps byte offsets into a source unit to 1-based line and column numbers.
//! Used for diagnostics and for `#line` markers in the generated C.
//!
//! ```
//! use sieve_diagnostic::span_utils::LineOffsetTable;
//!
//! let source = "line1\nline2\nline3";
//! let table = LineOffsetTable::build(source);
//!
//! assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
//! assert_eq!(table.offset_to_line_col(source, 6), (2, 1));
//! assert_eq!(table.line_from_offset(13), 3);
//! ```

/// Pre-computed line start offsets, built once per unit and queried with a
/// binary search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineOffsetTable {
    /// `offsets[i]` is the byte offset where line `i + 1` starts. Always
    /// non-empty and strictly increasing.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line number containing `offset`.
    ///
    /// Offsets past the end of the text map to the last line.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).map_or(u32::MAX, |idx| idx + 1)
    }

    /// 1-based (line, column); the column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self.offsets[(line - 1) as usize] as usize;
        let end = (offset as usize).clamp(line_start, source.len().max(line_start));
        let col = source
            .get(line_start..end)
            .map_or(0, |text| text.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX) + 1)
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

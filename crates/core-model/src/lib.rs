//! Visual-line layout: the mapping from raw byte offsets to wrapped display
//! rows, plus the scroll window over those rows.
//!
//! The index is derived data. It is recomputed wholesale (a single O(n)
//! left-to-right scan) on every content mutation or viewport resize; edits
//! are interactive-speed, so rescanning is cheaper than keeping an
//! incremental structure honest.
//!
//! Invariants after every `rebuild`:
//! * visual lines are contiguous: `lines[i+1].start == lines[i].end` or
//!   `lines[i].end + 1` when a `\n` was consumed at the break;
//! * the union of `[start, end)` ranges covers `[0, content.len())`;
//! * `actual_line` is 1-based and does NOT advance at a wrap break;
//! * an empty buffer yields zero visual lines; callers treat a position on
//!   line 0 of an empty index as a raw byte offset.

use tracing::trace;

/// One on-screen row after word wrap. `start..end` is the byte range of the
/// row's content; `end` excludes the terminating newline (for a real line
/// break) or equals the next row's `start` (for a wrap break).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualLine {
    /// Index of this row within the index.
    pub index: usize,
    /// First content byte of the row.
    pub start: usize,
    /// One past the last content byte of the row.
    pub end: usize,
    /// 1-based source line number; shared by every wrapped fragment.
    pub actual_line: usize,
}

impl VisualLine {
    /// Row length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A position within the visual-line grid: row index + byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPos {
    pub line: usize,
    pub col: usize,
}

/// Wrapped-layout index over a byte buffer, with a scroll window.
///
/// `columns`/`rows` are the viewport's character capacity; one row is always
/// reserved for the status bar, so `rows - 1` text rows are usable. The
/// line-number gutter is subtracted from the wrap width.
#[derive(Debug, Clone)]
pub struct VisualLineIndex {
    lines: Vec<VisualLine>,
    visible_start: usize,
    visible_end: usize,
    columns: usize,
    text_rows: usize,
}

impl VisualLineIndex {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            lines: Vec::new(),
            visible_start: 0,
            visible_end: rows.saturating_sub(1),
            columns,
            text_rows: rows.saturating_sub(1),
        }
    }

    /// Rows available for text (viewport height minus the status row).
    pub fn text_rows(&self) -> usize {
        self.text_rows
    }

    pub fn lines(&self) -> &[VisualLine] {
        &self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&VisualLine> {
        self.lines.get(idx)
    }

    pub fn visible_range(&self) -> (usize, usize) {
        (self.visible_start, self.visible_end)
    }

    /// Update viewport geometry and re-derive the index.
    pub fn resize(&mut self, columns: usize, rows: usize, content: &[u8]) {
        self.columns = columns;
        self.text_rows = rows.saturating_sub(1);
        self.rebuild(content);
    }

    /// Re-derive the full index from `content` with the current geometry.
    pub fn rebuild(&mut self, content: &[u8]) {
        self.lines.clear();
        if content.is_empty() {
            self.clamp_window();
            return;
        }
        let gutter = gutter_width(content);
        // At least one content column even in absurdly narrow viewports.
        let capacity = self.columns.saturating_sub(gutter).max(1);
        let mut start = 0usize;
        let mut col = 0usize;
        let mut actual = 1usize;
        let mut i = 0usize;
        while i < content.len() {
            let b = content[i];
            if b == b'\n' {
                self.close_line(start, i, actual);
                actual += 1;
                start = i + 1;
                col = 0;
                i += 1;
                continue;
            }
            if col == capacity {
                // Wrap break: same actual line continues on the next row.
                self.close_line(start, i, actual);
                start = i;
                col = 0;
            }
            col += 1;
            i += 1;
        }
        // Always close a final row at end-of-content, including the empty
        // row after a trailing newline (the caret at `len` lives there).
        self.close_line(start, content.len(), actual);
        self.clamp_window();
        trace!(
            target: "model.layout",
            visual_lines = self.lines.len(),
            actual_lines = actual,
            capacity,
            "rebuild"
        );
    }

    fn close_line(&mut self, start: usize, end: usize, actual_line: usize) {
        let index = self.lines.len();
        self.lines.push(VisualLine {
            index,
            start,
            end,
            actual_line,
        });
    }

    /// Map a byte offset to its (row, column) in the grid.
    ///
    /// Linear scan; the rebuild already paid O(n). Offsets at a row's `end`
    /// (i.e. on the newline / at end-of-content) report column == row length.
    /// On an empty index the offset is its own column on row 0.
    pub fn position_of(&self, offset: usize) -> GridPos {
        if self.lines.is_empty() {
            return GridPos {
                line: 0,
                col: offset,
            };
        }
        for (i, l) in self.lines.iter().enumerate() {
            if offset < l.end {
                return GridPos {
                    line: i,
                    col: offset - l.start,
                };
            }
            if offset == l.end {
                // On a consumed newline (or at end-of-content) the offset
                // still belongs to this row; at a wrap break it belongs to
                // the next row's column 0 and the scan continues.
                let consumed_newline = match self.lines.get(i + 1) {
                    Some(next) => next.start == l.end + 1,
                    None => true,
                };
                if consumed_newline {
                    return GridPos { line: i, col: l.len() };
                }
            }
        }
        let last = self.lines[self.lines.len() - 1];
        GridPos {
            line: last.index,
            col: last.len(),
        }
    }

    /// Map a (row, column) back to a byte offset, clamping both axes.
    /// A row past the end maps to `content_len`; on an empty index the
    /// column is the offset.
    pub fn offset_at(&self, line: usize, col: usize, content_len: usize) -> usize {
        if self.lines.is_empty() {
            return col.min(content_len);
        }
        match self.lines.get(line) {
            Some(l) => (l.start + col.min(l.len())).min(content_len),
            None => content_len,
        }
    }

    /// First row whose `actual_line` equals the 1-based source line `n`
    /// (clamped to the last row when `n` is past the end).
    pub fn row_of_actual_line(&self, n: usize) -> usize {
        if self.lines.is_empty() {
            return 0;
        }
        self.lines
            .iter()
            .position(|l| l.actual_line >= n)
            .unwrap_or(self.lines.len() - 1)
    }

    /// Adjust the scroll window so the caret's row is visible.
    ///
    /// Recenter policy: when the caret escapes above the window, place it
    /// one-third of the text height below the new top; when it escapes below,
    /// one-third above the new bottom. Returns true when the window moved.
    pub fn scroll_if_needed(&mut self, caret_row: usize) -> bool {
        if self.lines.is_empty() || self.text_rows == 0 {
            return false;
        }
        let third = self.text_rows / 3;
        let before = self.visible_start;
        if caret_row <= self.visible_start {
            self.visible_start = caret_row.saturating_sub(third);
        } else if caret_row >= self.visible_end {
            self.visible_start = (caret_row + third).saturating_sub(self.text_rows);
        }
        self.clamp_window();
        if self.visible_start != before {
            trace!(
                target: "model.layout",
                caret_row,
                visible_start = self.visible_start,
                visible_end = self.visible_end,
                "scrolled"
            );
            true
        } else {
            false
        }
    }

    fn clamp_window(&mut self) {
        let last = self.lines.len().saturating_sub(1);
        // VisibleEnd never exceeds the last row; VisibleStart never negative
        // (usize) and never past what keeps a full window on screen.
        if self.visible_start + self.text_rows > last + 1 {
            self.visible_start = (last + 1).saturating_sub(self.text_rows);
        }
        self.visible_end = (self.visible_start + self.text_rows).min(last + 1);
    }
}

/// Width of the rendered line-number gutter: digits of the last source line
/// plus one padding column.
fn gutter_width(content: &[u8]) -> usize {
    let actual_lines = content.iter().filter(|&&b| b == b'\n').count() + 1;
    let mut digits = 1;
    let mut n = actual_lines;
    while n >= 10 {
        digits += 1;
        n /= 10;
    }
    digits + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_for(content: &[u8], columns: usize, rows: usize) -> VisualLineIndex {
        let mut idx = VisualLineIndex::new(columns, rows);
        idx.rebuild(content);
        idx
    }

    /// Union of [start,end) ranges must exactly cover [0,len) and rows must
    /// be contiguous, for any content and geometry.
    fn assert_coverage(idx: &VisualLineIndex, content: &[u8]) {
        let lines = idx.lines();
        if content.is_empty() {
            assert!(lines.is_empty());
            return;
        }
        assert_eq!(lines[0].start, 0);
        let mut covered = 0usize;
        for w in lines.windows(2) {
            let (a, b) = (w[0], w[1]);
            assert!(
                b.start == a.end || b.start == a.end + 1,
                "gap between rows {a:?} and {b:?}"
            );
            covered += a.len();
            if b.start == a.end + 1 {
                covered += 1; // consumed newline
            }
        }
        covered += lines[lines.len() - 1].len();
        assert_eq!(covered, content.len());
    }

    #[test]
    fn coverage_invariant_across_shapes() {
        let samples: [&[u8]; 6] = [
            b"",
            b"a",
            b"hello world\n",
            b"one\ntwo\nthree",
            b"a very long line that will certainly wrap several times over\n\nshort",
            b"\n\n\n",
        ];
        for content in samples {
            for cols in [8usize, 20, 80] {
                let idx = index_for(content, cols, 10);
                assert_coverage(&idx, content);
            }
        }
    }

    #[test]
    fn empty_buffer_yields_zero_lines() {
        let idx = index_for(b"", 80, 24);
        assert!(idx.lines().is_empty());
        // positions degrade to raw offsets
        assert_eq!(idx.position_of(3), GridPos { line: 0, col: 3 });
        assert_eq!(idx.offset_at(0, 3, 0), 0);
    }

    #[test]
    fn newline_closes_row_and_advances_actual_line() {
        let idx = index_for(b"ab\ncd", 80, 24);
        let lines = idx.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].start, lines[0].end, lines[0].actual_line), (0, 2, 1));
        assert_eq!((lines[1].start, lines[1].end, lines[1].actual_line), (3, 5, 2));
    }

    #[test]
    fn trailing_newline_leaves_an_empty_final_row() {
        let idx = index_for(b"ab\n", 80, 24);
        let lines = idx.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].is_empty());
        assert_eq!(lines[1].actual_line, 2);
        // caret at end-of-content lives on that row
        assert_eq!(idx.position_of(3), GridPos { line: 1, col: 0 });
    }

    #[test]
    fn wrap_does_not_advance_actual_line() {
        // gutter for 1 line = 2 cols, so capacity = 8 - 2 = 6
        let idx = index_for(b"abcdefghij", 8, 24);
        let lines = idx.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].start, lines[0].end), (0, 6));
        assert_eq!((lines[1].start, lines[1].end), (6, 10));
        assert_eq!(lines[0].actual_line, 1);
        assert_eq!(lines[1].actual_line, 1);
    }

    #[test]
    fn position_offset_round_trip() {
        let content = b"alpha\nbeta gamma\ndelta";
        let idx = index_for(content, 80, 24);
        for off in 0..=content.len() {
            let p = idx.position_of(off);
            assert_eq!(idx.offset_at(p.line, p.col, content.len()), off);
        }
    }

    #[test]
    fn offset_at_clamps_both_axes() {
        let content = b"ab\ncd";
        let idx = index_for(content, 80, 24);
        assert_eq!(idx.offset_at(0, 999, content.len()), 2); // column clamps to row len
        assert_eq!(idx.offset_at(99, 0, content.len()), 5); // row past end -> len
    }

    #[test]
    fn row_of_actual_line_finds_first_fragment() {
        // line 1 wraps into two rows; line 2 starts at row 2
        let idx = index_for(b"abcdefghij\nxy", 8, 24);
        assert_eq!(idx.row_of_actual_line(1), 0);
        assert_eq!(idx.row_of_actual_line(2), 2);
        assert_eq!(idx.row_of_actual_line(99), idx.lines().len() - 1);
    }

    #[test]
    fn scroll_recenters_one_third() {
        let content = "x\n".repeat(100);
        let mut idx = index_for(content.as_bytes(), 80, 10); // 9 text rows, third = 3
        assert_eq!(idx.visible_range(), (0, 9));
        // caret escapes below
        assert!(idx.scroll_if_needed(20));
        let (start, end) = idx.visible_range();
        assert_eq!(start, 20 + 3 - 9);
        assert_eq!(end, start + 9);
        // caret inside the window: no movement
        assert!(!idx.scroll_if_needed(start + 2));
        // caret escapes above
        assert!(idx.scroll_if_needed(start));
        let (start2, _) = idx.visible_range();
        assert_eq!(start2, start.saturating_sub(3));
    }

    #[test]
    fn scroll_window_clamps_to_content() {
        let content = "x\n".repeat(5);
        let mut idx = index_for(content.as_bytes(), 80, 10);
        idx.scroll_if_needed(5);
        let (start, end) = idx.visible_range();
        assert_eq!(start, 0);
        assert!(end <= idx.lines().len());
    }
}

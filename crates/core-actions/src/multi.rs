//! Multi-cursor commands: spawning extra carets and growing a selection
//! group over repeated occurrences.

use core_state::{Buffer, Cursor};
use tracing::debug;

/// Add a caret at (visual row, column). The row must exist; the column
/// clamps to the row's length. Used by mouse placement.
pub fn add_cursor_at(buf: &mut Buffer, line: usize, col: usize) {
    if buf.layout.line(line).is_none() {
        return;
    }
    let offset = buf.layout.offset_at(line, col, buf.len());
    buf.cursors.add(Cursor::caret(offset));
    debug!(target: "actions.multi", line, col, cursors = buf.cursors.len(), "add_cursor");
}

/// Add a caret one visual row below the bottom-most cursor, same column.
/// No-op when that cursor already sits on the last row.
pub fn add_cursor_next_line(buf: &mut Buffer) {
    let pos = buf.layout.position_of(buf.cursors.last().point);
    if pos.line + 1 >= buf.layout.lines().len() {
        return;
    }
    let offset = buf.layout.offset_at(pos.line + 1, pos.col, buf.len());
    buf.cursors.add(Cursor::caret(offset));
}

/// Add a caret one visual row above the top-most cursor, same column.
/// No-op on the first row.
pub fn add_cursor_previous_line(buf: &mut Buffer) {
    let pos = buf.layout.position_of(buf.cursors.primary().point);
    let Some(target) = pos.line.checked_sub(1) else {
        return;
    };
    let offset = buf.layout.offset_at(target, pos.col, buf.len());
    buf.cursors.add(Cursor::caret(offset));
}

/// Select the next occurrence of the bottom-most cursor's text as an
/// additional cursor.
///
/// With a selection, the selected bytes are the needle and the scan starts
/// at the selection's end. With a caret, the enclosing token's text is the
/// needle and the scan starts past that token. Matching is exact bytes; a
/// buffer with no further occurrence is a no-op.
pub fn another_selection_on_match(buf: &mut Buffer) {
    let c = buf.cursors.last();
    let (needle, from) = if c.is_caret() {
        let Some(idx) = core_text::token_at(&buf.tokens, c.point) else {
            return;
        };
        let t = buf.tokens[idx];
        (buf.slice(t.start, t.end).to_vec(), t.end)
    } else {
        (buf.slice(c.start(), c.end()).to_vec(), c.end())
    };
    if needle.is_empty() {
        return;
    }
    let Some(m) = core_search::find_next_exact(buf.content(), from, &needle) else {
        return;
    };
    // Match ends are inclusive; selections are half-open.
    buf.cursors.add(Cursor::selection(m.start, m.end + 1));
    debug!(
        target: "actions.multi",
        at = m.start,
        len = needle.len(),
        cursors = buf.cursors.len(),
        "select_next_occurrence"
    );
}

/// Collapse back to a single caret at the first cursor's start.
pub fn remove_all_cursors_but_one(buf: &mut Buffer) {
    buf.cursors.remove_all_but_one();
}

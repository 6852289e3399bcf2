//! Content-mutating commands: insertion, deletion, kill/cut/copy/paste,
//! indent.
//!
//! Multi-cursor arithmetic is the delicate part. Insertion processes
//! cursors in ascending order and pre-shifts cursor `i` right by `i` bytes
//! to account for the bytes earlier cursors already inserted in the same
//! call; deletion compensates every OTHER cursor after each splice. Skipping
//! either step corrupts every cursor after the edit point.

use core_state::Buffer;
use core_text::bytes::{line_end, line_start};
use tracing::trace;

use crate::{Clipboard, finish_edit};

/// Insert one byte at every cursor.
///
/// Existing selections are deleted first; typing over a selection always
/// replaces it. Each insertion records its own one-byte undo action.
pub fn insert_char(buf: &mut Buffer, byte: u8) {
    delete_selections(buf);
    let n = buf.cursors.len();
    for i in 0..n {
        let Some(mut c) = buf.cursors.get(i) else {
            break;
        };
        // Account for the bytes cursors 0..i inserted earlier in this call.
        c.shift_right(i);
        let at = c.start().min(buf.len());
        buf.splice_insert(at, &[byte]);
        c.collapse_to(at + 1);
        buf.cursors.set(i, c);
    }
    trace!(target: "actions.dispatch", op = "insert_char", byte, cursors = n, "edit");
    finish_edit(buf);
}

/// Delete every non-empty selection, collapsing each cursor to its start.
/// Returns true when anything was removed. Shared by backspace, delete, and
/// typed-char-over-selection.
pub fn delete_selections(buf: &mut Buffer) -> bool {
    let mut deleted = false;
    let n = buf.cursors.len();
    for i in 0..n {
        let Some(mut c) = buf.cursors.get(i) else {
            break;
        };
        if c.is_caret() {
            continue;
        }
        let (start, end) = (c.start(), c.end());
        let removed = buf.splice_remove(start, end);
        c.collapse_to(start);
        buf.cursors.set(i, c);
        // Mandatory offset compensation for everyone else.
        buf.cursors.compensate_delete_except(i, start, removed.len());
        deleted = true;
    }
    if deleted {
        buf.cursors.sort_and_dedupe();
    }
    deleted
}

/// Backspace: delete selections, else one byte left of each caret.
/// No-op for carets at offset 0.
pub fn delete_char_backward(buf: &mut Buffer) {
    if delete_selections(buf) {
        finish_edit(buf);
        return;
    }
    let n = buf.cursors.len();
    for i in 0..n {
        let Some(mut c) = buf.cursors.get(i) else {
            break;
        };
        let at = c.start();
        if at == 0 {
            continue;
        }
        buf.splice_remove(at - 1, at);
        c.collapse_to(at - 1);
        buf.cursors.set(i, c);
        buf.cursors.compensate_delete_except(i, at - 1, 1);
    }
    finish_edit(buf);
}

/// Forward delete: delete selections, else one byte at each caret.
/// No-op for carets at end of buffer.
pub fn delete_char_forward(buf: &mut Buffer) {
    if delete_selections(buf) {
        finish_edit(buf);
        return;
    }
    let n = buf.cursors.len();
    for i in 0..n {
        let Some(c) = buf.cursors.get(i) else {
            break;
        };
        let at = c.start();
        if at >= buf.len() {
            continue;
        }
        buf.splice_remove(at, at + 1);
        buf.cursors.compensate_delete_except(i, at, 1);
    }
    finish_edit(buf);
}

/// Delete from the enclosing/preceding token's start up to the caret.
/// Single-cursor only; records ONE undo action for the whole span.
pub fn delete_word_backward(buf: &mut Buffer) {
    if !buf.cursors.is_single() {
        return;
    }
    let c = buf.cursors.primary();
    let at = c.start();
    if at == 0 {
        return;
    }
    let start = match core_text::token_at(&buf.tokens, at - 1) {
        Some(idx) => buf.tokens[idx].start,
        None => 0,
    };
    buf.splice_remove(start, at);
    buf.cursors.primary_mut().collapse_to(start);
    finish_edit(buf);
}

/// Kill from the caret to the end of the visual content of its source line,
/// placing the killed bytes on the clipboard. At a line end the newline
/// itself is killed, joining the next line. Single-cursor only.
pub fn kill_line(buf: &mut Buffer, clip: &mut dyn Clipboard) {
    if !buf.cursors.is_single() {
        return;
    }
    let c = buf.cursors.primary();
    let at = c.start();
    let le = line_end(buf.content(), at);
    let end = if le == at { (at + 1).min(buf.len()) } else { le };
    if end == at {
        return;
    }
    let removed = buf.splice_remove(at, end);
    clip.write_text(&removed);
    buf.cursors.primary_mut().collapse_to(at);
    finish_edit(buf);
}

/// Copy the selection to the clipboard. Caret (no selection) is a no-op.
/// Single-cursor only; the selection is left in place.
pub fn copy(buf: &mut Buffer, clip: &mut dyn Clipboard) {
    if !buf.cursors.is_single() {
        return;
    }
    let c = buf.cursors.primary();
    if c.is_caret() {
        return;
    }
    clip.write_text(buf.slice(c.start(), c.end()));
}

/// Cut the selection to the clipboard. Single-cursor only.
pub fn cut(buf: &mut Buffer, clip: &mut dyn Clipboard) {
    if !buf.cursors.is_single() {
        return;
    }
    let c = buf.cursors.primary();
    if c.is_caret() {
        return;
    }
    let removed = buf.splice_remove(c.start(), c.end());
    clip.write_text(&removed);
    buf.cursors.primary_mut().collapse_to(c.start());
    finish_edit(buf);
}

/// Paste the clipboard at the caret, replacing any selection.
/// Single-cursor only; the caret lands after the pasted bytes.
pub fn paste(buf: &mut Buffer, clip: &mut dyn Clipboard) {
    if !buf.cursors.is_single() {
        return;
    }
    let data = clip.read_text();
    if data.is_empty() {
        return;
    }
    delete_selections(buf);
    let at = buf.cursors.primary().start().min(buf.len());
    buf.splice_insert(at, &data);
    buf.cursors.primary_mut().collapse_to(at + data.len());
    finish_edit(buf);
}

/// Insert `tab_size` spaces at the start of every source line touched by
/// each cursor's selection (or the caret's line).
pub fn indent(buf: &mut Buffer) {
    let pad = vec![b' '; buf.tab_size];
    let n = buf.cursors.len();
    for i in 0..n {
        let Some(c) = buf.cursors.get(i) else {
            break;
        };
        let mut ls = line_start(buf.content(), c.start());
        loop {
            buf.splice_insert(ls, &pad);
            for j in 0..buf.cursors.len() {
                if let Some(mut cj) = buf.cursors.get(j) {
                    cj.compensate_insert(ls, pad.len());
                    buf.cursors.set(j, cj);
                }
            }
            // More selected lines below?
            let cur = buf.cursors.get(i).unwrap_or(c);
            let le = line_end(buf.content(), ls);
            if le < buf.len() && le + 1 < cur.end() {
                ls = le + 1;
            } else {
                break;
            }
        }
    }
    finish_edit(buf);
}

/// Pop one undo record and reverse it. See [`Buffer::undo_last`] for the
/// empty-stack-marks-clean behavior.
pub fn undo(buf: &mut Buffer) -> bool {
    buf.undo_last()
}

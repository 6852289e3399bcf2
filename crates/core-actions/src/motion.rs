//! Cursor motion commands.
//!
//! Each motion exists in two flavors: the `point_*` form moves point and
//! mark together (collapsing any selection), the `mark_*` form moves only
//! the mark and thereby grows or shrinks the selection. Both flavors share
//! one target calculation; they differ only in which end they start from
//! and which fields they write.
//!
//! Vertical motion is visual: up/down step between wrapped rows of the
//! layout index, preserving the column where the target row is long enough
//! and clamping otherwise.

use core_state::Buffer;
use core_text::TokenKind;

use crate::finish_motion;

fn apply<F>(buf: &mut Buffer, extend: bool, target: F)
where
    F: Fn(&Buffer, usize) -> usize,
{
    let n = buf.cursors.len();
    for i in 0..n {
        let Some(mut c) = buf.cursors.get(i) else {
            break;
        };
        let from = if extend { c.mark } else { c.point };
        let to = target(buf, from);
        if extend {
            c.mark = to;
        } else {
            c.collapse_to(to);
        }
        buf.cursors.set(i, c);
    }
    finish_motion(buf);
}

fn left(_buf: &Buffer, from: usize) -> usize {
    from.saturating_sub(1)
}

fn right(buf: &Buffer, from: usize) -> usize {
    (from + 1).min(buf.len())
}

/// One visual row up or down, same column, clamped to the target row's
/// length. Returns `from` unchanged at the top/bottom edge.
fn vertical(buf: &Buffer, from: usize, down: bool) -> usize {
    let pos = buf.layout.position_of(from);
    let target_line = if down {
        if pos.line + 1 < buf.layout.lines().len() {
            pos.line + 1
        } else {
            return from;
        }
    } else {
        match pos.line.checked_sub(1) {
            Some(l) => l,
            None => return from,
        }
    };
    buf.layout.offset_at(target_line, pos.col, buf.len())
}

fn line_start(buf: &Buffer, from: usize) -> usize {
    core_text::bytes::line_start(buf.content(), from)
}

fn line_end(buf: &Buffer, from: usize) -> usize {
    core_text::bytes::line_end(buf.content(), from)
}

/// Start of the next Word token strictly after `from`; end of buffer when
/// none remains.
fn next_word(buf: &Buffer, from: usize) -> usize {
    buf.tokens
        .iter()
        .find(|t| t.kind == TokenKind::Word && t.start > from)
        .map(|t| t.start)
        .unwrap_or(buf.len())
}

/// Start of the nearest Word token strictly before `from`; offset 0 when
/// none exists.
fn prev_word(buf: &Buffer, from: usize) -> usize {
    buf.tokens
        .iter()
        .rev()
        .find(|t| t.kind == TokenKind::Word && t.start < from)
        .map(|t| t.start)
        .unwrap_or(0)
}

pub fn point_left(buf: &mut Buffer) {
    apply(buf, false, left);
}

pub fn point_right(buf: &mut Buffer) {
    apply(buf, false, right);
}

pub fn point_up(buf: &mut Buffer) {
    apply(buf, false, |b, f| vertical(b, f, false));
}

pub fn point_down(buf: &mut Buffer) {
    apply(buf, false, |b, f| vertical(b, f, true));
}

pub fn point_line_start(buf: &mut Buffer) {
    apply(buf, false, line_start);
}

pub fn point_line_end(buf: &mut Buffer) {
    apply(buf, false, line_end);
}

pub fn point_word_forward(buf: &mut Buffer) {
    apply(buf, false, next_word);
}

pub fn point_word_backward(buf: &mut Buffer) {
    apply(buf, false, prev_word);
}

pub fn mark_left(buf: &mut Buffer) {
    apply(buf, true, left);
}

pub fn mark_right(buf: &mut Buffer) {
    apply(buf, true, right);
}

pub fn mark_up(buf: &mut Buffer) {
    apply(buf, true, |b, f| vertical(b, f, false));
}

pub fn mark_down(buf: &mut Buffer) {
    apply(buf, true, |b, f| vertical(b, f, true));
}

pub fn mark_line_start(buf: &mut Buffer) {
    apply(buf, true, line_start);
}

pub fn mark_line_end(buf: &mut Buffer) {
    apply(buf, true, line_end);
}

pub fn mark_word_forward(buf: &mut Buffer) {
    apply(buf, true, next_word);
}

pub fn mark_word_backward(buf: &mut Buffer) {
    apply(buf, true, prev_word);
}

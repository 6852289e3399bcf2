//! Editing commands over a [`core_state::Buffer`].
//!
//! Every command is a plain function over `(&mut Buffer, args)`; the engine
//! stays keymap-agnostic and the `dispatcher` module maps resolved
//! [`core_keymap::CommandId`]s onto these functions. Commands follow a
//! shared contract:
//!
//! * mutating commands act on ALL cursors in ascending `start()` order,
//!   except the clipboard commands (kill/cut/copy/paste) and word-delete,
//!   which are no-ops on a multi-cursor buffer: "kill to clipboard" does
//!   not generalize safely to several simultaneous clipboard targets;
//! * editing over a selection always replaces it;
//! * out-of-range requests clamp; commands are idempotent no-ops when the
//!   invariant they would establish already holds;
//! * after its mutation batch a command refreshes derived state once and
//!   scrolls the primary cursor into view.

pub mod clipboard;
pub mod dispatcher;
pub mod edit;
pub mod isearch;
pub mod motion;
pub mod multi;

pub use clipboard::{Clipboard, InMemoryClipboard};
pub use dispatcher::dispatch;

use core_state::Buffer;

/// Shared tail of every mutating command: revalidate derived state and keep
/// the primary cursor on screen.
pub(crate) fn finish_edit(buf: &mut Buffer) {
    buf.refresh();
    buf.cursors.sort_and_dedupe();
    buf.scroll_to_primary();
}

/// Shared tail of every motion command (no content mutation).
pub(crate) fn finish_motion(buf: &mut Buffer) {
    buf.cursors.sort_and_dedupe();
    buf.scroll_to_primary();
}

/// Move a single caret to the start of 1-based source line `n`, clamped.
/// Collapses multi-cursor state; goto-line is a single-cursor navigation.
pub fn goto_line(buf: &mut Buffer, n: usize) {
    let row = buf.layout.row_of_actual_line(n.max(1));
    let offset = match buf.layout.line(row) {
        Some(l) => l.start,
        None => 0,
    };
    buf.cursors.reset_to(offset);
    buf.scroll_to_primary();
}

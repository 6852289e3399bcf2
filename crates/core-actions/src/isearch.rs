//! Interactive search commands.
//!
//! These drive the [`core_search::SearchState`] machine on the buffer: every
//! query keystroke re-runs the regex matcher over the full content and snaps
//! the (single) cursor to the current match. The query is interpreted as a
//! regex; a half-typed, transiently invalid pattern just means zero matches
//! until the next keystroke.

use core_state::Buffer;
use tracing::debug;

/// Enter search mode with an empty query. Collapses to a single cursor;
/// search navigation and multi-cursor editing do not mix.
pub fn begin(buf: &mut Buffer) {
    buf.cursors.remove_all_but_one();
    buf.search.begin();
}

/// Append one query byte and re-run the matcher.
pub fn input(buf: &mut Buffer, byte: u8) {
    if !buf.search.is_searching() {
        return;
    }
    buf.search.push(byte);
    rerun(buf);
}

/// Drop the last query byte and re-run the matcher.
pub fn backspace(buf: &mut Buffer) {
    if !buf.search.is_searching() {
        return;
    }
    buf.search.pop();
    rerun(buf);
}

/// Jump to the next match, wrapping past the last.
pub fn next(buf: &mut Buffer) {
    if buf.search.next().is_some() {
        snap_to_current(buf);
    }
}

/// Jump to the previous match, wrapping past the first.
pub fn previous(buf: &mut Buffer) {
    if buf.search.prev().is_some() {
        snap_to_current(buf);
    }
}

/// Leave search mode keeping the cursor where the search put it.
pub fn accept(buf: &mut Buffer) {
    debug!(
        target: "search",
        matches = buf.search.matches.len(),
        "accept"
    );
    buf.search.cancel();
}

/// Abort search mode. The cursor stays wherever the last snap left it; the
/// query and match list are discarded.
pub fn cancel(buf: &mut Buffer) {
    buf.search.cancel();
}

fn rerun(buf: &mut Buffer) {
    let pattern = String::from_utf8_lossy(buf.search.pattern()).into_owned();
    let near = buf.cursors.primary().point;
    let matches = core_search::find_all_regex(buf.content(), &pattern);
    debug!(target: "search", pattern = %pattern, matches = matches.len(), "rerun");
    buf.search.set_matches(matches, near);
    snap_to_current(buf);
}

fn snap_to_current(buf: &mut Buffer) {
    if let Some(m) = buf.search.current_match() {
        buf.cursors.reset_to(m.start);
        buf.scroll_to_primary();
    }
}

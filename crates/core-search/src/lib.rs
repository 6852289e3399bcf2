//! Buffer search: exact substring matching (case-insensitive, ASCII), a
//! regex variant for the interactive search mode, and an async variant that
//! fills a shared match list without blocking the caller.
//!
//! Matches are byte-offset pairs with an INCLUSIVE `end` (searching
//! `"Hello World"` for `"Hell"` yields `[0, 3]`). Cursor selections in the
//! rest of the engine are half-open; the conversion happens at the call
//! sites that turn a match into a selection.
//!
//! Concurrency model: `spawn_find_all` is fire-and-forget. A new search
//! simply overwrites the shared slot when it lands, and two in-flight
//! searches race with last-writer-wins. Search is idempotent over unchanged
//! content, so whichever result lands last is good enough for an
//! interactive filter. The returned `JoinHandle` exists so tests (and any
//! caller that wants determinism) can await completion.

use std::sync::{Arc, Mutex};

use regex::bytes::Regex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// A single match: byte offsets into the buffer content, `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
}

impl SearchMatch {
    /// Number of bytes covered; never zero, zero-width regex matches are
    /// filtered out before a `SearchMatch` is built.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Shared destination for async search results.
pub type MatchSlot = Arc<Mutex<Vec<SearchMatch>>>;

#[inline]
fn eq_ignore_ascii_case(a: u8, b: u8) -> bool {
    a.eq_ignore_ascii_case(&b)
}

/// All non-overlapping case-insensitive occurrences of `pattern` in `data`.
///
/// Sliding byte comparison; after a hit the scan resumes past the match,
/// after a miss it restarts one byte further on.
pub fn find_all_case_insensitive(data: &[u8], pattern: &[u8]) -> Vec<SearchMatch> {
    let mut out = Vec::new();
    if pattern.is_empty() || pattern.len() > data.len() {
        return out;
    }
    let m = pattern.len();
    let mut i = 0usize;
    while i + m <= data.len() {
        if data[i..i + m]
            .iter()
            .zip(pattern)
            .all(|(&a, &b)| eq_ignore_ascii_case(a, b))
        {
            out.push(SearchMatch {
                start: i,
                end: i + m - 1,
            });
            i += m;
        } else {
            i += 1;
        }
    }
    out
}

/// First case-insensitive occurrence at or after `from`.
pub fn find_next(data: &[u8], from: usize, pattern: &[u8]) -> Option<SearchMatch> {
    if pattern.is_empty() {
        return None;
    }
    let m = pattern.len();
    let mut i = from.min(data.len());
    while i + m <= data.len() {
        if data[i..i + m]
            .iter()
            .zip(pattern)
            .all(|(&a, &b)| eq_ignore_ascii_case(a, b))
        {
            return Some(SearchMatch {
                start: i,
                end: i + m - 1,
            });
        }
        i += 1;
    }
    None
}

/// First exact-byte occurrence at or after `from`. Used by
/// select-next-occurrence, which must match the selected bytes verbatim.
pub fn find_next_exact(data: &[u8], from: usize, pattern: &[u8]) -> Option<SearchMatch> {
    if pattern.is_empty() {
        return None;
    }
    let m = pattern.len();
    let mut i = from.min(data.len());
    while i + m <= data.len() {
        if &data[i..i + m] == pattern {
            return Some(SearchMatch {
                start: i,
                end: i + m - 1,
            });
        }
        i += 1;
    }
    None
}

/// All matches of a regex `pattern` over raw bytes.
///
/// Interactive search feeds partially typed patterns through here; a
/// transiently invalid pattern yields an empty list rather than an error so
/// the search mode stays live while the user keeps typing. Zero-width
/// matches are dropped (an inclusive-end span cannot represent them).
pub fn find_all_regex(data: &[u8], pattern: &str) -> Vec<SearchMatch> {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(err) => {
            trace!(target: "search", pattern, %err, "invalid_pattern");
            return Vec::new();
        }
    };
    re.find_iter(data)
        .filter(|m| !m.is_empty())
        .map(|m| SearchMatch {
            start: m.start(),
            end: m.end() - 1,
        })
        .collect()
}

/// Run `find_all_case_insensitive` on a background task, writing the result
/// into `slot` once complete.
///
/// Not cancellable and not awaited by production callers; the buffer's
/// highlight path re-checks the slot before each use and must tolerate a
/// transient empty or stale list.
pub fn spawn_find_all(data: Vec<u8>, pattern: Vec<u8>, slot: MatchSlot) -> JoinHandle<()> {
    tokio::spawn(async move {
        let matches = find_all_case_insensitive(&data, &pattern);
        debug!(target: "search", matches = matches.len(), bytes = data.len(), "async_search_done");
        *slot.lock().expect("match slot poisoned") = matches;
    })
}

// -------------------------------------------------------------------------
// Interactive search state machine
// -------------------------------------------------------------------------

/// State for the interactive (incremental) search mode.
///
/// Transitions: `Idle -> Searching` on [`SearchState::begin`] (empty query);
/// each keystroke appends to the query and the caller re-runs the regex
/// matcher; `Searching -> Idle` on [`SearchState::cancel`]. Next/previous
/// wrap modulo the match count and clear `moved_away` so the view re-centers
/// on the current match; manual scrolling while searching sets `moved_away`.
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    is_searching: bool,
    pattern: Vec<u8>,
    pub matches: Vec<SearchMatch>,
    current: usize,
    pub moved_away: bool,
}

impl SearchState {
    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Enter search mode with an empty query.
    pub fn begin(&mut self) {
        self.is_searching = true;
        self.pattern.clear();
        self.matches.clear();
        self.current = 0;
        self.moved_away = false;
        debug!(target: "search", "begin");
    }

    /// Leave search mode, clearing query and matches.
    pub fn cancel(&mut self) {
        self.is_searching = false;
        self.pattern.clear();
        self.matches.clear();
        self.current = 0;
        self.moved_away = false;
        debug!(target: "search", "cancel");
    }

    /// Append one query byte. Caller re-runs the matcher afterwards.
    pub fn push(&mut self, b: u8) {
        self.pattern.push(b);
    }

    /// Remove the last query byte (backspace in the search prompt).
    pub fn pop(&mut self) {
        self.pattern.pop();
    }

    /// Install a fresh match list, clamping the current index and choosing
    /// the first match at or after `near` as current.
    pub fn set_matches(&mut self, matches: Vec<SearchMatch>, near: usize) {
        self.matches = matches;
        self.current = self
            .matches
            .iter()
            .position(|m| m.start >= near)
            .unwrap_or(0);
        self.moved_away = false;
    }

    pub fn current_match(&self) -> Option<SearchMatch> {
        self.matches.get(self.current).copied()
    }

    /// Advance to the next match, wrapping. Returns the new current match.
    pub fn next(&mut self) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.matches.len();
        self.moved_away = false;
        self.current_match()
    }

    /// Step back to the previous match, wrapping.
    pub fn prev(&mut self) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + self.matches.len() - 1) % self.matches.len();
        self.moved_away = false;
        self.current_match()
    }

    /// Record a manual scroll/page while searching, so the view stops
    /// chasing the current match.
    pub fn mark_moved_away(&mut self) {
        if self.is_searching {
            self.moved_away = true;
        }
    }
}

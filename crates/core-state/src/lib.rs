//! Buffer state: content bytes, cursors, undo log, layout, tokens, search.
//!
//! `Buffer` is the aggregate every editing command operates on. `content`
//! is the single source of truth: cursors, visual lines, and token spans
//! are all byte offsets into it and are re-validated after every mutation
//! via [`Buffer::refresh`].
//!
//! Mutation discipline: commands mutate content only through the two splice
//! primitives ([`Buffer::splice_insert`] / [`Buffer::splice_remove`]), which
//! record the inverse operation on the undo stack and mark the buffer dirty.
//! Undo itself bypasses the recording path (undoing must not create new
//! history).
//!
//! Tab convention: tabs are expanded to `tab_size` spaces on load and
//! leading space runs are contracted back to tabs on save; in-memory
//! content never contains a tab byte.

use std::path::PathBuf;

use anyhow::{Context, Result};
use core_model::VisualLineIndex;
use core_search::SearchState;
use core_text::Token;
use tracing::{debug, trace};

pub mod cursor;
pub mod undo;

pub use cursor::{Cursor, CursorSet};
pub use undo::{EmptyStack, UNDO_CAPACITY_DEFAULT, UndoAction, UndoKind, UndoStack};

/// The text-editing aggregate: one open file's content and derived state.
#[derive(Debug, Clone)]
pub struct Buffer {
    content: Vec<u8>,
    pub path: Option<PathBuf>,
    pub dirty: bool,
    pub readonly: bool,
    pub tab_size: usize,
    pub cursors: CursorSet,
    pub undo: UndoStack,
    pub layout: VisualLineIndex,
    pub tokens: Vec<Token>,
    pub search: SearchState,
}

impl Buffer {
    /// An empty scratch buffer with no backing file.
    pub fn empty(tab_size: usize, columns: usize, rows: usize) -> Self {
        Self {
            content: Vec::new(),
            path: None,
            dirty: false,
            readonly: false,
            tab_size: tab_size.max(1),
            cursors: CursorSet::new(),
            undo: UndoStack::default(),
            layout: VisualLineIndex::new(columns, rows),
            tokens: Vec::new(),
            search: SearchState::default(),
        }
    }

    /// Buffer over in-memory bytes (tabs expanded).
    pub fn from_bytes(bytes: &[u8], tab_size: usize, columns: usize, rows: usize) -> Self {
        let mut buf = Self::empty(tab_size, columns, rows);
        buf.content = expand_tabs(bytes, buf.tab_size);
        buf.refresh();
        buf
    }

    /// Open `path`, reading the whole file into memory. A missing or
    /// unreadable file is NOT an error: the buffer starts empty and the
    /// path is kept for a later save.
    pub fn from_path(
        path: impl Into<PathBuf>,
        tab_size: usize,
        columns: usize,
        rows: usize,
    ) -> Result<Self> {
        let path = path.into();
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(err) => {
                debug!(target: "state.io", path = %path.display(), %err, "open_as_empty");
                Vec::new()
            }
        };
        let mut buf = Self::from_bytes(&bytes, tab_size, columns, rows);
        buf.path = Some(path);
        buf.dirty = false;
        Ok(buf)
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Borrow the byte range `[start, end)`, clamped to the content.
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        debug_assert!(
            start <= self.content.len(),
            "slice start past end of content is a contract violation"
        );
        let end = end.min(self.content.len());
        let start = start.min(end);
        &self.content[start..end]
    }

    /// Insert `data` at `at`, recording the inverse on the undo stack and
    /// marking the buffer dirty. Does NOT refresh derived state; commands
    /// batch mutations and call [`Buffer::refresh`] once.
    pub fn splice_insert(&mut self, at: usize, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let at = at.min(self.content.len());
        if at >= self.content.len() {
            self.content.extend_from_slice(data);
        } else {
            self.content.splice(at..at, data.iter().copied());
        }
        self.undo.push(UndoAction {
            kind: UndoKind::Insert,
            at,
            data: data.to_vec(),
        });
        self.dirty = true;
        trace!(target: "state.edit", at, len = data.len(), "insert");
    }

    /// Remove `[start, end)`, recording the inverse and marking dirty.
    /// Returns the removed bytes.
    pub fn splice_remove(&mut self, start: usize, end: usize) -> Vec<u8> {
        let end = end.min(self.content.len());
        let start = start.min(end);
        if start == end {
            return Vec::new();
        }
        let removed: Vec<u8> = self.content.drain(start..end).collect();
        self.undo.push(UndoAction {
            kind: UndoKind::Delete,
            at: start,
            data: removed.clone(),
        });
        self.dirty = true;
        trace!(target: "state.edit", at = start, len = removed.len(), "delete");
        removed
    }

    /// Recompute everything derived from `content`: token spans, the
    /// visual-line index, and cursor clamping. Called once per command
    /// after its mutation batch.
    pub fn refresh(&mut self) {
        self.tokens = core_text::tokenize(&self.content);
        self.layout.rebuild(&self.content);
        self.cursors.clamp(self.content.len());
    }

    /// Scroll the window so the primary cursor's row is visible.
    pub fn scroll_to_primary(&mut self) {
        let pos = self.layout.position_of(self.cursors.primary().point);
        self.layout.scroll_if_needed(pos.line);
    }

    /// Pop the newest undo record and apply its literal inverse.
    ///
    /// Popping an empty stack marks the buffer CLEAN: no more history means
    /// we are back at the saved state. (Only sound while every save point
    /// coincides with an empty stack, a documented assumption.)
    pub fn undo_last(&mut self) -> bool {
        match self.undo.pop() {
            Err(EmptyStack) => {
                debug!(target: "state.undo", "history_exhausted_mark_clean");
                self.dirty = false;
                false
            }
            Ok(action) => {
                let caret = match action.kind {
                    UndoKind::Insert => {
                        // Undo an insertion: remove the inserted bytes.
                        let end = (action.at + action.data.len()).min(self.content.len());
                        let start = action.at.min(end);
                        self.content.drain(start..end);
                        start
                    }
                    UndoKind::Delete => {
                        // Undo a deletion: re-insert the removed bytes.
                        let at = action.at.min(self.content.len());
                        self.content.splice(at..at, action.data.iter().copied());
                        at + action.data.len()
                    }
                };
                self.cursors.reset_to(caret);
                self.dirty = true;
                self.refresh();
                self.scroll_to_primary();
                true
            }
        }
    }

    /// Write the content back to `path` verbatim (modulo the tab
    /// round-trip). No-op for pathless or readonly buffers.
    pub fn write(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        if self.readonly {
            return Ok(());
        }
        let on_disk = contract_indent(&self.content, self.tab_size);
        std::fs::write(&path, on_disk)
            .with_context(|| format!("writing {}", path.display()))?;
        self.dirty = false;
        debug!(target: "state.io", path = %path.display(), bytes = self.content.len(), "wrote");
        Ok(())
    }
}

/// Replace every tab byte with `tab_size` spaces (load-time convention).
pub fn expand_tabs(bytes: &[u8], tab_size: usize) -> Vec<u8> {
    if !bytes.contains(&b'\t') {
        return bytes.to_vec();
    }
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if b == b'\t' {
            out.extend(std::iter::repeat(b' ').take(tab_size));
        } else {
            out.push(b);
        }
    }
    out
}

/// Convert runs of `tab_size` spaces in line indentation back to literal
/// tabs (save-time convention). Only leading runs are touched; interior
/// alignment spaces stay spaces.
pub fn contract_indent(bytes: &[u8], tab_size: usize) -> Vec<u8> {
    if tab_size == 0 {
        return bytes.to_vec();
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut at_line_start = true;
    let mut pending_spaces = 0usize;
    for &b in bytes {
        if at_line_start && b == b' ' {
            pending_spaces += 1;
            if pending_spaces == tab_size {
                out.push(b'\t');
                pending_spaces = 0;
            }
            continue;
        }
        out.extend(std::iter::repeat(b' ').take(pending_spaces));
        pending_spaces = 0;
        out.push(b);
        at_line_start = b == b'\n';
    }
    out.extend(std::iter::repeat(b' ').take(pending_spaces));
    out
}

//! Cursors and the ordered cursor collection.
//!
//! A cursor is a (point, mark) pair of byte offsets; `point == mark` is a
//! caret, otherwise `[start, end)` is a selection. Every editing command
//! operates on the full `CursorSet` in ascending `start()` order, and the
//! set re-normalizes (sort + dedupe) after every structural change.
//!
//! Offset compensation is the load-bearing part: whenever one cursor's edit
//! grows or shrinks the content, every other cursor's offsets must shift by
//! the same delta or they silently drift onto the wrong bytes.

/// A point/mark pair of byte offsets into the buffer content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// The moving end; Point-commands carry both ends together.
    pub point: usize,
    /// The anchor end; Mark-commands move only this field.
    pub mark: usize,
}

impl Cursor {
    /// A caret (no selection) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            point: offset,
            mark: offset,
        }
    }

    /// A selection covering `[start, end)` with the point at `end`.
    pub fn selection(start: usize, end: usize) -> Self {
        Self {
            point: end,
            mark: start,
        }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.point.min(self.mark)
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.point.max(self.mark)
    }

    #[inline]
    pub fn is_caret(&self) -> bool {
        self.point == self.mark
    }

    /// Collapse to a caret at `offset`.
    pub fn collapse_to(&mut self, offset: usize) {
        self.point = offset;
        self.mark = offset;
    }

    /// Shift both ends right by `n` bytes.
    pub fn shift_right(&mut self, n: usize) {
        self.point += n;
        self.mark += n;
    }

    /// Compensate for an insertion of `len` bytes at `at`: every offset at
    /// or after the insertion point moves right.
    pub fn compensate_insert(&mut self, at: usize, len: usize) {
        if self.point >= at {
            self.point += len;
        }
        if self.mark >= at {
            self.mark += len;
        }
    }

    /// Compensate for a deletion of `len` bytes at `at`: offsets past the
    /// deleted range move left, offsets inside it clamp to `at`.
    pub fn compensate_delete(&mut self, at: usize, len: usize) {
        self.point = shrink(self.point, at, len);
        self.mark = shrink(self.mark, at, len);
    }

    /// Clamp both ends into `0..=content_len`.
    pub fn clamp(&mut self, content_len: usize) {
        self.point = self.point.min(content_len);
        self.mark = self.mark.min(content_len);
    }
}

#[inline]
fn shrink(offset: usize, at: usize, len: usize) -> usize {
    if offset <= at {
        offset
    } else {
        offset - (offset - at).min(len)
    }
}

/// Ordered, deduplicated, never-empty collection of cursors.
#[derive(Debug, Clone)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSet {
    /// A single caret at offset 0.
    pub fn new() -> Self {
        Self {
            cursors: vec![Cursor::caret(0)],
        }
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// True when exactly one cursor exists (the single-cursor commands,
    /// kill/cut/copy/paste/word-delete, require this).
    pub fn is_single(&self) -> bool {
        self.cursors.len() == 1
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cursor> {
        self.cursors.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Cursor> {
        self.cursors.iter_mut()
    }

    /// The primary cursor (lowest `start()` after normalization).
    pub fn primary(&self) -> Cursor {
        self.cursors[0]
    }

    pub fn primary_mut(&mut self) -> &mut Cursor {
        &mut self.cursors[0]
    }

    /// The most recently meaningful cursor for add-next-line / select-next
    /// commands: the last in sorted order.
    pub fn last(&self) -> Cursor {
        self.cursors[self.cursors.len() - 1]
    }

    pub fn get(&self, idx: usize) -> Option<Cursor> {
        self.cursors.get(idx).copied()
    }

    pub fn set(&mut self, idx: usize, cursor: Cursor) {
        if let Some(slot) = self.cursors.get_mut(idx) {
            *slot = cursor;
        }
    }

    /// Append a cursor and re-normalize.
    pub fn add(&mut self, cursor: Cursor) {
        self.cursors.push(cursor);
        self.sort_and_dedupe();
    }

    /// Sort by `start()` ascending and drop exact-duplicate `(start, end)`
    /// pairs. Called after every structural change.
    pub fn sort_and_dedupe(&mut self) {
        self.cursors
            .sort_by_key(|c| (c.start(), c.end()));
        self.cursors
            .dedup_by_key(|c| (c.start(), c.end()));
        debug_assert!(!self.cursors.is_empty());
    }

    /// Collapse to the first cursor as a caret.
    pub fn remove_all_but_one(&mut self) {
        let first = self.cursors[0];
        self.cursors.clear();
        self.cursors.push(Cursor::caret(first.start()));
    }

    /// Replace the whole set with a single caret at `offset`.
    pub fn reset_to(&mut self, offset: usize) {
        self.cursors.clear();
        self.cursors.push(Cursor::caret(offset));
    }

    /// Clamp every cursor into the content bounds, then re-normalize.
    pub fn clamp(&mut self, content_len: usize) {
        for c in &mut self.cursors {
            c.clamp(content_len);
        }
        self.sort_and_dedupe();
    }

    /// Apply insert compensation to every cursor except `skip`.
    pub fn compensate_insert_except(&mut self, skip: usize, at: usize, len: usize) {
        for (i, c) in self.cursors.iter_mut().enumerate() {
            if i != skip {
                c.compensate_insert(at, len);
            }
        }
    }

    /// Apply delete compensation to every cursor except `skip`.
    pub fn compensate_delete_except(&mut self, skip: usize, at: usize, len: usize) {
        for (i, c) in self.cursors.iter_mut().enumerate() {
            if i != skip {
                c.compensate_delete(at, len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_and_selection_accessors() {
        let c = Cursor::caret(5);
        assert!(c.is_caret());
        assert_eq!((c.start(), c.end()), (5, 5));
        let s = Cursor::selection(3, 8);
        assert!(!s.is_caret());
        assert_eq!((s.start(), s.end()), (3, 8));
        // reversed point/mark still normalizes through start/end
        let r = Cursor { point: 3, mark: 8 };
        assert_eq!((r.start(), r.end()), (3, 8));
    }

    #[test]
    fn delete_compensation_shrinks_and_clamps() {
        let mut after = Cursor::caret(10);
        after.compensate_delete(2, 3);
        assert_eq!(after.point, 7);
        let mut inside = Cursor::caret(4);
        inside.compensate_delete(2, 3);
        assert_eq!(inside.point, 2);
        let mut before = Cursor::caret(1);
        before.compensate_delete(2, 3);
        assert_eq!(before.point, 1);
    }

    #[test]
    fn insert_compensation_moves_trailing_offsets() {
        let mut c = Cursor::selection(4, 6);
        c.compensate_insert(4, 2);
        assert_eq!((c.start(), c.end()), (6, 8));
        let mut before = Cursor::caret(3);
        before.compensate_insert(4, 2);
        assert_eq!(before.point, 3);
    }

    #[test]
    fn set_sorts_by_start_and_dedupes_identical_ranges() {
        let mut set = CursorSet::new();
        set.reset_to(9);
        set.add(Cursor::selection(2, 4));
        set.add(Cursor::caret(0));
        // same (start, end) as the existing selection, opposite orientation
        set.add(Cursor { point: 2, mark: 4 });
        let starts: Vec<usize> = set.iter().map(|c| c.start()).collect();
        assert_eq!(starts, vec![0, 2, 9]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn remove_all_but_one_collapses_to_first_start() {
        let mut set = CursorSet::new();
        set.reset_to(5);
        set.add(Cursor::selection(2, 7));
        set.remove_all_but_one();
        assert_eq!(set.len(), 1);
        let only = set.primary();
        assert!(only.is_caret());
        assert_eq!(only.point, 2);
    }

    #[test]
    fn clamp_pulls_cursors_into_bounds() {
        let mut set = CursorSet::new();
        set.reset_to(50);
        set.add(Cursor::selection(3, 40));
        set.clamp(10);
        for c in set.iter() {
            assert!(c.end() <= 10);
        }
    }
}

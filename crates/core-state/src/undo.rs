//! Bounded undo log of content mutations.
//!
//! Each entry records the *inverse* of a mutation: an `Insert` action undoes
//! an insertion by removing `data.len()` bytes at `at`; a `Delete` action
//! undoes a deletion by re-inserting `data` at `at`. Cursor positions are
//! not part of the record; content reversal alone is the contract.
//!
//! Eviction policy: the stack is a fixed-capacity log that discards the
//! OLDEST entry when full. Bounded memory is intentional; history beyond
//! capacity is unrecoverable.

use thiserror::Error;
use tracing::trace;

/// Default capacity; overridable through `[editor] undo_capacity`.
pub const UNDO_CAPACITY_DEFAULT: usize = 200;

/// Which mutation the recorded action undoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    /// `data` was inserted at `at`; undo removes it.
    Insert,
    /// `data` was deleted at `at`; undo re-inserts it.
    Delete,
}

/// Inverse operation needed to undo one content mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoAction {
    pub kind: UndoKind,
    pub at: usize,
    pub data: Vec<u8>,
}

/// Returned by [`UndoStack::pop`] when no history remains. Callers recover
/// locally: the buffer converts this into "mark clean".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("undo stack is empty")]
pub struct EmptyStack;

/// Fixed-capacity stack of [`UndoAction`]s with drop-oldest eviction.
#[derive(Debug, Clone)]
pub struct UndoStack {
    actions: Vec<UndoAction>,
    capacity: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(UNDO_CAPACITY_DEFAULT)
    }
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            actions: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an action; evicts the oldest entry when past capacity.
    pub fn push(&mut self, action: UndoAction) {
        self.actions.push(action);
        if self.actions.len() > self.capacity {
            self.actions.remove(0);
            trace!(target: "state.undo", capacity = self.capacity, "oldest_entry_evicted");
        }
        trace!(target: "state.undo", depth = self.actions.len(), "push");
    }

    /// Remove and return the most recent action.
    pub fn pop(&mut self) -> Result<UndoAction, EmptyStack> {
        match self.actions.pop() {
            Some(a) => {
                trace!(target: "state.undo", depth = self.actions.len(), "pop");
                Ok(a)
            }
            None => Err(EmptyStack),
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_action(at: usize) -> UndoAction {
        UndoAction {
            kind: UndoKind::Insert,
            at,
            data: vec![b'x'],
        }
    }

    #[test]
    fn pop_is_lifo() {
        let mut stack = UndoStack::new(10);
        stack.push(insert_action(1));
        stack.push(insert_action(2));
        assert_eq!(stack.pop().unwrap().at, 2);
        assert_eq!(stack.pop().unwrap().at, 1);
        assert_eq!(stack.pop(), Err(EmptyStack));
    }

    /// The stack is bounded on purpose: pushing past capacity discards the
    /// OLDEST entries and never grows.
    #[test]
    fn overflow_discards_oldest_never_grows() {
        let mut stack = UndoStack::new(3);
        for at in 0..10 {
            stack.push(insert_action(at));
            assert!(stack.len() <= 3);
        }
        assert_eq!(stack.len(), 3);
        // the three newest survive, newest first on pop
        assert_eq!(stack.pop().unwrap().at, 9);
        assert_eq!(stack.pop().unwrap().at, 8);
        assert_eq!(stack.pop().unwrap().at, 7);
        assert!(stack.is_empty());
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut stack = UndoStack::new(0);
        stack.push(insert_action(0));
        stack.push(insert_action(1));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop().unwrap().at, 1);
    }
}

//! Key chords, command identifiers, and the binding table.
//!
//! Dispatch is data-driven: a [`Keymap`] is a plain chord-to-command table,
//! so rebinding is an insert rather than a code change. The table covers
//! normal editing only; the interactive-search prompt is modal and handled
//! by the dispatcher before the table is consulted.

use std::collections::HashMap;

use tracing::trace;

/// A physical key, decoupled from any terminal backend's event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Esc,
}

/// A key plus its modifier state. This is the keymap's lookup unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyChord {
    /// A chord with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    pub fn alt(key: Key) -> Self {
        Self {
            alt: true,
            ..Self::plain(key)
        }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            shift: true,
            ..Self::plain(key)
        }
    }

    pub fn ctrl_shift(key: Key) -> Self {
        Self {
            ctrl: true,
            shift: true,
            ..Self::plain(key)
        }
    }
}

/// Every command the dispatcher can invoke. The keymap maps chords onto
/// these; the dispatcher maps these onto action functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    // caret motion
    PointLeft,
    PointRight,
    PointUp,
    PointDown,
    PointLineStart,
    PointLineEnd,
    PointWordForward,
    PointWordBackward,
    // selection growth
    MarkLeft,
    MarkRight,
    MarkUp,
    MarkDown,
    MarkLineStart,
    MarkLineEnd,
    MarkWordForward,
    MarkWordBackward,
    // editing
    InsertNewline,
    DeleteCharBackward,
    DeleteCharForward,
    DeleteWordBackward,
    KillLine,
    Indent,
    Undo,
    // clipboard
    Cut,
    Copy,
    Paste,
    // multi-cursor
    AddCursorNextLine,
    AddCursorPreviousLine,
    SelectNextMatch,
    RemoveExtraCursors,
    // search and file
    SearchStart,
    Save,
}

/// Chord-to-command table.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<KeyChord, CommandId>,
}

impl Keymap {
    /// An empty table; chords fall through to self-insertion.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock bindings.
    pub fn standard() -> Self {
        use CommandId::*;
        use Key::*;
        let mut map = Self::default();
        for (chord, cmd) in [
            (KeyChord::plain(Left), PointLeft),
            (KeyChord::plain(Right), PointRight),
            (KeyChord::plain(Up), PointUp),
            (KeyChord::plain(Down), PointDown),
            (KeyChord::plain(Home), PointLineStart),
            (KeyChord::plain(End), PointLineEnd),
            (KeyChord::ctrl(Right), PointWordForward),
            (KeyChord::ctrl(Left), PointWordBackward),
            (KeyChord::shift(Left), MarkLeft),
            (KeyChord::shift(Right), MarkRight),
            (KeyChord::shift(Up), MarkUp),
            (KeyChord::shift(Down), MarkDown),
            (KeyChord::shift(Home), MarkLineStart),
            (KeyChord::shift(End), MarkLineEnd),
            (KeyChord::ctrl_shift(Right), MarkWordForward),
            (KeyChord::ctrl_shift(Left), MarkWordBackward),
            (KeyChord::plain(Enter), InsertNewline),
            (KeyChord::plain(Backspace), DeleteCharBackward),
            (KeyChord::plain(Delete), DeleteCharForward),
            (KeyChord::ctrl(Backspace), DeleteWordBackward),
            (KeyChord::ctrl(Char('k')), KillLine),
            (KeyChord::plain(Tab), Indent),
            (KeyChord::ctrl(Char('z')), Undo),
            (KeyChord::ctrl(Char('x')), Cut),
            (KeyChord::ctrl(Char('c')), Copy),
            (KeyChord::ctrl(Char('v')), Paste),
            (KeyChord::alt(Down), AddCursorNextLine),
            (KeyChord::alt(Up), AddCursorPreviousLine),
            (KeyChord::ctrl(Char('d')), SelectNextMatch),
            (KeyChord::plain(Esc), RemoveExtraCursors),
            (KeyChord::ctrl(Char('f')), SearchStart),
            (KeyChord::ctrl(Char('s')), Save),
        ] {
            map.bind(chord, cmd);
        }
        map
    }

    /// Insert or replace a binding.
    pub fn bind(&mut self, chord: KeyChord, command: CommandId) {
        if let Some(old) = self.bindings.insert(chord, command) {
            trace!(target: "keymap", ?chord, ?old, new = ?command, "rebound");
        }
    }

    /// Remove a binding; the chord falls back to self-insertion.
    pub fn unbind(&mut self, chord: &KeyChord) -> Option<CommandId> {
        self.bindings.remove(chord)
    }

    /// Look up the command for a chord.
    pub fn resolve(&self, chord: &KeyChord) -> Option<CommandId> {
        self.bindings.get(chord).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

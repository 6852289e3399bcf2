//! Key dispatch: one chord in, one command out.
//!
//! Two layers. While the interactive-search prompt is open, a small modal
//! layer consumes the chord (query edits, match navigation, accept/cancel)
//! and the keymap is never consulted. Otherwise the chord is resolved
//! through the [`Keymap`]; unresolved plain characters self-insert.

use anyhow::Result;
use core_keymap::{CommandId, Key, KeyChord, Keymap};
use core_state::Buffer;
use tracing::trace;

use crate::{edit, isearch, motion, multi, Clipboard};

/// Route one key chord to its command.
///
/// The only fallible command is Save (file I/O); everything else always
/// succeeds and unbound chords are silently dropped.
pub fn dispatch(
    buf: &mut Buffer,
    clip: &mut dyn Clipboard,
    keymap: &Keymap,
    chord: KeyChord,
) -> Result<()> {
    if buf.search.is_searching() {
        dispatch_search(buf, chord);
        return Ok(());
    }
    let Some(command) = keymap.resolve(&chord) else {
        if let Key::Char(c) = chord.key {
            if !chord.ctrl && !chord.alt {
                insert_text(buf, c);
            }
        }
        return Ok(());
    };
    trace!(target: "actions.dispatch", ?chord, ?command, "resolved");
    match command {
        CommandId::PointLeft => motion::point_left(buf),
        CommandId::PointRight => motion::point_right(buf),
        CommandId::PointUp => motion::point_up(buf),
        CommandId::PointDown => motion::point_down(buf),
        CommandId::PointLineStart => motion::point_line_start(buf),
        CommandId::PointLineEnd => motion::point_line_end(buf),
        CommandId::PointWordForward => motion::point_word_forward(buf),
        CommandId::PointWordBackward => motion::point_word_backward(buf),
        CommandId::MarkLeft => motion::mark_left(buf),
        CommandId::MarkRight => motion::mark_right(buf),
        CommandId::MarkUp => motion::mark_up(buf),
        CommandId::MarkDown => motion::mark_down(buf),
        CommandId::MarkLineStart => motion::mark_line_start(buf),
        CommandId::MarkLineEnd => motion::mark_line_end(buf),
        CommandId::MarkWordForward => motion::mark_word_forward(buf),
        CommandId::MarkWordBackward => motion::mark_word_backward(buf),
        CommandId::InsertNewline => edit::insert_char(buf, b'\n'),
        CommandId::DeleteCharBackward => edit::delete_char_backward(buf),
        CommandId::DeleteCharForward => edit::delete_char_forward(buf),
        CommandId::DeleteWordBackward => edit::delete_word_backward(buf),
        CommandId::KillLine => edit::kill_line(buf, clip),
        CommandId::Indent => edit::indent(buf),
        CommandId::Undo => {
            edit::undo(buf);
        }
        CommandId::Cut => edit::cut(buf, clip),
        CommandId::Copy => edit::copy(buf, clip),
        CommandId::Paste => edit::paste(buf, clip),
        CommandId::AddCursorNextLine => multi::add_cursor_next_line(buf),
        CommandId::AddCursorPreviousLine => multi::add_cursor_previous_line(buf),
        CommandId::SelectNextMatch => multi::another_selection_on_match(buf),
        CommandId::RemoveExtraCursors => multi::remove_all_cursors_but_one(buf),
        CommandId::SearchStart => isearch::begin(buf),
        CommandId::Save => buf.write()?,
    }
    Ok(())
}

/// The modal layer for the open search prompt.
fn dispatch_search(buf: &mut Buffer, chord: KeyChord) {
    match chord.key {
        Key::Esc => isearch::cancel(buf),
        Key::Enter => isearch::accept(buf),
        Key::Backspace => isearch::backspace(buf),
        Key::Down => isearch::next(buf),
        Key::Up => isearch::previous(buf),
        Key::Char('n') if chord.ctrl => isearch::next(buf),
        Key::Char('p') if chord.ctrl => isearch::previous(buf),
        Key::Char(c) if !chord.ctrl && !chord.alt => {
            let mut utf8 = [0u8; 4];
            for &b in c.encode_utf8(&mut utf8).as_bytes() {
                isearch::input(buf, b);
            }
        }
        _ => {}
    }
}

/// Self-insertion for an unbound character, one byte at a time so every
/// cursor advances in step even for multi-byte characters.
fn insert_text(buf: &mut Buffer, c: char) {
    let mut utf8 = [0u8; 4];
    for &b in c.encode_utf8(&mut utf8).as_bytes() {
        edit::insert_char(buf, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryClipboard;

    fn buf(content: &[u8]) -> Buffer {
        Buffer::from_bytes(content, 4, 80, 24)
    }

    fn press(buf: &mut Buffer, clip: &mut InMemoryClipboard, map: &Keymap, chord: KeyChord) {
        dispatch(buf, clip, map, chord).expect("dispatch failed");
    }

    fn type_str(buf: &mut Buffer, clip: &mut InMemoryClipboard, map: &Keymap, s: &str) {
        for c in s.chars() {
            press(buf, clip, map, KeyChord::plain(Key::Char(c)));
        }
    }

    #[test]
    fn unbound_characters_self_insert() {
        let mut b = buf(b"");
        let mut clip = InMemoryClipboard::default();
        let map = Keymap::standard();
        type_str(&mut b, &mut clip, &map, "hi");
        press(&mut b, &mut clip, &map, KeyChord::plain(Key::Enter));
        type_str(&mut b, &mut clip, &map, "there");
        assert_eq!(b.content(), b"hi\nthere");
    }

    #[test]
    fn multibyte_char_inserts_all_bytes() {
        let mut b = buf(b"");
        let mut clip = InMemoryClipboard::default();
        let map = Keymap::standard();
        press(&mut b, &mut clip, &map, KeyChord::plain(Key::Char('é')));
        assert_eq!(b.content(), "é".as_bytes());
        assert_eq!(b.cursors.primary().point, 2);
    }

    #[test]
    fn bound_chords_invoke_commands() {
        let mut b = buf(b"hello world");
        let mut clip = InMemoryClipboard::default();
        let map = Keymap::standard();
        press(&mut b, &mut clip, &map, KeyChord::ctrl(Key::Right));
        assert_eq!(b.cursors.primary().point, 6);
        press(&mut b, &mut clip, &map, KeyChord::plain(Key::Backspace));
        assert_eq!(b.content(), b"helloworld");
        press(&mut b, &mut clip, &map, KeyChord::ctrl(Key::Char('z')));
        assert_eq!(b.content(), b"hello world");
    }

    #[test]
    fn ctrl_chords_do_not_self_insert() {
        let mut b = buf(b"");
        let mut clip = InMemoryClipboard::default();
        let map = Keymap::standard();
        press(&mut b, &mut clip, &map, KeyChord::ctrl(Key::Char('q')));
        assert!(b.is_empty());
    }

    #[test]
    fn search_layer_captures_keys_until_closed() {
        let mut b = buf(b"one two one");
        let mut clip = InMemoryClipboard::default();
        let map = Keymap::standard();
        press(&mut b, &mut clip, &map, KeyChord::ctrl(Key::Char('f')));
        assert!(b.search.is_searching());
        // typed characters go to the query, not the buffer
        type_str(&mut b, &mut clip, &map, "one");
        assert_eq!(b.content(), b"one two one");
        assert_eq!(b.search.matches.len(), 2);
        // Down steps to the next match while searching
        press(&mut b, &mut clip, &map, KeyChord::plain(Key::Down));
        assert_eq!(b.cursors.primary().point, 8);
        press(&mut b, &mut clip, &map, KeyChord::plain(Key::Enter));
        assert!(!b.search.is_searching());
        // back to normal mode: Down is point motion again
        press(&mut b, &mut clip, &map, KeyChord::plain(Key::Down));
        assert_eq!(b.cursors.primary().point, 8, "single-line buffer, no row below");
    }

    #[test]
    fn escape_cancels_search_before_clearing_cursors() {
        let mut b = buf(b"abc abc");
        let mut clip = InMemoryClipboard::default();
        let map = Keymap::standard();
        press(&mut b, &mut clip, &map, KeyChord::ctrl(Key::Char('f')));
        type_str(&mut b, &mut clip, &map, "abc");
        press(&mut b, &mut clip, &map, KeyChord::plain(Key::Esc));
        assert!(!b.search.is_searching());
        assert_eq!(b.cursors.len(), 1);
    }

    #[test]
    fn save_through_dispatch_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut b = Buffer::from_path(&path, 4, 80, 24).unwrap();
        let mut clip = InMemoryClipboard::default();
        let map = Keymap::standard();
        type_str(&mut b, &mut clip, &map, "saved");
        press(&mut b, &mut clip, &map, KeyChord::ctrl(Key::Char('s')));
        assert!(!b.dirty);
        assert_eq!(std::fs::read(&path).unwrap(), b"saved");
    }

    #[test]
    fn multi_cursor_typing_through_dispatch() {
        let mut b = buf(b"x\nx\n");
        let mut clip = InMemoryClipboard::default();
        let map = Keymap::standard();
        press(&mut b, &mut clip, &map, KeyChord::alt(Key::Down));
        assert_eq!(b.cursors.len(), 2);
        type_str(&mut b, &mut clip, &map, "y");
        assert_eq!(b.content(), b"yx\nyx\n");
        press(&mut b, &mut clip, &map, KeyChord::plain(Key::Esc));
        assert_eq!(b.cursors.len(), 1);
    }
}

//! Search sessions: the modal prompt through key dispatch, and the
//! background matcher feeding a shared slot.

use std::sync::Arc;

use core_actions::{dispatch, InMemoryClipboard};
use core_keymap::{Key, KeyChord, Keymap};
use core_search::MatchSlot;
use core_state::Buffer;

fn press(buf: &mut Buffer, clip: &mut InMemoryClipboard, map: &Keymap, chord: KeyChord) {
    dispatch(buf, clip, map, chord).expect("dispatch failed");
}

fn type_str(buf: &mut Buffer, clip: &mut InMemoryClipboard, map: &Keymap, s: &str) {
    for c in s.chars() {
        press(buf, clip, map, KeyChord::plain(Key::Char(c)));
    }
}

#[test]
fn search_find_step_accept_edit() {
    let mut buf = Buffer::from_bytes(b"alpha beta\nalpha gamma\n", 4, 80, 24);
    let mut clip = InMemoryClipboard::default();
    let map = Keymap::standard();

    press(&mut buf, &mut clip, &map, KeyChord::ctrl(Key::Char('f')));
    type_str(&mut buf, &mut clip, &map, "alpha");
    assert_eq!(buf.search.matches.len(), 2);
    assert_eq!(buf.cursors.primary().point, 0);

    press(&mut buf, &mut clip, &map, KeyChord::plain(Key::Down));
    assert_eq!(buf.cursors.primary().point, 11);

    press(&mut buf, &mut clip, &map, KeyChord::plain(Key::Enter));
    assert!(!buf.search.is_searching());

    // editing resumes at the accepted position
    type_str(&mut buf, &mut clip, &map, ">");
    assert_eq!(buf.content(), b"alpha beta\n>alpha gamma\n");
}

#[test]
fn search_esc_restores_normal_typing() {
    let mut buf = Buffer::from_bytes(b"needle haystack", 4, 80, 24);
    let mut clip = InMemoryClipboard::default();
    let map = Keymap::standard();

    press(&mut buf, &mut clip, &map, KeyChord::ctrl(Key::Char('f')));
    type_str(&mut buf, &mut clip, &map, "stack");
    press(&mut buf, &mut clip, &map, KeyChord::plain(Key::Esc));
    assert!(buf.search.matches.is_empty());

    type_str(&mut buf, &mut clip, &map, "!");
    assert_eq!(buf.content(), b"needle hay!stack");
}

#[test]
fn regex_query_steps_through_structured_matches() {
    let mut buf = Buffer::from_bytes(b"v1 = 10\nv2 = 20\nv3 = 30\n", 4, 80, 24);
    let mut clip = InMemoryClipboard::default();
    let map = Keymap::standard();

    press(&mut buf, &mut clip, &map, KeyChord::ctrl(Key::Char('f')));
    type_str(&mut buf, &mut clip, &map, r"v\d");
    assert_eq!(buf.search.matches.len(), 3);
    press(&mut buf, &mut clip, &map, KeyChord::plain(Key::Down));
    assert_eq!(buf.cursors.primary().point, 8);
    press(&mut buf, &mut clip, &map, KeyChord::plain(Key::Up));
    assert_eq!(buf.cursors.primary().point, 0);
    // wrap backwards to the last match
    press(&mut buf, &mut clip, &map, KeyChord::plain(Key::Up));
    assert_eq!(buf.cursors.primary().point, 16);
}

#[tokio::test]
async fn background_search_populates_highlight_slot() {
    let buf = Buffer::from_bytes(b"Tea and TEA and tea", 4, 80, 24);
    let slot: MatchSlot = Arc::default();

    let handle =
        core_search::spawn_find_all(buf.content().to_vec(), b"tea".to_vec(), Arc::clone(&slot));
    handle.await.expect("search task panicked");

    let matches = slot.lock().unwrap().clone();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].start, 0);
    assert_eq!(matches[2].start, 16);
}

#[tokio::test]
async fn background_search_reruns_after_an_edit() {
    let mut buf = Buffer::from_bytes(b"x x x", 4, 80, 24);
    let slot: MatchSlot = Arc::default();

    core_search::spawn_find_all(buf.content().to_vec(), b"x".to_vec(), Arc::clone(&slot))
        .await
        .unwrap();
    assert_eq!(slot.lock().unwrap().len(), 3);

    buf.splice_insert(0, b"x ");
    buf.refresh();
    core_search::spawn_find_all(buf.content().to_vec(), b"x".to_vec(), Arc::clone(&slot))
        .await
        .unwrap();
    assert_eq!(slot.lock().unwrap().len(), 4, "stale results replaced");
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn capture_is_interactive_and_records_writes() {
    let term = Terminal::capture();
    assert!(term.is_interactive());

    term.write_str("abc").unwrap();
    term.backspace(3).unwrap();
    assert_eq!(term.contents(), "abc\x08\x08\x08");
}

#[test]
fn cursor_movement_emits_ansi_sequences() {
    let term = Terminal::capture();
    term.move_up(2).unwrap();
    term.move_down(1).unwrap();
    term.erase_line().unwrap();
    assert_eq!(term.contents(), "\x1b[2A\x1b[1B\r\x1b[2K");
}

#[test]
fn zero_moves_write_nothing() {
    let term = Terminal::capture();
    term.move_up(0).unwrap();
    term.backspace(0).unwrap();
    term.erase(0).unwrap();
    assert_eq!(term.contents(), "");
}

#[test]
fn erase_blanks_and_returns() {
    let term = Terminal::capture();
    term.erase(2).unwrap();
    assert_eq!(term.contents(), "  \x08\x08");
}

#[test]
fn disabled_terminal_is_not_interactive() {
    let term = Terminal::disabled();
    assert!(!term.is_interactive());
    assert_eq!(term.contents(), "");
}

#[test]
fn term_like_writes_through_same_stream() {
    let term = Terminal::capture();
    TermLike::write_line(&term, "bar").unwrap();
    TermLike::clear_line(&term).unwrap();
    TermLike::move_cursor_left(&term, 3).unwrap();
    assert_eq!(term.contents(), "bar\n\r\x1b[2K\x1b[3D");
}

//! Single-pass word lexer.
//!
//! Classifies `content` into maximal runs of word bytes (letters + digits),
//! whitespace (`\n`, `\r`, space), and single-byte symbol tokens; everything
//! that is neither word nor whitespace is its own one-byte `Symbol`. The
//! resulting spans cover the content contiguously.
//!
//! The lexer is recomputed wholesale after every content mutation; edits are
//! interactive-speed, so the O(n) rescan is acceptable and keeps the token
//! list trivially consistent with the buffer.

use crate::bytes::{is_whitespace_byte, is_word_byte};

/// Classification of a token span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Whitespace,
    Symbol,
}

/// A maximal classified run `[start, end)` of the buffer content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

impl Token {
    /// True if `offset` falls inside this token's span.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    None,
    InsideWord,
    InsideWhitespace,
}

/// Tokenize the full content in one forward scan.
///
/// A transition out of a word/whitespace run closes the current token at the
/// transition point and opens the next; symbol bytes always close and emit
/// immediately.
pub fn tokenize(content: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut state = ScanState::None;
    let mut run_start = 0usize;
    for (i, &b) in content.iter().enumerate() {
        let next = if is_word_byte(b) {
            ScanState::InsideWord
        } else if is_whitespace_byte(b) {
            ScanState::InsideWhitespace
        } else {
            ScanState::None
        };
        if state != ScanState::None && next != state {
            tokens.push(Token {
                start: run_start,
                end: i,
                kind: kind_of(state),
            });
            state = ScanState::None;
        }
        match next {
            ScanState::None => {
                // Symbols are one-byte tokens; emit immediately.
                tokens.push(Token {
                    start: i,
                    end: i + 1,
                    kind: TokenKind::Symbol,
                });
            }
            _ => {
                if state == ScanState::None {
                    run_start = i;
                    state = next;
                }
            }
        }
    }
    if state != ScanState::None {
        tokens.push(Token {
            start: run_start,
            end: content.len(),
            kind: kind_of(state),
        });
    }
    tokens
}

fn kind_of(state: ScanState) -> TokenKind {
    match state {
        ScanState::InsideWord => TokenKind::Word,
        ScanState::InsideWhitespace => TokenKind::Whitespace,
        ScanState::None => TokenKind::Symbol,
    }
}

/// Index of the token whose `[start, end)` span contains `offset`.
///
/// Linear scan; the token list is rebuilt on every edit anyway, so a search
/// structure would buy nothing here.
pub fn token_at(tokens: &[Token], offset: usize) -> Option<usize> {
    tokens.iter().position(|t| t.contains(offset))
}

//! Pure byte-slice text helpers.
//!
//! This crate is the leaf of the workspace: no editor state, no I/O. It holds
//! the byte-level primitives every editing command is defined in terms of
//! (`bytes`) and the single-pass word lexer (`lexer`) whose token spans drive
//! word motions and "select enclosing token".
//!
//! The engine is deliberately byte-oriented: offsets index raw bytes and
//! multi-byte UTF-8 sequences are not protected from being split. Callers
//! that need Unicode correctness must layer it above this crate.

pub mod bytes;
pub mod lexer;

pub use lexer::{Token, TokenKind, token_at, tokenize};

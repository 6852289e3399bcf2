//! Stateless scans over a byte slice: classification, word-boundary seeks,
//! line-boundary seeks, and matching-bracket search.
//!
//! All offsets are plain byte indices clamped to `0..=content.len()`;
//! out-of-range inputs clamp rather than error.

/// True for the bytes the lexer classifies as word constituents
/// (ASCII letters and digits).
#[inline]
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// True for the bytes the lexer classifies as whitespace. Tabs never occur
/// in-memory (they are expanded to spaces on load), so only `\n`, `\r` and
/// the space byte qualify.
#[inline]
pub fn is_whitespace_byte(b: u8) -> bool {
    b == b'\n' || b == b'\r' || b == b' '
}

/// Offset of the first byte of the line containing `offset` (the byte just
/// past the previous `\n`, or 0).
pub fn line_start(content: &[u8], offset: usize) -> usize {
    let offset = offset.min(content.len());
    match content[..offset].iter().rposition(|&b| b == b'\n') {
        Some(nl) => nl + 1,
        None => 0,
    }
}

/// Offset of the `\n` terminating the line containing `offset`, or
/// `content.len()` when the line is unterminated.
pub fn line_end(content: &[u8], offset: usize) -> usize {
    let offset = offset.min(content.len());
    match content[offset..].iter().position(|&b| b == b'\n') {
        Some(nl) => offset + nl,
        None => content.len(),
    }
}

/// Seek forward from `from` to the start of the next word run.
///
/// If `from` is inside a word, the rest of that word is skipped first; any
/// non-word bytes after it are then consumed. Returns `content.len()` when
/// no further word exists.
pub fn seek_word_forward(content: &[u8], from: usize) -> usize {
    let mut i = from.min(content.len());
    while i < content.len() && is_word_byte(content[i]) {
        i += 1;
    }
    while i < content.len() && !is_word_byte(content[i]) {
        i += 1;
    }
    i
}

/// Seek backward from `from` to the start of the previous word run.
/// Returns 0 when no word precedes `from`.
pub fn seek_word_backward(content: &[u8], from: usize) -> usize {
    let mut i = from.min(content.len());
    while i > 0 && !is_word_byte(content[i - 1]) {
        i -= 1;
    }
    while i > 0 && is_word_byte(content[i - 1]) {
        i -= 1;
    }
    i
}

/// Find the offset of the bracket matching the one at `at`.
///
/// Supports `()`, `[]` and `{}` with nesting. Returns `None` when `at` is
/// not on a bracket byte or the match is unbalanced.
pub fn matching_bracket(content: &[u8], at: usize) -> Option<usize> {
    let &open = content.get(at)?;
    let (close, forward) = match open {
        b'(' => (b')', true),
        b'[' => (b']', true),
        b'{' => (b'}', true),
        b')' => (b'(', false),
        b']' => (b'[', false),
        b'}' => (b'{', false),
        _ => return None,
    };
    let mut depth = 0usize;
    if forward {
        for (i, &b) in content.iter().enumerate().skip(at) {
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
    } else {
        for i in (0..=at).rev() {
            let b = content[i];
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
    }
    None
}

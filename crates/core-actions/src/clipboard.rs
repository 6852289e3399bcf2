//! The clipboard seam.
//!
//! OS clipboard integration is an external collaborator; the engine only
//! depends on this trait. Tests (and headless use) plug in the in-memory
//! implementation.

/// Byte-oriented clipboard access.
pub trait Clipboard {
    /// Current clipboard contents (empty when nothing was written).
    fn read_text(&mut self) -> Vec<u8>;
    /// Replace the clipboard contents.
    fn write_text(&mut self, bytes: &[u8]);
}

/// Process-local clipboard used in tests and headless embedding.
#[derive(Debug, Default, Clone)]
pub struct InMemoryClipboard {
    data: Vec<u8>,
}

impl Clipboard for InMemoryClipboard {
    fn read_text(&mut self) -> Vec<u8> {
        self.data.clone()
    }

    fn write_text(&mut self, bytes: &[u8]) {
        self.data = bytes.to_vec();
    }
}

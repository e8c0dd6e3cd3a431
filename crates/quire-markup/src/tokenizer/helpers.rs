//! Helper functions for the tokenizer.
//!
//! This module contains utility functions used by the state machine:
//! - State transitions ("switch to", "reconsume")
//! - Input handling (consume one byte, push one byte back)
//! - Token buffer growth with checked allocation
//! - Trailing-whitespace trimming and token hand-off

use std::io::{BufRead, ErrorKind};

use super::core::{Tokenizer, TokenizerState};
use crate::error::{MarkupError, Result};

/// Token buffers grow by this many bytes at a time.
const BUFFER_CHUNK: usize = 1024;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<R> Tokenizer<R> {
    /// Transitions to a new state. The next byte is consumed on the next
    /// iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// Hands `byte` back so that the next token starts with it.
    pub(super) const fn reconsume(&mut self, byte: u8) {
        self.pushed_back = Some(byte);
    }
}

// =============================================================================
// Input Helpers
// =============================================================================

impl<R: BufRead> Tokenizer<R> {
    /// Consume the next input byte, or `None` at end of input.
    ///
    /// Interrupted reads are retried; any other read error is reported.
    pub(super) fn consume(&mut self) -> Result<Option<u8>> {
        if let Some(byte) = self.pushed_back.take() {
            return Ok(Some(byte));
        }

        let next = loop {
            match self.reader.fill_buf() {
                Ok(available) => break available.first().copied(),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(MarkupError::Read(err)),
            }
        };
        if next.is_some() {
            self.reader.consume(1);
        }
        Ok(next)
    }
}

// =============================================================================
// Token Buffer Helpers
// =============================================================================

impl<R> Tokenizer<R> {
    /// Append a byte to the current token, growing the buffer in
    /// [`BUFFER_CHUNK`] steps.
    pub(super) fn append(&mut self, byte: u8) -> Result<()> {
        if self.buffer.len() == self.buffer.capacity() {
            self.buffer.try_reserve(BUFFER_CHUNK)?;
        }
        self.buffer.push(byte);
        Ok(())
    }

    /// Trim trailing whitespace from the buffered token.
    ///
    /// Tags lose all of it. A content run loses it only if it spans a line
    /// break; same-line spacing before a tag is content.
    pub(super) fn trim_trailing_whitespace(&mut self) {
        let content_end = self
            .buffer
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(0, |last| last + 1);

        let is_layout = self.buffer[content_end..]
            .iter()
            .any(|&b| b == b'\n' || b == b'\r');

        if self.state != TokenizerState::Text || is_layout {
            self.buffer.truncate(content_end);
        }
    }

    /// Turn the buffered bytes into an owned token string.
    pub(super) fn take_token(&mut self) -> Result<String> {
        let text = std::str::from_utf8(&self.buffer)?;
        let mut token = String::new();
        token.try_reserve_exact(text.len())?;
        token.push_str(text);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffered(state: TokenizerState, bytes: &[u8]) -> Tokenizer<&'static [u8]> {
        let mut tokenizer = Tokenizer::new(&b""[..]);
        tokenizer.buffer = bytes.to_vec();
        tokenizer.switch_to(state);
        tokenizer
    }

    #[test]
    fn test_trim_text_keeps_same_line_space() {
        let mut tokenizer = buffered(TokenizerState::Text, b"Hello ");
        tokenizer.trim_trailing_whitespace();
        assert_eq!(tokenizer.buffer, b"Hello ");
    }

    #[test]
    fn test_trim_text_drops_layout_whitespace() {
        let mut tokenizer = buffered(TokenizerState::Text, b"Hello \n    ");
        tokenizer.trim_trailing_whitespace();
        assert_eq!(tokenizer.buffer, b"Hello");
    }

    #[test]
    fn test_trim_tag_drops_everything() {
        let mut tokenizer = buffered(TokenizerState::Tag, b"<b  \t");
        tokenizer.trim_trailing_whitespace();
        assert_eq!(tokenizer.buffer, b"<b");
    }

    #[test]
    fn test_append_grows_in_chunks() {
        let mut tokenizer = Tokenizer::new(&b""[..]);
        for _ in 0..=BUFFER_CHUNK {
            tokenizer.append(b'x').unwrap();
        }
        assert_eq!(tokenizer.buffer.len(), BUFFER_CHUNK + 1);
        assert!(tokenizer.buffer.capacity() >= 2 * BUFFER_CHUNK);
    }

    #[test]
    fn test_consume_uses_pushed_back_byte_first() {
        let mut tokenizer = Tokenizer::new(&b"b"[..]);
        tokenizer.reconsume(b'a');
        assert_eq!(tokenizer.consume().unwrap(), Some(b'a'));
        assert_eq!(tokenizer.consume().unwrap(), Some(b'b'));
        assert_eq!(tokenizer.consume().unwrap(), None);
    }
}

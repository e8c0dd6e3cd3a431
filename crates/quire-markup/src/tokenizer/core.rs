use std::io::BufRead;

use strum_macros::Display;

use super::token::Token;
use crate::error::Result;

/// The tokenizer state machine.
///
/// One call to [`Tokenizer::next_token`] starts in `BeforeToken` and ends as
/// soon as a complete token has been buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Skipping whitespace that precedes the first significant character.
    BeforeToken,
    /// Inside `<...>`, outside double quotes.
    Tag,
    /// Inside `<...>`, between double quotes: `>` does not end the tag.
    TagQuoted,
    /// Inside a run of content, up to the next `<`.
    Text,
}

/// Splits a character stream into complete tags and content runs.
///
/// The stream is scanned byte by byte. Every delimiter the tokenizer cares
/// about (`<`, `>`, `"`, ASCII whitespace) is a single ASCII byte, so
/// multi-byte UTF-8 sequences pass through untouched and each finished token
/// is validated as UTF-8 once.
pub struct Tokenizer<R> {
    /// Source of input bytes.
    pub(super) reader: R,

    /// A `<` that ended a content run, handed back to the next token.
    pub(super) pushed_back: Option<u8>,

    /// Current state of the state machine.
    pub(super) state: TokenizerState,

    /// Bytes of the token being assembled.
    pub(super) buffer: Vec<u8>,

    /// Set once the input is exhausted or an error was reported.
    pub(super) finished: bool,
}

impl<R: BufRead> Tokenizer<R> {
    /// Create a tokenizer over a buffered reader.
    ///
    /// `&[u8]` implements [`BufRead`], so `Tokenizer::new(text.as_bytes())`
    /// tokenizes an in-memory string.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            pushed_back: None,
            state: TokenizerState::BeforeToken,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// The current state of the tokenizer state machine.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Read the next token from the stream.
    ///
    /// - Whitespace before the first significant character is skipped.
    /// - If that character is `<`, the token runs up to and including the
    ///   next `>` that is not between double quotes.
    /// - Otherwise the token is a content run up to, not including, the
    ///   next `<`; the `<` is kept for the following call.
    /// - Trailing whitespace of a tag is trimmed. Trailing whitespace of a
    ///   content run is trimmed when it contains a line break, and kept
    ///   when it stays on the content's last line (`Hello <b>` keeps
    ///   `"Hello "`).
    ///
    /// An empty string means the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::Read`](crate::MarkupError::Read) if the reader
    /// fails, [`MarkupError::InvalidUtf8`](crate::MarkupError::InvalidUtf8)
    /// if the token is not UTF-8, and
    /// [`MarkupError::Allocation`](crate::MarkupError::Allocation) if the
    /// token buffer cannot grow.
    pub fn next_token(&mut self) -> Result<String> {
        self.buffer.clear();
        self.switch_to(TokenizerState::BeforeToken);

        while let Some(byte) = self.consume()? {
            match self.state {
                TokenizerState::BeforeToken => {
                    if byte.is_ascii_whitespace() {
                        continue;
                    }
                    self.append(byte)?;
                    if byte == b'<' {
                        self.switch_to(TokenizerState::Tag);
                    } else {
                        self.switch_to(TokenizerState::Text);
                    }
                }

                TokenizerState::Tag => {
                    self.append(byte)?;
                    match byte {
                        b'"' => self.switch_to(TokenizerState::TagQuoted),
                        b'>' => break,
                        _ => {}
                    }
                }

                TokenizerState::TagQuoted => {
                    self.append(byte)?;
                    if byte == b'"' {
                        self.switch_to(TokenizerState::Tag);
                    }
                }

                TokenizerState::Text => {
                    if byte == b'<' {
                        self.reconsume(byte);
                        break;
                    }
                    self.append(byte)?;
                }
            }
        }

        self.trim_trailing_whitespace();
        self.take_token()
    }
}

impl<R: BufRead> Iterator for Tokenizer<R> {
    type Item = Result<Token>;

    /// Yields classified tokens until the stream is exhausted or the first
    /// error, which is yielded once.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(raw) if raw.is_empty() => {
                self.finished = true;
                None
            }
            Ok(raw) => Some(Ok(Token::classify(raw))),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

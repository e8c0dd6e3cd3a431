//! Tokenizer module.
//!
//! Turns a character stream into complete `<...>` tags and content runs,
//! then classifies each tag by form for the tree builder.

/// Helper methods for tokenizer state transitions and buffering.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;
/// Tokenizer state machine implementation.
pub mod core;

pub use self::core::{Tokenizer, TokenizerState};
pub use token::{Token, TokenKind};

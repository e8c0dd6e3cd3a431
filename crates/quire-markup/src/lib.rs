//! Permissive markup tokenizer, tree builder, and serializer.
//!
//! # Scope
//!
//! This crate implements a small XML/HTML-like document format:
//! - **Tokenizer**: splits a byte stream into complete `<...>` tags and
//!   content runs ([`Tokenizer`])
//! - **Tag analyzer**: turns one open tag into a name plus ordered
//!   attributes ([`analyze_open_tag`])
//! - **Tree builder**: recursive descent over the token stream producing a
//!   [`Node`] tree with mixed content preserved ([`TreeBuilder`])
//! - **Serializer**: deterministic, indented writer ([`Serializer`])
//!
//! # Input dialect
//!
//! One optional prologue token (`<?xml ...?>` or `<!DOCTYPE ...>`), then a
//! single root element. Attribute values are double-quoted. There is no
//! entity decoding, CDATA, comment handling, or namespace support.
//!
//! # Malformed markup
//!
//! Parsing is permissive by default. See [`TreeBuilder`] for the exact
//! recovery rules and [`TreeBuilder::with_strict_mode`] to reject instead.

/// Error type for all markup operations.
pub mod error;
/// Tree construction from a token stream.
pub mod parser;
/// Writing trees back out as markup.
pub mod serializer;
/// Open-tag analysis into name and attributes.
pub mod tag;
/// Splitting a character stream into tokens.
pub mod tokenizer;

use std::fs::File;
use std::io::{BufRead, BufWriter};
use std::path::Path;

pub use error::{MarkupError, Result};
pub use parser::{IssueKind, ParseIssue, TreeBuilder};
pub use quire_dom::{Attribute, Node};
pub use serializer::{Serializer, SerializerConfig};
pub use tag::{OpenTag, analyze_open_tag};
pub use tokenizer::{Token, TokenKind, Tokenizer, TokenizerState};

/// Parse a document held in memory.
///
/// # Errors
///
/// See [`TreeBuilder::run`].
pub fn parse_str(source: &str) -> Result<Node> {
    TreeBuilder::new(source.as_bytes()).run()
}

/// Parse a document from any buffered reader.
///
/// # Errors
///
/// See [`TreeBuilder::run`].
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Node> {
    TreeBuilder::new(reader).run()
}

/// Open `path` and parse it.
///
/// # Errors
///
/// Returns [`MarkupError::Open`] if the file cannot be opened, otherwise
/// see [`TreeBuilder::run`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Node> {
    TreeBuilder::from_file(path)?.run()
}

/// Serialize `root` with the default layout.
///
/// # Errors
///
/// See [`Serializer::to_markup`].
pub fn to_markup(root: &Node) -> Result<String> {
    Serializer::new().to_markup(root)
}

/// Create or truncate `path` and serialize `root` into it.
///
/// # Errors
///
/// Returns [`MarkupError::Create`] if the file cannot be created and
/// [`MarkupError::Write`] if any write fails.
pub fn write_file(path: impl AsRef<Path>, root: &Node) -> Result<()> {
    write_file_with(path, root, &Serializer::new())
}

/// Like [`write_file`], with a custom serializer.
///
/// # Errors
///
/// See [`write_file`].
pub fn write_file_with(path: impl AsRef<Path>, root: &Node, serializer: &Serializer) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| MarkupError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    serializer.write(root, &mut BufWriter::new(file))
}

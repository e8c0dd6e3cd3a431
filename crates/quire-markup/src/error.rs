//! Error type shared by every markup operation.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

use crate::parser::ParseIssue;

/// Result alias for markup operations.
pub type Result<T> = std::result::Result<T, MarkupError>;

/// Everything that can go wrong while reading or writing a document.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The input file could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        /// File that was requested.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The output file could not be created.
    #[error("cannot create {}: {source}", .path.display())]
    Create {
        /// File that was requested.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Reading from the input stream failed (distinct from end of input).
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// Writing a serialized document failed; nothing after the failing
    /// write was attempted.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// A token was not valid UTF-8.
    #[error("token is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    /// Growing a token buffer failed.
    #[error("out of memory while buffering a token: {0}")]
    Allocation(#[from] TryReserveError),

    /// The input ended before any open tag was found.
    #[error("document has no root element")]
    NoRootElement,

    /// Strict mode rejected malformed markup.
    #[error("malformed markup at token {}: {}", .0.token_index, .0.message)]
    Malformed(ParseIssue),
}

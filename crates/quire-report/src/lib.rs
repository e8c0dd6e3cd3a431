//! Report generation on top of the Quire document model.
//!
//! # Scope
//!
//! - **Page assembly** ([`HtmlPage`], [`HtmlTable`], [`ListBuilder`]):
//!   builds HTML pages purely through [`quire_dom::Node`] constructors and
//!   hands them to the markup serializer.
//! - **Svn log projection** ([`present_svn_log`], [`LogTable`]): reads the
//!   output of `svn log --xml` into rows, writes them as CSV, and counts
//!   commits per month and per author.
//!
//! Neither part reaches into the tokenizer or the tree builder.

use std::io;

use thiserror::Error;

use quire_markup::MarkupError;

/// HTML page and table assembly.
pub mod page;
/// Svn log tables.
pub mod svn_log;

pub use page::{HtmlPage, HtmlTable, ListBuilder, format_date};
pub use svn_log::{
    AuthorActivity, LogEntry, LogTable, MonthAuthorCount, MonthCount, clean_date_format,
    present_svn_log,
};

/// Result alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors raised while assembling or writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reading or writing a document failed.
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// A table cell outside the table was addressed.
    #[error("cell ({col}, {line}) is outside the table")]
    CellOutOfRange {
        /// Zero-based column index.
        col: usize,
        /// Zero-based line index.
        line: usize,
    },

    /// HTML only has `<h1>` to `<h6>`.
    #[error("heading level {0} is not between 1 and 6")]
    InvalidHeadingLevel(u8),

    /// Writing a CSV table failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

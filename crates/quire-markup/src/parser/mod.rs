//! Tree construction.

/// The recursive-descent tree builder.
pub mod core;

pub use self::core::{IssueKind, ParseIssue, TreeBuilder};

//! Common utilities for the Quire markup tools.
//!
//! This crate provides shared infrastructure used by all Quire components:
//! - **Warning System** - colored, de-duplicated terminal output for
//!   recoverable markup problems

pub mod warning;

//! Crate-boundary error types.
//!
//! Parse-time diagnostics stay plain strings accumulated on the
//! [`Parser`](crate::parser::Parser) — the scenarios this interpreter is
//! tested against check exact message text, and the parser's contract is
//! "collect strings, keep going" rather than "stop at the first typed
//! error". This module instead covers the failures that happen *around*
//! the core pipeline: reading a script from disk, or a program whose
//! parser reported errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failures a caller of the library's top-level helpers can match on.
#[derive(Error, Debug)]
pub enum MonkeyError {
    /// The script file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parser reported one or more syntax errors; evaluation never ran.
    #[error("parse error(s):\n{}", .0.join("\n"))]
    Parse(Vec<String>),
}

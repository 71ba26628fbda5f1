//! Error types for D2 operations.

use std::io;

use thiserror::Error;

use d2_compiler::ParseError;

/// The main error type for D2 operations.
///
/// The `Compile` variant keeps the source text and path so callers can
/// render diagnostics against it.
#[derive(Debug, Error)]
pub enum D2Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Compile {
        err: ParseError,
        path: String,
        src: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl D2Error {
    /// Create a new `Compile` error with the associated source code.
    pub fn new_compile_error(
        err: ParseError,
        path: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self::Compile {
            err,
            path: path.into(),
            src: src.into(),
        }
    }
}

//! The error returned by [`compile`](crate::compile).
//!
//! [`ParseError`] wraps every [`Diagnostic`] produced while compiling a
//! source file, in the order the stages reported them.

use std::fmt;

use crate::error::{Diagnostic, LineIndex};

/// Error type for the compilation pipeline.
///
/// Wraps one or more diagnostics.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Resolve every diagnostic's primary span into a location within `path`.
    pub fn locate(self, path: &str, index: &LineIndex<'_>, utf16: bool) -> Self {
        let diagnostics = self
            .diagnostics
            .into_iter()
            .map(|diagnostic| diagnostic.locate(path, index, utf16))
            .collect();
        Self { diagnostics }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

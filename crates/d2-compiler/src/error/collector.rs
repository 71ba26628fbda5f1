//! Per-board diagnostic accumulation.
//!
//! Every stage after parsing keeps going after a problem. A board's
//! [`DiagnosticCollector`] receives its diagnostics in the order they are
//! found, followed by those of its nested boards.

use crate::error::{Diagnostic, ParseError};

/// Ordered list of diagnostics with a running error count.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.errors += usize::from(diagnostic.severity().is_error());
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        diagnostics.into_iter().for_each(|d| self.emit(d));
    }

    /// Returns `true` if any error-severity diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// `Err` with everything collected if any error was emitted.
    ///
    /// Warnings alone do not fail and are dropped.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors() {
            return Err(ParseError::new(self.diagnostics));
        }
        Ok(())
    }
}

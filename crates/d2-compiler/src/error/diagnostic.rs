//! The core diagnostic type of the compiler.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, multiple labeled source spans, help text and, once the
//! pipeline has finished, a resolved source [`Location`].

use std::fmt;

use d2_core::span::Span;

use crate::error::{ErrorCode, Label, LineIndex, Location, Severity};

/// A rich diagnostic message with source location information.
///
/// A diagnostic carries:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - A primary message describing the issue
/// - Zero or more labeled source spans
/// - Optional help text with suggestions
/// - The resolved `path:line:column`, filled in by [`Diagnostic::locate`]
///
/// # Example
///
/// ```text
/// diagram.d2:2:10: unknown shape "blob"
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
    location: Option<Location>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use d2_compiler::{Diagnostic, ErrorCode};
    /// # use d2_core::span::Span;
    ///
    /// let diag = Diagnostic::error("constraint value must be a string")
    ///     .with_code(ErrorCode::E206)
    ///     .with_label(Span::new(0..10), "expected a string");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The resolved source location, once [`Diagnostic::locate`] has run.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// The span of the first primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Resolve the primary span into a location within `path`.
    ///
    /// Diagnostics without a primary label stay unlocated.
    pub fn locate(mut self, path: &str, index: &LineIndex<'_>, utf16: bool) -> Self {
        self.location = self
            .primary_span()
            .map(|span| index.locate(path, span.start(), utf16));
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            location: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Located: "path:line:col: message"; otherwise "error[E001]: message"
        if let Some(location) = &self.location {
            return write!(f, "{}: {}", location, self.message);
        }
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert!(diag.location().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("width and height must be equal for circle shapes")
            .with_code(ErrorCode::E302)
            .with_label(Span::new(30..36), "differs from width")
            .with_secondary_label(Span::new(20..25), "width set here")
            .with_help("give both the same value");

        assert_eq!(diag.code(), Some(ErrorCode::E302));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(!diag.labels()[1].is_primary());
        assert_eq!(diag.primary_span(), Some(Span::new(30..36)));
        assert_eq!(diag.help(), Some("give both the same value"));
    }

    #[test]
    fn test_diagnostic_display_without_location() {
        let diag = Diagnostic::error("unknown shape \"blob\"").with_code(ErrorCode::E201);
        assert_eq!(diag.to_string(), "error[E201]: unknown shape \"blob\"");

        let diag = Diagnostic::warning("unused");
        assert_eq!(diag.to_string(), "warning: unused");
    }

    #[test]
    fn test_diagnostic_locate_uses_primary_label() {
        let source = "a\nb: {shape: blob}";
        let index = LineIndex::new(source);
        let diag = Diagnostic::error("unknown shape \"blob\"")
            .with_secondary_label(Span::new(0..1), "context")
            .with_label(Span::new(13..17), "not a shape")
            .locate("x.d2", &index, false);

        assert_eq!(diag.location(), Some(&Location::new("x.d2", 2, 12)));
        assert_eq!(diag.to_string(), "x.d2:2:12: unknown shape \"blob\"");
    }

    #[test]
    fn test_diagnostic_locate_without_label_stays_unlocated() {
        let index = LineIndex::new("");
        let diag = Diagnostic::error("no span").locate("x.d2", &index, false);
        assert!(diag.location().is_none());
    }
}

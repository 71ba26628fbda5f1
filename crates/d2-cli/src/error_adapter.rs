//! Bridge from [`D2Error`] to miette diagnostics.
//!
//! The library reports errors with its own types; the CLI renders them with
//! miette's snippet formatting.
//!
//! # Multiple diagnostics
//!
//! A compile error carries one or more [`Diagnostic`]s. Each is rendered as
//! its own report against the source text.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use d2::D2Error;
use d2_compiler::Diagnostic;
use d2_core::span::Span;

/// Adapter for a single compiler diagnostic.
///
/// Wraps a [`Diagnostic`] together with the source it points into and
/// implements [`MietteDiagnostic`] so the CLI can print labelled snippets.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source text the diagnostic's spans index into
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diag.location() {
            Some(location) => write!(f, "{location}: {}", self.diag.message()),
            None => f.write_str(self.diag.message()),
        }
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`D2Error`] variants without source spans.
///
/// Covers I/O, configuration and export failures, which are reported with
/// a code but no snippet.
pub struct ErrorAdapter<'a>(pub &'a D2Error);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            D2Error::Io(_) => "d2::io",
            D2Error::Compile { .. } => return None,
            D2Error::Config(_) => "d2::config",
            D2Error::Export(_) => "d2::export",
        };
        Some(Box::new(code))
    }
}

/// A report that miette can render.
///
/// Wraps either a located diagnostic or a plain error so `main` can render
/// both the same way.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A compiler diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without a source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a byte [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`D2Error`] into a list of reports.
///
/// [`D2Error::Compile`] yields one [`Reportable`] per diagnostic, in the
/// order they were reported. Every other variant yields a single report.
pub fn to_reportables(err: &D2Error) -> Vec<Reportable<'_>> {
    match err {
        D2Error::Compile { err, src, .. } => err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use d2::DiagramBuilder;
    use d2_compiler::{ErrorCode, ParseError};

    use super::*;

    fn compile_err(source: &str) -> D2Error {
        DiagramBuilder::default()
            .compile("test.d2", source)
            .expect_err("source should fail to compile")
    }

    #[test]
    fn test_one_report_per_diagnostic() {
        let err = compile_err("a.shape: blob\nb.width: wide\nc.direction: sideways");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 3);
        assert_eq!(
            reportables[0].to_string(),
            "test.d2:1:10: unknown shape \"blob\""
        );
        assert!(reportables[1].to_string().starts_with("test.d2:2:10: "));
    }

    #[test]
    fn test_diagnostic_code_and_labels() {
        let diag = Diagnostic::error("constraint value must be a string")
            .with_code(ErrorCode::E206)
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(6..9), "secondary")
            .with_help("quote the value");
        let adapter = DiagnosticAdapter::new(&diag, "users.id: 1");

        assert_eq!(adapter.code().map(|c| c.to_string()), Some("E206".to_string()));
        assert_eq!(adapter.help().map(|h| h.to_string()), Some("quote the value".to_string()));

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("secondary"));
    }

    #[test]
    fn test_unlocated_diagnostic_displays_message() {
        let diag = Diagnostic::error("bare message");
        let err = D2Error::new_compile_error(ParseError::from(diag), "x.d2", "x");

        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].to_string(), "bare message");
    }

    #[test]
    fn test_non_compile_error() {
        let err = D2Error::Config("bad value".to_string());

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad value");
                assert_eq!(e.code().map(|c| c.to_string()), Some("d2::config".to_string()));
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }
}

//! Spans attached to a diagnostic.

use d2_core::span::Span;

/// A message pinned to a source span.
///
/// A diagnostic is reported at its first primary label. Secondary labels
/// point at related declarations:
///
/// ```text
/// diagram.d2:4:11: width and height must be equal for circle shapes
///   |
/// 3 |   width: 10
///   |   ----- width set here
/// 4 |   height: 20
///   |   ^^^^^^
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    /// Create a primary label, marking where the problem is.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, true)
    }

    /// Create a secondary label for related context.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, false)
    }

    fn new(span: Span, message: impl Into<String>, primary: bool) -> Self {
        Self {
            span,
            message: message.into(),
            primary,
        }
    }

    /// Get the span this label points at.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let primary = Label::primary(Span::new(10..20), "not a shape");
        let secondary = Label::secondary(Span::new(5..15), "width set here");

        assert!(primary.is_primary());
        assert_eq!(primary.span(), Span::new(10..20));
        assert_eq!(primary.message(), "not a shape");
        assert!(!secondary.is_primary());
    }
}

//! Error and diagnostic system for the D2 compiler.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//! - Source locations (`path:line:column`) resolved after compilation
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! for returning from [`compile`](crate::compile).
//!
//! # Example
//!
//! ```
//! # use d2_compiler::{Diagnostic, ErrorCode};
//! # use d2_core::span::Span;
//!
//! let diag = Diagnostic::error("unknown shape \"blob\"")
//!     .with_code(ErrorCode::E201)
//!     .with_label(Span::new(10..14), "not a shape")
//!     .with_help("use one of the built-in shapes, e.g. rectangle or circle");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod location;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use location::{LineIndex, Location};
pub use parse_error::ParseError;
pub use severity::Severity;

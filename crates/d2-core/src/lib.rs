//! D2 Core Types and Definitions
//!
//! This crate provides the data model shared by the D2 compiler stages:
//!
//! - **Spans**: Byte ranges into source text ([`span::Span`], [`span::Spanned`])
//! - **Keywords**: Reserved field names and style properties ([`keyword`] module)
//! - **Shapes**: Object shapes and arrowhead markers ([`shape`] module)
//! - **Attributes**: Labels, shapes, styles and other settings ([`attributes`], [`style`])
//! - **Graph**: The typed object/edge graph of a board ([`graph`] module)
//! - **Specialization**: Class and SQL table records ([`specialization`] module)

pub mod attributes;
pub mod graph;
pub mod keyword;
pub mod language;
pub mod near;
pub mod path;
pub mod shape;
pub mod span;
pub mod specialization;
pub mod style;

pub use path::format_path;

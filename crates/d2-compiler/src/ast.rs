//! Syntax tree produced by the [`parser`](crate::parser).
//!
//! Every node records the byte span it was parsed from so later stages can
//! point diagnostics at the exact source text.

use std::fmt;

use d2_core::{
    format_path,
    span::{Span, Spanned},
};

/// A sequence of statements: the file itself or a `{ ... }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub nodes: Vec<Node>,
    pub span: Span,
}

impl Map {
    /// The statements of this map, skipping comments.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Key(key) => Some(key),
            Node::Comment(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Key(Key),
    Comment(Spanned<String>),
}

/// One statement.
///
/// Exactly one of three forms:
/// - a field key: `a.b: value`, with `key` set;
/// - an edge chain: `a -> b -> c: value`, with `edges` set;
/// - an indexed edge: `(a -> b)[0].style.fill: red`, with one edge in
///   `edges`, `edge_index` set and an optional `edge_key` inside the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub key: Option<KeyPath>,
    pub edges: Vec<Edge>,
    pub edge_index: Option<Spanned<usize>>,
    pub edge_key: Option<KeyPath>,
    pub primary: Option<Scalar>,
    pub map: Option<Map>,
    pub span: Span,
}

/// A dot-separated key such as `a.b."c d"`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPath {
    pub segments: Vec<Spanned<String>>,
    pub span: Span,
}

impl KeyPath {
    /// The segment identifiers without spans.
    pub fn ids(&self) -> Vec<String> {
        self.segments
            .iter()
            .map(|segment| segment.inner().clone())
            .collect()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_path(&self.ids()))
    }
}

/// A single connection between two key paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub src: KeyPath,
    pub src_arrow: bool,
    pub dst: KeyPath,
    pub dst_arrow: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub kind: ScalarKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScalarKind {
    Null,
    Boolean(bool),
    /// Kept as written; numbers are only interpreted by the field using them.
    Number(String),
    Unquoted(String),
    DoubleQuoted(String),
    SingleQuoted(String),
    /// `|tag content|`, with `tag` empty when omitted.
    Block { tag: String, value: String },
}

impl Scalar {
    /// The text of the scalar as a field value.
    pub fn scalar_string(&self) -> &str {
        match &self.kind {
            ScalarKind::Null => "",
            ScalarKind::Boolean(true) => "true",
            ScalarKind::Boolean(false) => "false",
            ScalarKind::Number(raw) => raw,
            ScalarKind::Unquoted(value)
            | ScalarKind::DoubleQuoted(value)
            | ScalarKind::SingleQuoted(value) => value,
            ScalarKind::Block { value, .. } => value,
        }
    }

    /// Returns `true` for string scalars, quoted, unquoted or block.
    pub fn is_string(&self) -> bool {
        matches!(
            self.kind,
            ScalarKind::Unquoted(_)
                | ScalarKind::DoubleQuoted(_)
                | ScalarKind::SingleQuoted(_)
                | ScalarKind::Block { .. }
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ScalarKind::Null)
    }
}

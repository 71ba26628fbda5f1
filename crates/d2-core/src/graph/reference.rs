use serde::Serialize;

use crate::{graph::ObjectId, span::Span};

/// One occurrence of an object's key in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    /// The whole key path as written, e.g. `a.b.c`.
    pub key: String,
    pub key_span: Span,
    /// Position of this object's segment within `key`.
    pub key_path_index: usize,
    /// Span of the statement the key belongs to.
    pub map_key: Span,
    /// Index of the edge within the statement when the key is an edge endpoint.
    pub map_key_edge_index: Option<usize>,
    /// Span of the map the statement was written in.
    pub scope: Span,
    /// The object that owns `scope`, if it survived compilation.
    pub scope_obj: Option<ObjectId>,
}

/// One occurrence of an edge in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeReference {
    pub edge: Span,
    pub map_key: Span,
    pub map_key_edge_index: Option<usize>,
    pub scope: Span,
    pub scope_obj: Option<ObjectId>,
}

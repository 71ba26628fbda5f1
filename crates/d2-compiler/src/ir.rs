//! Intermediate representation between the syntax tree and the graph.
//!
//! The IR is the scope-resolved union of every declaration in a file:
//! dotted keys are expanded into nested [`Field`]s, repeated keys are merged
//! (a later primary value wins, maps merge recursively) and every
//! occurrence is kept as a reference. Edges are stored in the map of the
//! deepest common prefix of their endpoints.

mod build;

use d2_core::{format_path, keyword::BoardKind, span::Span};
use indexmap::IndexMap;

use crate::ast;

pub use build::build;

/// The content of a board, an object or an edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    pub fields: IndexMap<String, Field>,
    pub edges: Vec<Edge>,
}

impl Map {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Find the field named `name`, creating it if needed.
    pub fn ensure_field(&mut self, name: &str) -> &mut Field {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| Field::new(name))
    }

    /// Find or create the map at `path`, creating intermediate fields.
    pub fn ensure_map<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Map {
        let mut current = self;
        for segment in path {
            current = current
                .ensure_field(segment.as_ref())
                .map
                .get_or_insert_with(Map::default);
        }
        current
    }

    /// A copy of this board without its `layers`, `scenarios` and `steps`.
    pub fn copy_root(&self) -> Map {
        Map {
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| name.parse::<BoardKind>().is_err())
                .map(|(name, field)| (name.clone(), field.clone()))
                .collect(),
            edges: self.edges.clone(),
        }
    }

    /// The board-declaring fields of kind `kind`, in declaration order.
    pub fn board_fields(&self, kind: BoardKind) -> impl Iterator<Item = &Field> {
        self.fields
            .values()
            .filter(move |field| field.name.parse::<BoardKind>() == Ok(kind))
    }
}

/// A primary value and the statement that set it.
#[derive(Debug, Clone, PartialEq)]
pub struct Primary {
    pub value: ast::Scalar,
    /// Span of the statement that last assigned the value.
    pub key: Span,
}

/// A named entry of a map.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub primary: Option<Primary>,
    pub map: Option<Map>,
    pub references: Vec<FieldReference>,
}

impl Field {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            primary: None,
            map: None,
            references: Vec::new(),
        }
    }

    pub fn primary(&self) -> Option<&Primary> {
        self.primary.as_ref()
    }

    pub fn map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    /// Span of this field's segment in its first occurrence.
    pub fn first_key_span(&self) -> Span {
        self.references
            .first()
            .map(|reference| reference.segment_span)
            .unwrap_or_default()
    }

    /// Span of this field's segment in its last occurrence.
    pub fn last_key_span(&self) -> Span {
        self.references
            .last()
            .map(|reference| reference.segment_span)
            .unwrap_or_default()
    }
}

/// One occurrence of a field in a key path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldReference {
    /// The whole key path, formatted, e.g. `a.b`.
    pub key_path: String,
    pub key_path_span: Span,
    /// Span of this field's own segment.
    pub segment_span: Span,
    /// Position of this field's segment within the key path.
    pub key_path_index: usize,
    /// Span of the statement.
    pub map_key: Span,
    /// Index of the edge in its chain when the key is an edge endpoint.
    pub edge_index: Option<usize>,
    /// Span of the map the statement was written in.
    pub scope: Span,
    /// Absolute path of the object owning `scope`.
    pub scope_path: Vec<String>,
}

/// Endpoints, direction and index of an edge, relative to its map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeId {
    pub src_path: Vec<String>,
    pub src_arrow: bool,
    pub dst_path: Vec<String>,
    pub dst_arrow: bool,
    pub index: usize,
}

impl EdgeId {
    /// Whether two ids name the same endpoints and arrows, ignoring index.
    pub fn same_connection(&self, other: &EdgeId) -> bool {
        self.src_path == other.src_path
            && self.dst_path == other.dst_path
            && self.src_arrow == other.src_arrow
            && self.dst_arrow == other.dst_arrow
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arrow = match (self.src_arrow, self.dst_arrow) {
            (true, true) => "<->",
            (false, true) => "->",
            (true, false) => "<-",
            (false, false) => "--",
        };
        write!(
            f,
            "({} {} {})[{}]",
            format_path(&self.src_path),
            arrow,
            format_path(&self.dst_path),
            self.index
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub primary: Option<Primary>,
    pub map: Option<Map>,
    pub references: Vec<EdgeReference>,
}

impl Edge {
    pub fn primary(&self) -> Option<&Primary> {
        self.primary.as_ref()
    }

    pub fn map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    /// Span of the first occurrence of this edge.
    pub fn first_span(&self) -> Span {
        self.references
            .first()
            .map(|reference| reference.edge)
            .unwrap_or_default()
    }
}

/// One occurrence of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeReference {
    pub edge: Span,
    pub map_key: Span,
    pub edge_index: usize,
    pub scope: Span,
    pub scope_path: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_map_creates_intermediate_fields() {
        let mut map = Map::default();
        map.ensure_map(&["a", "b"]).ensure_field("c");

        let a = map.field("a").unwrap();
        let b = a.map().unwrap().field("b").unwrap();
        assert!(b.map().unwrap().field("c").is_some());
    }

    #[test]
    fn test_copy_root_drops_boards() {
        let mut map = Map::default();
        map.ensure_field("x");
        map.ensure_field("layers");
        map.ensure_field("Steps");

        let copy = map.copy_root();
        let names: Vec<_> = copy.fields().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn test_edge_id_display() {
        let id = EdgeId {
            src_path: vec!["a".to_string()],
            src_arrow: false,
            dst_path: vec!["b".to_string(), "c".to_string()],
            dst_arrow: true,
            index: 2,
        };
        assert_eq!(id.to_string(), "(a -> b.c)[2]");
    }
}

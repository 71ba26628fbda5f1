//! The typed diagram graph.
//!
//! A [`Graph`] is an arena of [`Object`]s addressed by [`ObjectId`], with the
//! board root at index 0, plus the board's [`Edge`]s and nested boards.
//! Graphs are assembled through a [`GraphBuilder`] and become read-only once
//! frozen.
//!
//! # Example
//!
//! ```
//! use d2_core::graph::{GraphBuilder, ObjectId};
//!
//! let mut builder = GraphBuilder::new(None);
//! let a = builder.ensure_child(ObjectId::ROOT, "a");
//! builder.ensure_child(a, "b");
//!
//! let graph = builder.freeze();
//! let b = graph.find(&["a", "b"]).unwrap();
//! assert_eq!(graph.abs_id(b), "a.b");
//! ```

mod builder;
mod edge;
mod object;
mod reference;

use serde::Serialize;

pub use builder::{ConnectError, GraphBuilder};
pub use edge::{ArrowEnd, Edge};
pub use object::Object;
pub use reference::{EdgeReference, Reference};

use crate::{keyword::BoardKind, path::format_path};

/// Index of an object within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectId(usize);

impl ObjectId {
    /// The board root.
    pub const ROOT: ObjectId = ObjectId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A compiled board: its objects, edges and nested boards.
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    name: Option<String>,
    objects: Vec<Object>,
    edges: Vec<Edge>,
    layers: Vec<Graph>,
    scenarios: Vec<Graph>,
    steps: Vec<Graph>,
}

impl Graph {
    /// The board name; `None` for the top-level board.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn root(&self) -> &Object {
        &self.objects[ObjectId::ROOT.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    /// All objects except the root, in creation order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> + '_ {
        self.objects.iter().skip(1)
    }

    /// Ids of all objects except the root, in creation order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> {
        (1..self.objects.len()).map(ObjectId)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Resolve an absolute path from the board root.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<ObjectId> {
        find_in(&self.objects, ObjectId::ROOT, path)
    }

    pub fn abs_id(&self, id: ObjectId) -> String {
        self.object(id).abs_id()
    }

    /// The edge id in source form, e.g. `(a -> b)[0]`.
    pub fn edge_abs_id(&self, edge: &Edge) -> String {
        edge_abs_id(&self.objects, edge)
    }

    pub fn boards(&self, kind: BoardKind) -> &[Graph] {
        match kind {
            BoardKind::Layers => &self.layers,
            BoardKind::Scenarios => &self.scenarios,
            BoardKind::Steps => &self.steps,
        }
    }

    pub fn layers(&self) -> &[Graph] {
        &self.layers
    }

    pub fn scenarios(&self) -> &[Graph] {
        &self.scenarios
    }

    pub fn steps(&self) -> &[Graph] {
        &self.steps
    }
}

fn find_in<S: AsRef<str>>(objects: &[Object], from: ObjectId, path: &[S]) -> Option<ObjectId> {
    path.iter().try_fold(from, |current, segment| {
        objects[current.0].child(segment.as_ref())
    })
}

fn edge_abs_id(objects: &[Object], edge: &Edge) -> String {
    format!(
        "({} {} {})[{}]",
        format_path(&objects[edge.src.0].path),
        edge.arrow(),
        format_path(&objects[edge.dst.0].path),
        edge.index
    )
}

use log::debug;
use thiserror::Error;

use crate::{
    attributes::Attributes,
    graph::{Edge, Graph, Object, ObjectId, edge_abs_id, find_in},
    keyword::BoardKind,
    specialization::Specialization,
};

/// Reasons an edge endpoint cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("parent \"_\" can only be used in the beginning of paths, e.g. \"_.x\"")]
    MisplacedUnderscore,

    #[error("parent \"_\" cannot be used in the root scope")]
    UnderscoreAtRoot,

    #[error("an edge cannot connect to the board itself")]
    BoardEndpoint,

    #[error("cannot connect \"{ancestor}\" to its own descendant \"{descendant}\"")]
    Ancestor { ancestor: String, descendant: String },
}

/// Mutable assembly of a [`Graph`].
///
/// Objects are only ever appended. Specializing an object detaches its
/// subtree, and [`GraphBuilder::freeze`] compacts the arena so the frozen
/// graph holds live objects only.
#[derive(Debug)]
pub struct GraphBuilder {
    name: Option<String>,
    objects: Vec<Object>,
    removed: Vec<bool>,
    edges: Vec<Edge>,
    layers: Vec<Graph>,
    scenarios: Vec<Graph>,
    steps: Vec<Graph>,
}

impl GraphBuilder {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            objects: vec![Object::root()],
            removed: vec![false],
            edges: Vec::new(),
            layers: Vec::new(),
            scenarios: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this builder.
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.0]
    }

    /// Ids of live objects except the root, in creation order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        (1..self.objects.len())
            .filter(|index| !self.removed[*index])
            .map(ObjectId)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    pub fn edge_mut(&mut self, index: usize) -> &mut Edge {
        &mut self.edges[index]
    }

    pub fn edge_abs_id(&self, edge: &Edge) -> String {
        edge_abs_id(&self.objects, edge)
    }

    /// Resolve `path` relative to `from`.
    pub fn find<S: AsRef<str>>(&self, from: ObjectId, path: &[S]) -> Option<ObjectId> {
        find_in(&self.objects, from, path)
    }

    /// Find the child of `parent` named `id`, creating it if needed.
    pub fn ensure_child(&mut self, parent: ObjectId, id: &str) -> ObjectId {
        if let Some(child) = self.objects[parent.0].child(id) {
            return child;
        }
        let child = ObjectId(self.objects.len());
        let object = Object::child_of(&self.objects[parent.0], parent, id);
        self.objects.push(object);
        self.removed.push(false);
        self.objects[parent.0].children.insert(id.to_string(), child);
        child
    }

    /// Connect two key paths declared in the map of `scope`.
    ///
    /// Leading `_` segments walk up from `scope`. Missing endpoints are
    /// created. A path that reaches a specialized object ends there, so an
    /// edge to a table column connects to the table. Returns the index of
    /// the new edge.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectError`] when an endpoint cannot be resolved or
    /// when one endpoint contains the other.
    pub fn connect<S: AsRef<str>>(
        &mut self,
        scope: ObjectId,
        src: &[S],
        dst: &[S],
        src_arrow: bool,
        dst_arrow: bool,
    ) -> Result<usize, ConnectError> {
        let src = self.resolve_endpoint(scope, src)?;
        let dst = self.resolve_endpoint(scope, dst)?;

        if src != dst {
            if let Some((ancestor, descendant)) = self.containment(src, dst) {
                return Err(ConnectError::Ancestor {
                    ancestor: self.objects[ancestor.0].abs_id(),
                    descendant: self.objects[descendant.0].abs_id(),
                });
            }
        }

        let index = self.count_parallel(src, dst, src_arrow, dst_arrow, self.edges.len());
        self.edges.push(Edge {
            index,
            src,
            dst,
            src_arrow,
            dst_arrow,
            attributes: Attributes::default(),
            src_arrowhead: None,
            dst_arrowhead: None,
            references: Vec::new(),
        });
        Ok(self.edges.len() - 1)
    }

    /// Give `id` a structured form and detach its subtree.
    ///
    /// Edges that touch a detached object are moved onto `id` and
    /// renumbered. Returns how many edges were moved.
    pub fn specialize(&mut self, id: ObjectId, specialization: Specialization) -> usize {
        let mut pending: Vec<ObjectId> = self.objects[id.0].children().collect();
        while let Some(child) = pending.pop() {
            self.removed[child.0] = true;
            pending.extend(self.objects[child.0].children());
        }
        let object = &mut self.objects[id.0];
        object.children.clear();
        object.specialization = Some(specialization);

        let mut moved = 0;
        for edge in &mut self.edges {
            let mut touched = false;
            if self.removed[edge.src.0] {
                edge.src = id;
                touched = true;
            }
            if self.removed[edge.dst.0] {
                edge.dst = id;
                touched = true;
            }
            moved += usize::from(touched);
        }
        if moved > 0 {
            for position in 0..self.edges.len() {
                let edge = &self.edges[position];
                let index =
                    self.count_parallel(edge.src, edge.dst, edge.src_arrow, edge.dst_arrow, position);
                self.edges[position].index = index;
            }
        }
        moved
    }

    /// Attach a compiled nested board.
    pub fn add_board(&mut self, kind: BoardKind, board: Graph) {
        match kind {
            BoardKind::Layers => self.layers.push(board),
            BoardKind::Scenarios => self.scenarios.push(board),
            BoardKind::Steps => self.steps.push(board),
        }
    }

    /// Compact the arena into a read-only [`Graph`].
    ///
    /// Detached objects are dropped and ids are renumbered in creation
    /// order. Edges that touch a detached object are dropped with them.
    pub fn freeze(self) -> Graph {
        let GraphBuilder {
            name,
            objects,
            removed,
            edges,
            layers,
            scenarios,
            steps,
        } = self;

        let mut remap = vec![None; objects.len()];
        let mut live = Vec::with_capacity(objects.len());
        for (index, object) in objects.into_iter().enumerate() {
            if removed[index] {
                continue;
            }
            remap[index] = Some(ObjectId(live.len()));
            live.push(object);
        }

        for object in &mut live {
            object.parent = object.parent.and_then(|parent| remap[parent.0]);
            object.children = object
                .children
                .iter()
                .filter_map(|(id, child)| Some((id.clone(), remap[child.0]?)))
                .collect();
            for reference in &mut object.references {
                reference.scope_obj = reference.scope_obj.and_then(|scope| remap[scope.0]);
            }
        }

        let edges: Vec<Edge> = edges
            .into_iter()
            .filter_map(|mut edge| {
                edge.src = remap[edge.src.0]?;
                edge.dst = remap[edge.dst.0]?;
                for reference in &mut edge.references {
                    reference.scope_obj = reference.scope_obj.and_then(|scope| remap[scope.0]);
                }
                Some(edge)
            })
            .collect();

        debug!(
            objects = live.len() - 1,
            edges = edges.len(),
            boards = layers.len() + scenarios.len() + steps.len();
            "Froze board graph"
        );

        Graph {
            name,
            objects: live,
            edges,
            layers,
            scenarios,
            steps,
        }
    }

    fn resolve_endpoint<S: AsRef<str>>(
        &mut self,
        scope: ObjectId,
        path: &[S],
    ) -> Result<ObjectId, ConnectError> {
        let mut base = scope;
        let mut rest = path;
        while let Some((first, tail)) = rest.split_first() {
            if first.as_ref() != "_" {
                break;
            }
            base = self.objects[base.0]
                .parent
                .ok_or(ConnectError::UnderscoreAtRoot)?;
            rest = tail;
        }
        if rest.iter().any(|segment| segment.as_ref() == "_") {
            return Err(ConnectError::MisplacedUnderscore);
        }

        let mut current = base;
        for segment in rest {
            if self.objects[current.0].specialization.is_some() {
                break;
            }
            current = self.ensure_child(current, segment.as_ref());
        }

        if current == ObjectId::ROOT {
            return Err(ConnectError::BoardEndpoint);
        }
        Ok(current)
    }

    /// Edges before `end` with the same endpoints and arrows.
    fn count_parallel(
        &self,
        src: ObjectId,
        dst: ObjectId,
        src_arrow: bool,
        dst_arrow: bool,
        end: usize,
    ) -> usize {
        self.edges[..end]
            .iter()
            .filter(|edge| {
                edge.src == src
                    && edge.dst == dst
                    && edge.src_arrow == src_arrow
                    && edge.dst_arrow == dst_arrow
            })
            .count()
    }

    /// If one of `a`, `b` contains the other, returns `(ancestor, descendant)`.
    fn containment(&self, a: ObjectId, b: ObjectId) -> Option<(ObjectId, ObjectId)> {
        if self.is_ancestor(a, b) {
            Some((a, b))
        } else if self.is_ancestor(b, a) {
            Some((b, a))
        } else {
            None
        }
    }

    fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = self.objects[id.0].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.objects[parent.0].parent;
        }
        false
    }
}

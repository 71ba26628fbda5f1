use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    attributes::Attributes,
    graph::{ObjectId, Reference},
    path::format_path,
    specialization::{Class, Specialization, SqlTable},
};

/// A node of the diagram: a shape, container or specialized record.
#[derive(Debug, Clone, Serialize)]
pub struct Object {
    pub(super) id: String,
    pub(super) path: Vec<String>,
    pub(super) parent: Option<ObjectId>,
    pub(super) children: IndexMap<String, ObjectId>,
    pub(super) attributes: Attributes,
    pub(super) references: Vec<Reference>,
    pub(super) specialization: Option<Specialization>,
}

impl Object {
    pub(super) fn root() -> Self {
        Self {
            id: String::new(),
            path: Vec::new(),
            parent: None,
            children: IndexMap::new(),
            attributes: Attributes::default(),
            references: Vec::new(),
            specialization: None,
        }
    }

    pub(super) fn child_of(parent: &Object, parent_id: ObjectId, id: &str) -> Self {
        let mut path = parent.path.clone();
        path.push(id.to_string());
        Self {
            id: id.to_string(),
            path,
            parent: Some(parent_id),
            children: IndexMap::new(),
            attributes: Attributes::labelled(id),
            references: Vec::new(),
            specialization: None,
        }
    }

    /// The identifier of this object within its parent.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The identifiers from the board root down to this object.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The absolute id in source form, e.g. `a.b`.
    pub fn abs_id(&self) -> String {
        format_path(&self.path)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.children.values().copied()
    }

    pub fn child(&self, id: &str) -> Option<ObjectId> {
        self.children.get(id).copied()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn push_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    pub fn specialization(&self) -> Option<&Specialization> {
        self.specialization.as_ref()
    }

    pub fn class(&self) -> Option<&Class> {
        match &self.specialization {
            Some(Specialization::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn sql_table(&self) -> Option<&SqlTable> {
        match &self.specialization {
            Some(Specialization::SqlTable(table)) => Some(table),
            _ => None,
        }
    }
}

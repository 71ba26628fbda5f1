use serde::Serialize;

use crate::{
    attributes::Attributes,
    graph::{EdgeReference, ObjectId},
    keyword::Keyword,
    shape::Arrowhead,
};

/// One end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowEnd {
    Source,
    Target,
}

impl ArrowEnd {
    /// The end configured by an arrowhead keyword.
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::SourceArrowhead => Some(ArrowEnd::Source),
            Keyword::TargetArrowhead => Some(ArrowEnd::Target),
            _ => None,
        }
    }
}

/// A connection between two objects.
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub(super) index: usize,
    pub(super) src: ObjectId,
    pub(super) dst: ObjectId,
    pub(super) src_arrow: bool,
    pub(super) dst_arrow: bool,
    pub(super) attributes: Attributes,
    pub(super) src_arrowhead: Option<Attributes>,
    pub(super) dst_arrowhead: Option<Attributes>,
    pub(super) references: Vec<EdgeReference>,
}

impl Edge {
    /// Position among edges with the same endpoints and arrows.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn src(&self) -> ObjectId {
        self.src
    }

    pub fn dst(&self) -> ObjectId {
        self.dst
    }

    pub fn src_arrow(&self) -> bool {
        self.src_arrow
    }

    pub fn dst_arrow(&self) -> bool {
        self.dst_arrow
    }

    /// The connection operator as written, e.g. `->`.
    pub fn arrow(&self) -> &'static str {
        match (self.src_arrow, self.dst_arrow) {
            (true, true) => "<->",
            (false, true) => "->",
            (true, false) => "<-",
            (false, false) => "--",
        }
    }

    pub fn connects(&self, object: ObjectId) -> bool {
        self.src == object || self.dst == object
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// The attributes of an arrowhead, if the edge configures one.
    pub fn arrowhead(&self, end: ArrowEnd) -> Option<&Attributes> {
        match end {
            ArrowEnd::Source => self.src_arrowhead.as_ref(),
            ArrowEnd::Target => self.dst_arrowhead.as_ref(),
        }
    }

    pub fn set_arrowhead(&mut self, end: ArrowEnd, attributes: Attributes) {
        match end {
            ArrowEnd::Source => self.src_arrowhead = Some(attributes),
            ArrowEnd::Target => self.dst_arrowhead = Some(attributes),
        }
    }

    /// The marker drawn at `end`: the configured shape, or a triangle.
    pub fn arrowhead_kind(&self, end: ArrowEnd) -> Arrowhead {
        self.arrowhead(end)
            .filter(|attrs| attrs.shape.map_key.is_some())
            .and_then(|attrs| attrs.shape.value.arrowhead())
            .unwrap_or_default()
    }

    pub fn references(&self) -> &[EdgeReference] {
        &self.references
    }

    pub fn push_reference(&mut self, reference: EdgeReference) {
        self.references.push(reference);
    }
}

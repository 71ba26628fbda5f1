//! IR to graph: objects, edges and their attributes.
//!
//! Fields of a map are compiled in declaration order, except `shape`, which
//! goes first so every other field sees the final shape. Edges follow the
//! fields, and an object whose shape is `class` or `sql_table` is
//! specialized once its whole map has been compiled. Edges that name a
//! member of a specialized object connect to the object itself.

use d2_core::{
    attributes::Attributes,
    graph::{ArrowEnd, EdgeReference, GraphBuilder, ObjectId, Reference},
    keyword::{BoardKind, Keyword, StyleKeyword},
};
use log::trace;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    ir, reserved, specialize, style,
};

/// Compiles the IR of one board into a [`GraphBuilder`].
pub(crate) struct Compiler {
    graph: GraphBuilder,
    /// Absolute IR path of the board, used to resolve reference scopes.
    board_path: Vec<String>,
    diagnostics: DiagnosticCollector,
}

impl Compiler {
    pub(crate) fn new(name: Option<String>, board_path: Vec<String>) -> Self {
        Self {
            graph: GraphBuilder::new(name),
            board_path,
            diagnostics: DiagnosticCollector::new(),
        }
    }

    pub(crate) fn finish(self) -> (GraphBuilder, DiagnosticCollector) {
        (self.graph, self.diagnostics)
    }

    pub(crate) fn compile_map(&mut self, object: ObjectId, map: &ir::Map) {
        if let Some(shape) = map.field(Keyword::Shape.as_str()) {
            self.compile_field(object, shape);
        }
        for field in map.fields().filter(|field| field.name != Keyword::Shape.as_str()) {
            self.compile_field(object, field);
        }
        for edge in &map.edges {
            self.compile_edge(object, edge);
        }
        if object != ObjectId::ROOT {
            specialize::specialize(&mut self.graph, object);
        }
    }

    fn compile_field(&mut self, parent: ObjectId, field: &ir::Field) {
        trace!(object:% = self.graph.object(parent).abs_id(), field = field.name.as_str(); "Compiling field");
        match Keyword::parse(&field.name) {
            Some(keyword) if keyword.is_simple() => {
                let attributes = self.graph.object_mut(parent).attributes_mut();
                reserved::compile_reserved(attributes, keyword, field, &mut self.diagnostics);
            }
            Some(Keyword::Style) => {
                let attributes = self.graph.object_mut(parent).attributes_mut();
                style::compile_style(attributes, field, &mut self.diagnostics);
                if let Some(map_key) = attributes.style.map_key(StyleKeyword::Animated) {
                    self.diagnostics.emit(
                        Diagnostic::error(r#"key "animated" can only be applied to edges"#)
                            .with_code(ErrorCode::E300)
                            .with_label(map_key, "not an edge"),
                    );
                }
            }
            Some(keyword) => {
                self.diagnostics.emit(
                    Diagnostic::error(format!(r#""{keyword}" can only be used on edges"#))
                        .with_code(ErrorCode::E213)
                        .with_label(field.last_key_span(), "edge-only keyword"),
                );
            }
            None if field.name.parse::<BoardKind>().is_ok() => {
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        r#""{}" can only be declared at the root of a board"#,
                        field.name
                    ))
                    .with_code(ErrorCode::E211)
                    .with_label(field.first_key_span(), "nested board keyword"),
                );
            }
            None => self.compile_object(parent, field),
        }
    }

    fn compile_object(&mut self, parent: ObjectId, field: &ir::Field) {
        let child = self.graph.ensure_child(parent, &field.name);
        if let Some(primary) = field.primary() {
            reserved::compile_label(self.graph.object_mut(child).attributes_mut(), primary);
        }
        if let Some(map) = field.map() {
            self.compile_map(child, map);
        }

        for reference in &field.references {
            let scope_obj = self.scope_object(&reference.scope_path);
            self.graph.object_mut(child).push_reference(Reference {
                key: reference.key_path.clone(),
                key_span: reference.key_path_span,
                key_path_index: reference.key_path_index,
                map_key: reference.map_key,
                map_key_edge_index: reference.edge_index,
                scope: reference.scope,
                scope_obj,
            });
        }
    }

    fn compile_edge(&mut self, scope: ObjectId, edge: &ir::Edge) {
        let id = &edge.id;
        let index = match self
            .graph
            .connect(scope, &id.src_path, &id.dst_path, id.src_arrow, id.dst_arrow)
        {
            Ok(index) => index,
            Err(err) => {
                self.diagnostics.emit(
                    Diagnostic::error(err.to_string())
                        .with_code(ErrorCode::E212)
                        .with_label(edge.first_span(), "invalid connection"),
                );
                return;
            }
        };
        trace!(edge:% = self.graph.edge_abs_id(self.graph.edge(index)); "Connected edge");

        if let Some(primary) = edge.primary() {
            reserved::compile_label(self.graph.edge_mut(index).attributes_mut(), primary);
        }
        if let Some(map) = edge.map() {
            for field in map.fields() {
                self.compile_edge_field(index, field);
            }
            for nested in &map.edges {
                self.diagnostics.emit(
                    Diagnostic::error("edge map keys must be reserved keywords")
                        .with_code(ErrorCode::E209)
                        .with_label(nested.first_span(), "not a reserved keyword"),
                );
            }
        }

        for reference in &edge.references {
            let scope_obj = self.scope_object(&reference.scope_path);
            self.graph.edge_mut(index).push_reference(EdgeReference {
                edge: reference.edge,
                map_key: reference.map_key,
                map_key_edge_index: Some(reference.edge_index),
                scope: reference.scope,
                scope_obj,
            });
        }
    }

    fn compile_edge_field(&mut self, index: usize, field: &ir::Field) {
        match Keyword::parse(&field.name) {
            Some(keyword) if keyword.is_simple() => {
                let attributes = self.graph.edge_mut(index).attributes_mut();
                reserved::compile_reserved(attributes, keyword, field, &mut self.diagnostics);
            }
            Some(Keyword::Style) => {
                let attributes = self.graph.edge_mut(index).attributes_mut();
                style::compile_style(attributes, field, &mut self.diagnostics);
            }
            Some(keyword) => {
                if let Some(end) = ArrowEnd::from_keyword(keyword) {
                    let attributes = self.compile_arrowhead(field);
                    self.graph.edge_mut(index).set_arrowhead(end, attributes);
                }
            }
            None => {
                self.diagnostics.emit(
                    Diagnostic::error("edge map keys must be reserved keywords")
                        .with_code(ErrorCode::E209)
                        .with_label(field.first_key_span(), "not a reserved keyword"),
                );
            }
        }
    }

    fn compile_arrowhead(&mut self, field: &ir::Field) -> Attributes {
        let mut attributes = Attributes::default();
        if let Some(primary) = field.primary() {
            reserved::compile_label(&mut attributes, primary);
        }
        for property in field.map().into_iter().flat_map(ir::Map::fields) {
            match Keyword::parse(&property.name) {
                Some(keyword) if keyword.is_simple() => {
                    reserved::compile_reserved(&mut attributes, keyword, property, &mut self.diagnostics);
                }
                Some(Keyword::Style) => {
                    style::compile_style(&mut attributes, property, &mut self.diagnostics);
                }
                _ => {
                    self.diagnostics.emit(
                        Diagnostic::error(
                            "source-arrowhead/target-arrowhead map keys must be reserved keywords",
                        )
                        .with_code(ErrorCode::E210)
                        .with_label(property.last_key_span(), "not a reserved keyword"),
                    );
                }
            }
        }
        attributes
    }

    /// The object owning a reference's scope, if it is part of this board.
    fn scope_object(&self, scope_path: &[String]) -> Option<ObjectId> {
        let relative = scope_path.strip_prefix(self.board_path.as_slice())?;
        self.graph.find(ObjectId::ROOT, relative)
    }
}

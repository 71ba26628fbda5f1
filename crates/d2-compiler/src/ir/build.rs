//! Syntax tree to IR.

use d2_core::{keyword::BoardKind, span::Span};
use log::trace;

use super::{Edge, EdgeId, EdgeReference, Field, FieldReference, Map, Primary};
use crate::{
    ast,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
};

/// The statement being applied and the map it was written in.
struct Context<'a> {
    map_key: Span,
    scope: Span,
    scope_path: &'a [String],
}

struct Builder {
    root: Map,
    diagnostics: DiagnosticCollector,
}

/// Build the IR of a parsed file.
///
/// Returns the merged root map with every diagnostic found on the way.
/// Malformed statements are skipped, so the map is always usable.
pub fn build(ast: &ast::Map) -> (Map, Vec<Diagnostic>) {
    let mut builder = Builder {
        root: Map::default(),
        diagnostics: DiagnosticCollector::new(),
    };
    builder.apply_map(ast, &[]);
    check_boards(&builder.root, &mut builder.diagnostics);
    (builder.root, builder.diagnostics.into_diagnostics())
}

impl Builder {
    fn apply_map(&mut self, ast: &ast::Map, scope_path: &[String]) {
        for key in ast.keys() {
            let ctx = Context {
                map_key: key.span,
                scope: ast.span,
                scope_path,
            };
            if let Some(path) = &key.key {
                self.apply_field(key, path, &ctx);
            } else if let Some(index) = &key.edge_index {
                self.apply_indexed_edge(key, *index.inner(), index.span(), &ctx);
            } else {
                self.apply_edges(key, &ctx);
            }
        }
    }

    /// Resolve the leading `_` segments of a field key against the scope.
    ///
    /// Returns the absolute prefix and the number of segments consumed.
    fn resolve_parents(&mut self, path: &ast::KeyPath, scope_path: &[String]) -> Option<(Vec<String>, usize)> {
        let leading = path
            .segments
            .iter()
            .take_while(|segment| segment.inner() == "_")
            .count();
        if let Some(misplaced) = path.segments[leading..].iter().find(|segment| segment.inner() == "_") {
            self.diagnostics.emit(
                Diagnostic::error(r#"parent "_" can only be used in the beginning of paths, e.g. "_.x""#)
                    .with_code(ErrorCode::E100)
                    .with_label(misplaced.span(), "misplaced parent reference"),
            );
            return None;
        }
        if leading == path.segments.len() || leading > scope_path.len() {
            self.diagnostics.emit(
                Diagnostic::error(r#"invalid use of parent "_""#)
                    .with_code(ErrorCode::E100)
                    .with_label(path.span, "parent reference leaves the board")
                    .with_help(r#"use "_" to reach a key of the enclosing map, e.g. "_.x""#),
            );
            return None;
        }
        Some((scope_path[..scope_path.len() - leading].to_vec(), leading))
    }

    fn apply_field(&mut self, key: &ast::Key, path: &ast::KeyPath, ctx: &Context<'_>) {
        let Some((mut abs, consumed)) = self.resolve_parents(path, ctx.scope_path) else {
            return;
        };
        for (index, segment) in path.segments.iter().enumerate().skip(consumed) {
            abs.push(segment.inner().clone());
            if let Some(field) = field_at(&mut self.root, &abs) {
                field.references.push(field_reference(path, index, ctx, None));
            }
        }

        let Some(field) = field_at(&mut self.root, &abs) else {
            return;
        };
        if let Some(value) = &key.primary {
            field.primary = Some(Primary {
                value: value.clone(),
                key: key.span,
            });
        }
        if let Some(map) = &key.map {
            field.map.get_or_insert_with(Map::default);
            self.apply_map(map, &abs);
        }
    }

    fn apply_edges(&mut self, key: &ast::Key, ctx: &Context<'_>) {
        for (edge_index, edge) in key.edges.iter().enumerate() {
            let src = edge.src.ids();
            let dst = edge.dst.ids();
            let has_parent = src.iter().chain(&dst).any(|segment| segment == "_");

            if !has_parent {
                self.ensure_endpoint(&edge.src, edge_index, ctx);
                self.ensure_endpoint(&edge.dst, edge_index, ctx);
            }

            // Edges referencing `_` stay where they were written; the graph
            // resolves the parent references.
            let prefix = if has_parent { 0 } else { common_prefix(&src, &dst) };
            let mut container = ctx.scope_path.to_vec();
            container.extend_from_slice(&src[..prefix]);

            let map = self.root.ensure_map(&container);
            let mut id = EdgeId {
                src_path: src[prefix..].to_vec(),
                src_arrow: edge.src_arrow,
                dst_path: dst[prefix..].to_vec(),
                dst_arrow: edge.dst_arrow,
                index: 0,
            };
            id.index = map.edges.iter().filter(|e| e.id.same_connection(&id)).count();
            trace!(edge:% = id; "Declared edge");

            let mut declared = Edge {
                id,
                primary: key.primary.as_ref().map(|value| Primary {
                    value: value.clone(),
                    key: key.span,
                }),
                map: None,
                references: vec![EdgeReference {
                    edge: edge.span,
                    map_key: ctx.map_key,
                    edge_index,
                    scope: ctx.scope,
                    scope_path: ctx.scope_path.to_vec(),
                }],
            };
            if let Some(ast_map) = &key.map {
                let mut edge_map = Map::default();
                merge_relative(&mut edge_map, ast_map, ctx.scope_path);
                declared.map = Some(edge_map);
            }
            map.edges.push(declared);
        }
    }

    /// Create the fields named by an edge endpoint and reference them.
    fn ensure_endpoint(&mut self, path: &ast::KeyPath, edge_index: usize, ctx: &Context<'_>) {
        let mut abs = ctx.scope_path.to_vec();
        for (index, segment) in path.segments.iter().enumerate() {
            abs.push(segment.inner().clone());
            if let Some(field) = field_at(&mut self.root, &abs) {
                field.references.push(field_reference(path, index, ctx, Some(edge_index)));
            }
        }
    }

    /// Apply `(a -> b)[n]...` to an edge declared earlier.
    fn apply_indexed_edge(&mut self, key: &ast::Key, index: usize, index_span: Span, ctx: &Context<'_>) {
        let Some(edge) = key.edges.first() else {
            return;
        };
        let src = edge.src.ids();
        let dst = edge.dst.ids();
        let has_parent = src.iter().chain(&dst).any(|segment| segment == "_");
        let prefix = if has_parent { 0 } else { common_prefix(&src, &dst) };
        let mut container = ctx.scope_path.to_vec();
        container.extend_from_slice(&src[..prefix]);

        let wanted = EdgeId {
            src_path: src[prefix..].to_vec(),
            src_arrow: edge.src_arrow,
            dst_path: dst[prefix..].to_vec(),
            dst_arrow: edge.dst_arrow,
            index,
        };
        let map = self.root.ensure_map(&container);
        let Some(target) = map.edges.iter_mut().find(|e| e.id == wanted) else {
            self.diagnostics.emit(
                Diagnostic::error(format!("edge {wanted} was not declared"))
                    .with_code(ErrorCode::E102)
                    .with_label(edge.span.union(index_span), "unknown edge"),
            );
            return;
        };

        target.references.push(EdgeReference {
            edge: edge.span,
            map_key: ctx.map_key,
            edge_index: 0,
            scope: ctx.scope,
            scope_path: ctx.scope_path.to_vec(),
        });

        let primary = key.primary.as_ref().map(|value| Primary {
            value: value.clone(),
            key: key.span,
        });
        match &key.edge_key {
            Some(edge_key) => {
                let edge_map = target.map.get_or_insert_with(Map::default);
                let Some(field) = ensure_relative(edge_map, edge_key, ctx) else {
                    return;
                };
                if primary.is_some() {
                    field.primary = primary;
                }
                if let Some(ast_map) = &key.map {
                    merge_relative(field.map.get_or_insert_with(Map::default), ast_map, ctx.scope_path);
                }
            }
            None => {
                if primary.is_some() {
                    target.primary = primary;
                }
                if let Some(ast_map) = &key.map {
                    merge_relative(target.map.get_or_insert_with(Map::default), ast_map, ctx.scope_path);
                }
            }
        }
    }
}

/// Number of leading segments shared by both endpoints, leaving at least
/// one segment on each side.
fn common_prefix(src: &[String], dst: &[String]) -> usize {
    let limit = src.len().min(dst.len()).saturating_sub(1);
    src.iter()
        .zip(dst)
        .take(limit)
        .take_while(|(a, b)| a == b)
        .count()
}

/// Walk `path` from `map`, creating fields and maps along the way.
fn field_at<'m>(map: &'m mut Map, path: &[String]) -> Option<&'m mut Field> {
    let (last, parents) = path.split_last()?;
    Some(map.ensure_map(parents).ensure_field(last))
}

fn field_reference(path: &ast::KeyPath, index: usize, ctx: &Context<'_>, edge_index: Option<usize>) -> FieldReference {
    FieldReference {
        key_path: path.to_string(),
        key_path_span: path.span,
        segment_span: path.segments[index].span(),
        key_path_index: index,
        map_key: ctx.map_key,
        edge_index,
        scope: ctx.scope,
        scope_path: ctx.scope_path.to_vec(),
    }
}

/// Walk a key path relative to `map`, referencing every segment.
fn ensure_relative<'m>(map: &'m mut Map, path: &ast::KeyPath, ctx: &Context<'_>) -> Option<&'m mut Field> {
    let (last, parents) = path.segments.split_last()?;
    let mut current = map;
    for (index, segment) in parents.iter().enumerate() {
        let field = current.ensure_field(segment.inner());
        field.references.push(field_reference(path, index, ctx, None));
        current = field.map.get_or_insert_with(Map::default);
    }
    let field = current.ensure_field(last.inner());
    field.references.push(field_reference(path, parents.len(), ctx, None));
    Some(field)
}

/// Merge an edge's map. Keys are relative and `_` has no meaning here.
fn merge_relative(target: &mut Map, ast: &ast::Map, scope_path: &[String]) {
    for key in ast.keys() {
        let ctx = Context {
            map_key: key.span,
            scope: ast.span,
            scope_path,
        };
        if let Some(path) = &key.key {
            let Some(field) = ensure_relative(target, path, &ctx) else {
                continue;
            };
            if let Some(value) = &key.primary {
                field.primary = Some(Primary {
                    value: value.clone(),
                    key: key.span,
                });
            }
            if let Some(map) = &key.map {
                merge_relative(field.map.get_or_insert_with(Map::default), map, scope_path);
            }
        } else {
            for (edge_index, edge) in key.edges.iter().enumerate() {
                target.edges.push(Edge {
                    id: EdgeId {
                        src_path: edge.src.ids(),
                        src_arrow: edge.src_arrow,
                        dst_path: edge.dst.ids(),
                        dst_arrow: edge.dst_arrow,
                        index: 0,
                    },
                    primary: None,
                    map: None,
                    references: vec![EdgeReference {
                        edge: edge.span,
                        map_key: key.span,
                        edge_index,
                        scope: ast.span,
                        scope_path: scope_path.to_vec(),
                    }],
                });
            }
        }
    }
}

/// Report board keywords given a value instead of a map of boards.
fn check_boards(map: &Map, diagnostics: &mut DiagnosticCollector) {
    for field in map.fields() {
        let Ok(kind) = field.name.parse::<BoardKind>() else {
            continue;
        };
        if let Some(primary) = field.primary() {
            diagnostics.emit(
                Diagnostic::error(format!(r#""{kind}" must be a map of boards"#))
                    .with_code(ErrorCode::E101)
                    .with_label(primary.value.span, "expected a map"),
            );
        }
        for board in field.map().into_iter().flat_map(Map::fields) {
            if let Some(content) = board.map() {
                check_boards(content, diagnostics);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn build_source(source: &str) -> (Map, Vec<Diagnostic>) {
        let ast = parser::parse(source).expect("source should parse");
        build(&ast)
    }

    fn path<'m>(map: &'m Map, names: &[&str]) -> &'m Field {
        let (last, parents) = names.split_last().unwrap();
        let mut current = map;
        for name in parents {
            current = current.field(name).unwrap().map().unwrap();
        }
        current.field(last).unwrap()
    }

    #[test]
    fn test_dotted_keys_nest() {
        let (map, diagnostics) = build_source("a.b.c: hi");
        assert!(diagnostics.is_empty());
        let c = path(&map, &["a", "b", "c"]);
        assert_eq!(c.primary().unwrap().value.scalar_string(), "hi");
        assert_eq!(c.references[0].key_path_index, 2);
    }

    #[test]
    fn test_later_primary_wins_and_maps_merge() {
        let (map, _) = build_source("a: one\na: { x }\na: two\na: { y }");
        let a = map.field("a").unwrap();
        assert_eq!(a.primary().unwrap().value.scalar_string(), "two");
        let names: Vec<_> = a.map().unwrap().fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(a.references.len(), 4);
    }

    #[test]
    fn test_edge_stored_at_common_prefix() {
        let (map, _) = build_source("x.a -> x.b");
        assert!(map.edges.is_empty());
        let x = map.field("x").unwrap().map().unwrap();
        assert_eq!(x.edges.len(), 1);
        assert_eq!(x.edges[0].id.src_path, vec!["a"]);
        assert_eq!(x.edges[0].id.dst_path, vec!["b"]);
    }

    #[test]
    fn test_edge_to_descendant_stays_in_scope() {
        let (map, _) = build_source("x -> x.y");
        assert_eq!(map.edges.len(), 1);
        assert_eq!(map.edges[0].id.dst_path, vec!["x", "y"]);
    }

    #[test]
    fn test_edge_chain_shares_value() {
        let (map, _) = build_source("a -> b -> c: hi");
        assert_eq!(map.edges.len(), 2);
        for edge in &map.edges {
            assert_eq!(edge.primary().unwrap().value.scalar_string(), "hi");
        }
        assert_eq!(map.edges[1].references[0].edge_index, 1);
    }

    #[test]
    fn test_repeated_edges_are_indexed() {
        let (map, _) = build_source("a -> b\na -> b\nb -> a");
        let indexes: Vec<_> = map.edges.iter().map(|e| e.id.index).collect();
        assert_eq!(indexes, vec![0, 1, 0]);
    }

    #[test]
    fn test_indexed_edge_updates_existing() {
        let (map, diagnostics) = build_source("a -> b\n(a -> b)[0].style.stroke: red");
        assert!(diagnostics.is_empty());
        let edge_map = map.edges[0].map().unwrap();
        let stroke = path(edge_map, &["style", "stroke"]);
        assert_eq!(stroke.primary().unwrap().value.scalar_string(), "red");
        assert_eq!(map.edges[0].references.len(), 2);
    }

    #[test]
    fn test_unknown_indexed_edge_reports() {
        let (_, diagnostics) = build_source("a -> b\n(a -> b)[3]: hi");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E102));
        assert_eq!(diagnostics[0].message(), "edge (a -> b)[3] was not declared");
    }

    #[test]
    fn test_parent_reference_in_field_key() {
        let (map, diagnostics) = build_source("a: {\n  _.b: hi\n}");
        assert!(diagnostics.is_empty());
        assert_eq!(map.field("b").unwrap().primary().unwrap().value.scalar_string(), "hi");
    }

    #[test]
    fn test_parent_reference_errors() {
        let (_, diagnostics) = build_source("_.x\na._.b");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.code() == Some(ErrorCode::E100)));
    }

    #[test]
    fn test_edge_with_parent_keeps_raw_paths() {
        let (map, _) = build_source("a: {\n  b -> _.c\n}");
        let a = map.field("a").unwrap().map().unwrap();
        assert_eq!(a.edges[0].id.dst_path, vec!["_", "c"]);
        assert!(a.field("b").is_none());
    }

    #[test]
    fn test_board_keyword_with_value_reports() {
        let (_, diagnostics) = build_source("layers: x");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_endpoint_references_record_chain_position() {
        let (map, _) = build_source("a -> b -> c");
        let b = map.field("b").unwrap();
        let positions: Vec<_> = b.references.iter().map(|r| r.edge_index).collect();
        assert_eq!(positions, vec![Some(0), Some(1)]);
    }
}

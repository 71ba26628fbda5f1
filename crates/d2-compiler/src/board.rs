//! Boards: the root diagram and its nested `layers`, `scenarios` and `steps`.

use d2_core::{
    graph::{Graph, ObjectId},
    keyword::BoardKind,
};
use log::{debug, info};

use crate::{compile::Compiler, error::Diagnostic, ir, validate};

/// Compile one board and, recursively, every board nested in it.
///
/// `board_path` is the absolute IR path of the board's map. Each board is
/// compiled on its own: nested boards never see their parent's objects.
/// Returns the graph with this board's diagnostics first, then those of
/// nested boards in declaration order.
pub(crate) fn compile_board(map: &ir::Map, name: Option<String>, board_path: Vec<String>) -> (Graph, Vec<Diagnostic>) {
    let mut compiler = Compiler::new(name.clone(), board_path.clone());
    compiler.compile_map(ObjectId::ROOT, &map.copy_root());
    let (mut builder, mut diagnostics) = compiler.finish();

    let mut nested = Vec::new();
    for kind in BoardKind::ALL {
        for field in map.board_fields(kind) {
            for board in field.map().into_iter().flat_map(ir::Map::fields) {
                let Some(content) = board.map() else {
                    continue;
                };
                let mut path = board_path.clone();
                path.extend([field.name.clone(), board.name.clone()]);
                let (graph, board_diagnostics) = compile_board(content, Some(board.name.clone()), path);
                info!(kind:% = kind, board = board.name.as_str(); "Compiled board");
                builder.add_board(kind, graph);
                nested.extend(board_diagnostics);
            }
        }
    }

    let graph = builder.freeze();
    if !diagnostics.has_errors() {
        validate::validate_keys(&graph, &mut diagnostics);
    }
    validate::validate_near(&graph, &mut diagnostics);
    debug!(
        board = name.as_deref().unwrap_or("root"),
        layers = graph.layers().len(),
        scenarios = graph.scenarios().len(),
        steps = graph.steps().len();
        "Board compiled",
    );

    diagnostics.extend(nested);
    (graph, diagnostics.into_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn compile(source: &str) -> (Graph, Vec<Diagnostic>) {
        let ast = parser::parse(source).unwrap();
        let (map, diagnostics) = ir::build(&ast);
        assert!(diagnostics.is_empty());
        compile_board(&map, None, Vec::new())
    }

    #[test]
    fn test_nested_boards_are_independent() {
        let (graph, diagnostics) = compile("a\nlayers: {\n  one: { b }\n  two: { c -> d }\n}\nsteps.s1: { e }");
        assert!(diagnostics.is_empty());
        assert_eq!(graph.objects().count(), 1);

        let names: Vec<_> = graph.layers().iter().map(|layer| layer.name()).collect();
        assert_eq!(names, vec![Some("one"), Some("two")]);
        assert!(graph.layers()[0].find(&["a"]).is_none());
        assert_eq!(graph.layers()[1].edges().len(), 1);
        assert_eq!(graph.steps().len(), 1);
        assert!(graph.scenarios().is_empty());
    }

    #[test]
    fn test_validation_skipped_after_errors() {
        let (_, diagnostics) = compile("a.shape: blob\nb.shape: image");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message(), r#"unknown shape "blob""#);
    }

    #[test]
    fn test_nested_board_diagnostics_follow_parent() {
        let (_, diagnostics) = compile("layers.x: {\n  b.shape: blob\n}\na.shape: blob");
        let starts: Vec<_> = diagnostics.iter().map(|d| d.primary_span().unwrap().start()).collect();
        assert_eq!(diagnostics.len(), 2);
        assert!(starts[0] > starts[1]);
    }

    #[test]
    fn test_references_scoped_to_board() {
        let (graph, _) = compile("layers.x: {\n  a: {\n    b\n  }\n}");
        let layer = &graph.layers()[0];
        let b = layer.object(layer.find(&["a", "b"]).unwrap());
        assert_eq!(b.references()[0].scope_obj, layer.find(&["a"]));
    }
}

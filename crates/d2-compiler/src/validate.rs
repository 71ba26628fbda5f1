//! Checks that need the whole board: keyword compatibility and `near`.

use d2_core::{
    graph::{Graph, Object, ObjectId},
    near::NearConstant,
    shape::{Shape, ShapeValue},
};

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode};

/// Check combinations of fields on every object, in object order.
pub(crate) fn validate_keys(graph: &Graph, diagnostics: &mut DiagnosticCollector) {
    for object in graph.objects() {
        validate_object(graph, object, diagnostics);
    }
}

fn validate_object(graph: &Graph, object: &Object, diagnostics: &mut DiagnosticCollector) {
    let attributes = object.attributes();
    let shape = attributes.shape.value;

    if let (ShapeValue::Arrowhead(arrowhead), Some(map_key)) = (shape, attributes.shape.map_key) {
        diagnostics.emit(
            Diagnostic::error(format!(r#"invalid shape, can only set "{arrowhead}" for arrowheads"#))
                .with_code(ErrorCode::E305)
                .with_label(map_key, "arrowhead shape on an object"),
        );
    }

    let sized_container = object.has_children()
        && !matches!(shape.shape(), Some(Shape::Image | Shape::Class | Shape::SqlTable));
    for (name, size) in [("width", &attributes.width), ("height", &attributes.height)] {
        if let Some(size) = size.as_ref().filter(|_| sized_container) {
            diagnostics.emit(
                Diagnostic::error(format!("{name} cannot be used on container: {}", object.abs_id()))
                    .with_code(ErrorCode::E301)
                    .with_label(size.map_key.unwrap_or_default(), "container size is computed"),
            );
        }
    }

    if let (Some(shape), Some(width), Some(height)) =
        (shape.shape(), &attributes.width, &attributes.height)
    {
        if shape.is_equilateral() && width.value != height.value {
            diagnostics.emit(
                Diagnostic::error(format!("width and height must be equal for {shape} shapes"))
                    .with_code(ErrorCode::E302)
                    .with_label(height.map_key.unwrap_or_default(), "differs from width")
                    .with_secondary_label(width.map_key.unwrap_or_default(), "width set here"),
            );
        }
    }

    if shape.is(Shape::Image) {
        if attributes.icon.is_none() {
            diagnostics.emit(
                Diagnostic::error(r#"image shape must include an "icon" field"#)
                    .with_code(ErrorCode::E303)
                    .with_label(attributes.shape.map_key.unwrap_or_default(), "missing icon"),
            );
        }
        for child in object.children() {
            let span = graph
                .object(child)
                .references()
                .last()
                .map(|reference| reference.key_span)
                .unwrap_or_default();
            diagnostics.emit(
                Diagnostic::error("image shapes cannot have children.")
                    .with_code(ErrorCode::E304)
                    .with_label(span, "child of an image"),
            );
        }
    }

    if let Some(three_dee) = &attributes.style.three_dee {
        if !shape.is(Shape::Square) && !shape.is(Shape::Rectangle) {
            diagnostics.emit(
                Diagnostic::error(r#"key "3d" can only be applied to squares and rectangles"#)
                    .with_code(ErrorCode::E306)
                    .with_label(three_dee.map_key, "unsupported shape"),
            );
        }
    }
}

/// Check that every `near` resolves and that constants are placed legally.
pub(crate) fn validate_near(graph: &Graph, diagnostics: &mut DiagnosticCollector) {
    for id in graph.object_ids() {
        let object = graph.object(id);
        let Some(near) = &object.attributes().near_key else {
            continue;
        };
        if graph.find(&near.path).is_some() {
            continue;
        }
        let constant = match near.path.as_slice() {
            [single] => single.parse::<NearConstant>().ok(),
            _ => None,
        };

        let (code, message) = if constant.is_none() {
            (
                ErrorCode::E400,
                format!(
                    "near key {:?} must be the absolute path to a shape or one of the following constants: {}",
                    near.to_string(),
                    NearConstant::names()
                ),
            )
        } else if object.parent() != Some(ObjectId::ROOT) {
            (
                ErrorCode::E401,
                "constant near keys can only be set on root level shapes".to_string(),
            )
        } else if object.has_children() {
            (
                ErrorCode::E402,
                "constant near keys cannot be set on shapes with children".to_string(),
            )
        } else if graph.edges().iter().any(|edge| edge.connects(id)) {
            (
                ErrorCode::E403,
                "constant near keys cannot be set on connected shapes".to_string(),
            )
        } else {
            continue;
        };
        diagnostics.emit(
            Diagnostic::error(message)
                .with_code(code)
                .with_label(near.span, code.description()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile::Compiler, ir, parser};

    fn validate(source: &str) -> Vec<Diagnostic> {
        let ast = parser::parse(source).unwrap();
        let (map, _) = ir::build(&ast);
        let mut compiler = Compiler::new(None, Vec::new());
        compiler.compile_map(ObjectId::ROOT, &map);
        let (graph, mut diagnostics) = compiler.finish();
        assert!(!diagnostics.has_errors());
        let graph = graph.freeze();
        validate_keys(&graph, &mut diagnostics);
        validate_near(&graph, &mut diagnostics);
        diagnostics.into_diagnostics()
    }

    fn codes(source: &str) -> Vec<ErrorCode> {
        validate(source)
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_equal_sides() {
        assert!(codes("a: {shape: circle; width: 5; height: 5}").is_empty());
        assert_eq!(codes("a: {shape: circle; width: 5; height: 7}"), vec![ErrorCode::E302]);
        assert!(codes("a: {shape: oval; width: 5; height: 7}").is_empty());
    }

    #[test]
    fn test_size_on_container() {
        let diagnostics = validate("a: {\n  width: 10\n  b\n}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message(), "width cannot be used on container: a");
        assert!(codes("t: {\n  shape: sql_table\n  width: 10\n  id\n}").is_empty());
    }

    #[test]
    fn test_image_rules() {
        assert_eq!(codes("a.shape: image"), vec![ErrorCode::E303]);
        assert!(codes("a: {shape: image; icon: http://x/y.png}").is_empty());
        assert_eq!(
            codes("a: {shape: image; icon: http://x/y.png; b; c}"),
            vec![ErrorCode::E304, ErrorCode::E304]
        );
    }

    #[test]
    fn test_arrowhead_shape_on_object() {
        let diagnostics = validate("a.shape: cf-many");
        assert_eq!(
            diagnostics[0].message(),
            r#"invalid shape, can only set "cf-many" for arrowheads"#
        );
    }

    #[test]
    fn test_three_dee() {
        assert!(codes("a.style.3d: true").is_empty());
        assert_eq!(codes("a: {shape: circle; style.3d: true}"), vec![ErrorCode::E306]);
    }

    #[test]
    fn test_near_constant_placement() {
        assert!(codes("a.near: top-center").is_empty());
        assert_eq!(codes("a.b.near: top-center"), vec![ErrorCode::E401]);
        assert_eq!(codes("a: {near: top-center; b}"), vec![ErrorCode::E402]);
        assert_eq!(codes("a.near: top-center\na -> b"), vec![ErrorCode::E403]);
    }

    #[test]
    fn test_near_object_path() {
        assert!(codes("x\na.b.near: x").is_empty());
        let diagnostics = validate("a.near: nowhere");
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E400));
        assert!(diagnostics[0].message().starts_with(r#"near key "nowhere" must be the absolute path"#));
    }
}

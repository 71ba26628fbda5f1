//! Simple reserved keywords: fields that set exactly one attribute.

use d2_core::{
    attributes::{Attributes, Direction, Icon, NearKey, Scalar},
    keyword::Keyword,
    language,
    shape::{Shape, ShapeValue},
};
use log::trace;

use crate::{
    ast::ScalarKind,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    ir::{Field, Primary},
    parser,
};

/// Apply a primary value as a label.
///
/// Block strings also set the language, and the shape to `text` for
/// markdown and latex or `code` for anything else.
pub(crate) fn compile_label(attributes: &mut Attributes, primary: &Primary) {
    match &primary.value.kind {
        ScalarKind::Block { tag, value } => {
            let language = language::full_name(tag);
            let shape = if language::is_text(language) {
                Shape::Text
            } else {
                Shape::Code
            };
            attributes.shape.value = ShapeValue::Shape(shape);
            attributes.language = Some(language.to_string());
            attributes.label = Scalar::new(value.clone(), primary.key);
        }
        _ => {
            attributes.label = Scalar::new(primary.value.scalar_string().to_string(), primary.key);
        }
    }
}

/// Apply a simple reserved field to `attributes`.
///
/// Fields for `style` and the arrowheads are compiled elsewhere and are
/// ignored here.
pub(crate) fn compile_reserved(
    attributes: &mut Attributes,
    keyword: Keyword,
    field: &Field,
    diagnostics: &mut DiagnosticCollector,
) {
    let Some(primary) = field.primary() else {
        if field.map().is_some() {
            diagnostics.emit(
                Diagnostic::error(format!("reserved field {} does not accept composite", field.name))
                    .with_code(ErrorCode::E200)
                    .with_label(field.last_key_span(), "expected a scalar value"),
            );
        }
        return;
    };
    let scalar = &primary.value;
    let raw = scalar.scalar_string();
    trace!(keyword:% = keyword, value = raw; "Compiling reserved field");

    let invalid = |code: ErrorCode, message: String| {
        Diagnostic::error(message)
            .with_code(code)
            .with_label(scalar.span, code.description())
    };

    match keyword {
        Keyword::Label => compile_label(attributes, primary),
        Keyword::Shape => match ShapeValue::parse(raw) {
            Some(shape) => {
                attributes.shape = Scalar::new(shape, primary.key);
                if shape.is(Shape::Code) {
                    attributes.language = Some(language::PLAIN_TEXT.to_string());
                }
            }
            None => diagnostics.emit(
                invalid(ErrorCode::E201, format!("unknown shape {raw:?}"))
                    .with_help(format!(
                        "valid shapes: {}",
                        Shape::ALL.map(|shape| shape.as_str()).join(", ")
                    )),
            ),
        },
        Keyword::Icon => match Icon::parse(raw) {
            Ok(icon) => attributes.icon = Some(icon),
            Err(err) => diagnostics.emit(invalid(ErrorCode::E202, format!("bad icon url {raw:?}: {err}"))),
        },
        Keyword::Near => match parser::parse_key(raw) {
            Ok(path) => {
                attributes.near_key = Some(NearKey {
                    path: path.ids(),
                    span: scalar.span,
                });
            }
            Err(err) => diagnostics.emit(invalid(ErrorCode::E203, format!("bad near key {raw:?}: {err}"))),
        },
        Keyword::Tooltip => attributes.tooltip = Some(raw.to_string()),
        Keyword::Link => attributes.link = Some(raw.to_string()),
        Keyword::Width | Keyword::Height => match raw.parse::<i64>() {
            Ok(value) => {
                let slot = if keyword == Keyword::Width {
                    &mut attributes.width
                } else {
                    &mut attributes.height
                };
                *slot = Some(Scalar::new(value, primary.key));
            }
            Err(err) => diagnostics.emit(invalid(
                ErrorCode::E204,
                format!("non-integer {keyword} {raw:?}: {err}"),
            )),
        },
        Keyword::Direction => match raw.parse::<Direction>() {
            Ok(direction) => attributes.direction = Some(Scalar::new(direction, primary.key)),
            Err(message) => diagnostics.emit(invalid(ErrorCode::E205, message)),
        },
        Keyword::Constraint => {
            if scalar.is_string() {
                attributes.constraint = Some(Scalar::new(raw.to_string(), primary.key));
            } else {
                diagnostics.emit(
                    Diagnostic::error("constraint value must be a string")
                        .with_code(ErrorCode::E206)
                        .with_label(primary.key, "not a string"),
                );
            }
        }
        Keyword::Style | Keyword::SourceArrowhead | Keyword::TargetArrowhead => {}
    }
}

#[cfg(test)]
mod tests {
    use d2_core::span::Span;

    use super::*;
    use crate::ast::Scalar as AstScalar;

    fn field(name: &str, kind: ScalarKind) -> Field {
        let mut field = Field::new(name);
        field.primary = Some(Primary {
            value: AstScalar {
                kind,
                span: Span::new(10..20),
            },
            key: Span::new(0..20),
        });
        field
    }

    fn compile(keyword: Keyword, kind: ScalarKind) -> (Attributes, Vec<Diagnostic>) {
        let mut attributes = Attributes::labelled("a");
        let mut diagnostics = DiagnosticCollector::new();
        let field = field(keyword.as_str(), kind);
        compile_reserved(&mut attributes, keyword, &field, &mut diagnostics);
        (attributes, diagnostics.into_diagnostics())
    }

    fn unquoted(value: &str) -> ScalarKind {
        ScalarKind::Unquoted(value.to_string())
    }

    #[test]
    fn test_shape_sets_value_and_key() {
        let (attributes, diagnostics) = compile(Keyword::Shape, unquoted("Circle"));
        assert!(diagnostics.is_empty());
        assert!(attributes.shape.value.is(Shape::Circle));
        assert_eq!(attributes.shape.map_key, Some(Span::new(0..20)));
    }

    #[test]
    fn test_unknown_shape() {
        let (attributes, diagnostics) = compile(Keyword::Shape, unquoted("blob"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E201));
        assert_eq!(diagnostics[0].message(), r#"unknown shape "blob""#);
        assert!(attributes.shape.map_key.is_none());
    }

    #[test]
    fn test_code_shape_is_plain_text() {
        let (attributes, _) = compile(Keyword::Shape, unquoted("code"));
        assert_eq!(attributes.language.as_deref(), Some("text"));
    }

    #[test]
    fn test_width_must_be_integer() {
        let (attributes, diagnostics) = compile(Keyword::Width, ScalarKind::Number("12".to_string()));
        assert!(diagnostics.is_empty());
        assert_eq!(attributes.width.map(|width| width.value), Some(12));

        let (_, diagnostics) = compile(Keyword::Height, ScalarKind::Number("1.5".to_string()));
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E204));
        assert!(diagnostics[0].message().starts_with(r#"non-integer height "1.5": "#));
    }

    #[test]
    fn test_direction_rejects_unknown() {
        let (_, diagnostics) = compile(Keyword::Direction, unquoted("sideways"));
        assert_eq!(
            diagnostics[0].message(),
            r#"direction must be one of up, down, right, left, got "sideways""#
        );
    }

    #[test]
    fn test_constraint_must_be_string() {
        let (_, diagnostics) = compile(Keyword::Constraint, ScalarKind::Number("1".to_string()));
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E206));

        let (attributes, diagnostics) = compile(Keyword::Constraint, unquoted("primary_key"));
        assert!(diagnostics.is_empty());
        assert_eq!(attributes.constraint.unwrap().value, "primary_key");
    }

    #[test]
    fn test_icon_without_scheme() {
        let (attributes, diagnostics) = compile(Keyword::Icon, unquoted("::"));
        assert!(attributes.icon.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E202));
        assert!(diagnostics[0].message().starts_with(r#"bad icon url "::""#));
    }

    #[test]
    fn test_near_parses_key_path() {
        let (attributes, diagnostics) = compile(Keyword::Near, unquoted("x.y"));
        assert!(diagnostics.is_empty());
        assert_eq!(attributes.near_key.unwrap().path, vec!["x", "y"]);
    }

    #[test]
    fn test_composite_reserved_field() {
        let mut attributes = Attributes::default();
        let mut diagnostics = DiagnosticCollector::new();
        let mut field = Field::new("icon");
        field.map = Some(crate::ir::Map::default());
        compile_reserved(&mut attributes, Keyword::Icon, &field, &mut diagnostics);

        let diagnostics = diagnostics.into_diagnostics();
        assert_eq!(diagnostics[0].message(), "reserved field icon does not accept composite");
    }

    #[test]
    fn test_block_label_sets_language_and_shape() {
        let (attributes, _) = compile(
            Keyword::Label,
            ScalarKind::Block {
                tag: "go".to_string(),
                value: "fmt.Println()".to_string(),
            },
        );
        assert_eq!(attributes.language.as_deref(), Some("golang"));
        assert!(attributes.shape.value.is(Shape::Code));
        assert_eq!(attributes.label.value, "fmt.Println()");

        let (attributes, _) = compile(
            Keyword::Label,
            ScalarKind::Block {
                tag: "md".to_string(),
                value: "# title".to_string(),
            },
        );
        assert!(attributes.shape.value.is(Shape::Text));
    }
}

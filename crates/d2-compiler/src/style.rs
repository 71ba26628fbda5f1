//! `style` maps.

use d2_core::{attributes::Attributes, keyword::StyleKeyword};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    ir::Field,
};

/// Apply every property of a `style` field.
///
/// A property is recorded even when its value fails validation.
pub(crate) fn compile_style(attributes: &mut Attributes, field: &Field, diagnostics: &mut DiagnosticCollector) {
    let Some(map) = field.map() else {
        if let Some(primary) = field.primary() {
            diagnostics.emit(
                Diagnostic::error(r#""style" expects a map of style properties"#)
                    .with_code(ErrorCode::E214)
                    .with_label(primary.value.span, "not a map")
                    .with_help("write `style.fill: red` or `style: { fill: red }`"),
            );
        }
        return;
    };

    for property in map.fields() {
        let Some(key) = StyleKeyword::parse(&property.name) else {
            diagnostics.emit(
                Diagnostic::error(format!("invalid style keyword: {:?}", property.name))
                    .with_code(ErrorCode::E208)
                    .with_label(property.last_key_span(), "unknown style property"),
            );
            continue;
        };
        let Some(primary) = property.primary() else {
            if property.map().is_some() {
                diagnostics.emit(
                    Diagnostic::error(format!("reserved field {} does not accept composite", property.name))
                        .with_code(ErrorCode::E200)
                        .with_label(property.last_key_span(), "expected a scalar value"),
                );
            }
            continue;
        };
        if let Err(err) = attributes
            .style
            .apply(key, primary.value.scalar_string(), primary.key)
        {
            diagnostics.emit(
                Diagnostic::error(err.to_string())
                    .with_code(ErrorCode::E207)
                    .with_label(primary.value.span, "invalid value"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ir, parser};

    fn compile(source: &str) -> (Attributes, Vec<Diagnostic>) {
        let ast = parser::parse(source).unwrap();
        let (map, _) = ir::build(&ast);
        let mut attributes = Attributes::default();
        let mut diagnostics = DiagnosticCollector::new();
        compile_style(&mut attributes, map.field("style").unwrap(), &mut diagnostics);
        (attributes, diagnostics.into_diagnostics())
    }

    #[test]
    fn test_valid_properties() {
        let (attributes, diagnostics) = compile("style: {\n  fill: red\n  opacity: 0.4\n  3d: true\n}");
        assert!(diagnostics.is_empty());
        assert_eq!(attributes.style.fill.unwrap().value.as_deref(), Some("red"));
        assert_eq!(attributes.style.opacity.unwrap().value, Some(0.4));
        assert_eq!(attributes.style.three_dee.unwrap().value, Some(true));
    }

    #[test]
    fn test_invalid_value_keeps_slot() {
        let (attributes, diagnostics) = compile("style.stroke-width: 40");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E207));
        let slot = attributes.style.stroke_width.unwrap();
        assert!(slot.value.is_none());
    }

    #[test]
    fn test_unknown_property() {
        let (_, diagnostics) = compile("style.glow: true");
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E208));
        assert_eq!(diagnostics[0].message(), r#"invalid style keyword: "glow""#);
    }

    #[test]
    fn test_scalar_style() {
        let (_, diagnostics) = compile("style: bold");
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E214));
    }
}

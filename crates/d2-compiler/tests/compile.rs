use d2_compiler::{CompileOptions, ErrorCode, ParseError, compile};
use d2_core::{
    graph::Graph,
    shape::{Shape, ShapeValue},
    specialization::Visibility,
};
use proptest::prelude::*;

fn compile_ok(source: &str) -> Graph {
    match compile("test.d2", source, &CompileOptions::default()) {
        Ok(diagram) => diagram.into_parts().0,
        Err(err) => panic!("Expected compilation to succeed, but got error: {err}"),
    }
}

fn compile_err(source: &str) -> ParseError {
    match compile("test.d2", source, &CompileOptions::default()) {
        Ok(_) => panic!("Expected compilation to fail, but it succeeded"),
        Err(err) => err,
    }
}

fn messages(err: &ParseError) -> Vec<&str> {
    err.diagnostics().iter().map(|d| d.message()).collect()
}

#[test]
fn test_shapes_default_to_rectangle() {
    let graph = compile_ok("a -> b\nc.shape: hexagon\nd: |md # hi|");
    for object in graph.objects() {
        let shape = object.attributes().shape.value;
        assert!(matches!(shape, ShapeValue::Shape(_)), "{} has {shape}", object.abs_id());
    }
    let shape_of = |path: &str| graph.object(graph.find(&[path]).unwrap()).attributes().shape.value;
    assert!(shape_of("a").is(Shape::Rectangle));
    assert!(shape_of("c").is(Shape::Hexagon));
    assert!(shape_of("d").is(Shape::Text));
}

#[test]
fn test_edge_endpoints_exist() {
    let graph = compile_ok("x.a -> y.b: {\n  style.stroke: blue\n}\nz: {\n  c -> _.x.a\n}");
    assert_eq!(graph.edges().len(), 2);
    for edge in graph.edges() {
        assert!(graph.get(edge.src()).is_some());
        assert!(graph.get(edge.dst()).is_some());
        assert_ne!(edge.src(), d2_core::graph::ObjectId::ROOT);
    }
    let ids: Vec<_> = graph.objects().map(|object| object.abs_id()).collect();
    assert_eq!(ids, vec!["x", "x.a", "y", "y.b", "z", "z.c"]);
}

#[test]
fn test_equal_circle_sides() {
    compile_ok("a: {\n  shape: circle\n  width: 5\n  height: 5\n}");

    let err = compile_err("a: {\n  shape: circle\n  width: 5\n  height: 7\n}");
    assert_eq!(messages(&err), vec!["width and height must be equal for circle shapes"]);
}

#[test]
fn test_image_requires_icon() {
    let err = compile_err("a: {\n  shape: image\n}");
    assert_eq!(err.diagnostics().len(), 1);
    assert!(err.diagnostics()[0].message().contains("icon"));
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E303));

    compile_ok("a: {\n  shape: image\n  icon: http://x/y.png\n}");
}

#[test]
fn test_class_scenario() {
    let graph = compile_ok("a.shape: class\na: {\n  +name: string\n  getName(): string\n}");
    let a = graph.object(graph.find(&["a"]).unwrap());
    assert!(!a.has_children());
    assert!(a.sql_table().is_none());
    assert_eq!(graph.objects().count(), 1);

    let class = a.class().unwrap();
    assert_eq!(class.fields.len(), 1);
    assert_eq!(class.fields[0].name, "name");
    assert_eq!(class.fields[0].field_type, "string");
    assert_eq!(class.fields[0].visibility, Visibility::Public);
    assert_eq!(class.methods.len(), 1);
    assert_eq!(class.methods[0].name, "getName");
    assert_eq!(class.methods[0].return_type, "string");
    assert_eq!(class.methods[0].visibility, Visibility::Public);
}

#[test]
fn test_edge_map_reserved_keys() {
    let err = compile_err("a -> b: {\n  foo: 1\n  label: hi\n  style.stroke: red\n}");
    assert_eq!(messages(&err), vec!["edge map keys must be reserved keywords"]);
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E209));
}

#[test]
fn test_near_constant() {
    let err = compile_err("a: {\n  b: {\n    near: top-center\n    c\n  }\n}");
    assert_eq!(
        messages(&err),
        vec!["constant near keys can only be set on root level shapes"]
    );

    let graph = compile_ok("a.near: top-center");
    let a = graph.object(graph.find(&["a"]).unwrap());
    assert_eq!(a.attributes().near_key.as_ref().unwrap().path, vec!["top-center"]);
}

#[test]
fn test_errors_accumulate_in_order() {
    let err = compile_err("a.shape: blob\nb.width: wide\nc.direction: sideways\nd.icon: \"http://[::1\"");
    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::E201, ErrorCode::E204, ErrorCode::E205, ErrorCode::E202]
    );
}

#[test]
fn test_diagnostics_are_located() {
    let err = compile_err("a\nb.shape: blob");
    let location = err.diagnostics()[0].location().unwrap();
    assert_eq!((location.line(), location.column()), (2, 10));
    assert_eq!(err.to_string(), r#"test.d2:2:10: unknown shape "blob""#);
}

#[test]
fn test_utf16_columns() {
    let source = "😀: {\n  😀😀.shape: blob\n}";
    let chars = compile("x.d2", source, &CompileOptions { utf16: false }).unwrap_err();
    let units = compile("x.d2", source, &CompileOptions { utf16: true }).unwrap_err();
    assert_eq!(chars.diagnostics()[0].location().unwrap().column(), 13);
    assert_eq!(units.diagnostics()[0].location().unwrap().column(), 15);
}

#[test]
fn test_syntax_errors_stop_before_compilation() {
    let err = compile_err("a.shape: blob\nb: \"open");
    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
}

#[test]
fn test_layers() {
    let graph = compile_ok(
        "title\nlayers: {\n  detail: {\n    a -> b\n  }\n}\nscenarios: {\n  broken: {\n    x.style.fill: red\n  }\n}",
    );
    assert_eq!(graph.layers()[0].name(), Some("detail"));
    assert_eq!(graph.layers()[0].edges().len(), 1);
    assert!(graph.layers()[0].find(&["title"]).is_none());
    assert_eq!(graph.scenarios()[0].name(), Some("broken"));
}

#[test]
fn test_sql_table_constraints() {
    let graph = compile_ok(
        "users: {\n  shape: sql_table\n  id: int {constraint: primary_key}\n  email: varchar\n}",
    );
    let table = graph.object(graph.find(&["users"]).unwrap()).sql_table().unwrap();
    let columns: Vec<_> = table
        .columns
        .iter()
        .map(|column| (column.name.as_str(), column.column_type.as_str(), column.constraint.as_deref()))
        .collect();
    assert_eq!(
        columns,
        vec![("id", "int", Some("primary_key")), ("email", "varchar", None)]
    );
}

#[test]
fn test_foreign_key_edge_between_tables() {
    let graph = compile_ok(
        "users: {\n  shape: sql_table\n  id: int\n}\norders: {\n  shape: sql_table\n  user_id: int\n}\norders.user_id -> users.id",
    );
    let ids: Vec<_> = graph.objects().map(|object| object.abs_id()).collect();
    assert_eq!(ids, vec!["users", "orders"]);

    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.edge_abs_id(&graph.edges()[0]), "(orders -> users)[0]");
    let users = graph.object(graph.find(&["users"]).unwrap()).sql_table().unwrap();
    assert_eq!(users.columns.len(), 1);
}

#[test]
fn test_edges_inside_class_map() {
    let graph = compile_ok("a: {\n  shape: class\n  x -> y\n}");
    let a = graph.find(&["a"]).unwrap();
    assert_eq!(graph.objects().count(), 1);
    assert_eq!(graph.edges().len(), 1);
    assert_eq!((graph.edges()[0].src(), graph.edges()[0].dst()), (a, a));
    assert_eq!(graph.object(a).class().unwrap().fields.len(), 2);
}

// ===================
// Property Tests
// ===================

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("avoid keywords", |s| {
        d2_core::keyword::Keyword::parse(s).is_none()
            && s.parse::<d2_core::keyword::BoardKind>().is_err()
            && !matches!(s.as_str(), "null" | "true" | "false")
    })
}

fn statement_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        identifier_strategy(),
        (identifier_strategy(), identifier_strategy()).prop_map(|(a, b)| format!("{a} -> {b}")),
        (identifier_strategy(), identifier_strategy()).prop_map(|(a, b)| format!("{a}.{b}: label")),
        identifier_strategy().prop_map(|a| format!("{a}.style.opacity: 0.5")),
    ]
}

fn check_compilation_is_deterministic(source: &str) -> Result<(), TestCaseError> {
    let first = compile("p.d2", source, &CompileOptions::default());
    let second = compile("p.d2", source, &CompileOptions::default());
    match (first, second) {
        (Ok(a), Ok(b)) => prop_assert_eq!(format!("{:?}", a.graph()), format!("{:?}", b.graph())),
        (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
        _ => prop_assert!(false, "compiling twice gave different outcomes for {source:?}"),
    }
    Ok(())
}

proptest! {
    #[test]
    fn compilation_is_deterministic(statements in prop::collection::vec(statement_strategy(), 0..12)) {
        check_compilation_is_deterministic(&statements.join("\n"))?;
    }
}

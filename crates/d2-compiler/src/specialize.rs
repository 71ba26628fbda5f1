//! Folding the children of `class` and `sql_table` objects into records.

use d2_core::{
    graph::{GraphBuilder, ObjectId},
    shape::Shape,
    specialization::{Class, ClassField, ClassMethod, Specialization, SqlColumn, SqlTable, Visibility},
};
use log::debug;

/// Specialize `id` if its shape asks for it.
///
/// Edges that touch an absorbed child move onto `id`.
pub(crate) fn specialize(graph: &mut GraphBuilder, id: ObjectId) {
    let specialization = match graph.object(id).attributes().shape.value.shape() {
        Some(Shape::Class) => Specialization::Class(class(graph, id)),
        Some(Shape::SqlTable) => Specialization::SqlTable(sql_table(graph, id)),
        _ => return,
    };
    let kind = specialization.kind();
    let object = graph.object(id).abs_id();
    let moved = graph.specialize(id, specialization);
    debug!(object = object.as_str(), kind, moved; "Specialized object");
}

/// The label of a member, unless it is just the member's own id.
fn member_type<'g>(graph: &'g GraphBuilder, child: ObjectId) -> Option<&'g str> {
    let object = graph.object(child);
    let label = object.attributes().label.value.as_str();
    (label != object.id()).then_some(label)
}

fn class(graph: &GraphBuilder, id: ObjectId) -> Class {
    let mut class = Class::default();
    for child in graph.object(id).children() {
        let (visibility, name) = Visibility::split(graph.object(child).id());
        let declared_type = member_type(graph, child);
        match name.split_once('(') {
            Some((method, rest)) => class.methods.push(ClassMethod {
                name: method.to_string(),
                parameters: rest.strip_suffix(')').unwrap_or(rest).to_string(),
                return_type: declared_type.unwrap_or("void").to_string(),
                visibility,
            }),
            None => class.fields.push(ClassField {
                name: name.to_string(),
                field_type: declared_type.unwrap_or_default().to_string(),
                visibility,
            }),
        }
    }
    class
}

fn sql_table(graph: &GraphBuilder, id: ObjectId) -> SqlTable {
    let columns = graph
        .object(id)
        .children()
        .map(|child| {
            let object = graph.object(child);
            SqlColumn {
                name: object.id().to_string(),
                column_type: member_type(graph, child).unwrap_or_default().to_string(),
                constraint: object
                    .attributes()
                    .constraint
                    .as_ref()
                    .map(|constraint| constraint.value.clone()),
            }
        })
        .collect();
    SqlTable { columns }
}

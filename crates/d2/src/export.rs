//! Graph exporters.
//!
//! An [`Exporter`] turns a compiled [`Graph`] into text. [`TextExporter`]
//! writes a line-oriented summary for humans, [`JsonExporter`] the full
//! graph as JSON.

use std::fmt::{self, Write};

use d2_core::{
    graph::{ArrowEnd, Graph},
    keyword::BoardKind,
    specialization::Specialization,
};

/// Error type for export operations.
#[derive(Debug)]
pub enum Error {
    Render(String),
    Serialize(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Render(msg) => write!(f, "Render error: {msg}"),
            Error::Serialize(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Render(_) => None,
            Error::Serialize(err) => Some(err),
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(err: fmt::Error) -> Self {
        Error::Render(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err)
    }
}

pub trait Exporter {
    /// Render `graph`, including its nested boards.
    fn export_graph(&self, graph: &Graph) -> Result<String, Error>;
}

/// Line-oriented summary of objects, edges and boards.
///
/// ```text
/// board root
///   object a shape=rectangle label="a"
///   edge (a -> b)[0] label=""
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export_graph(&self, graph: &Graph) -> Result<String, Error> {
        let mut out = String::new();
        write_board(&mut out, graph, "root")?;
        Ok(out)
    }
}

fn write_board(out: &mut String, graph: &Graph, path: &str) -> fmt::Result {
    writeln!(out, "board {path}")?;

    for id in graph.object_ids() {
        let object = graph.object(id);
        let attrs = object.attributes();
        write!(
            out,
            "  object {} shape={} label={:?}",
            object.abs_id(),
            attrs.shape.value,
            attrs.label.value
        )?;
        if let Some(near) = &attrs.near_key {
            write!(out, " near={near}")?;
        }
        match object.specialization() {
            Some(Specialization::Class(class)) => write!(
                out,
                " fields={} methods={}",
                class.fields.len(),
                class.methods.len()
            )?,
            Some(Specialization::SqlTable(table)) => {
                write!(out, " columns={}", table.columns.len())?
            }
            None => {}
        }
        writeln!(out)?;
    }

    for edge in graph.edges() {
        write!(
            out,
            "  edge {} label={:?}",
            graph.edge_abs_id(edge),
            edge.attributes().label.value
        )?;
        for (end, name) in [(ArrowEnd::Source, "source"), (ArrowEnd::Target, "target")] {
            if edge.arrowhead(end).is_some() {
                write!(out, " {name}-arrowhead={}", edge.arrowhead_kind(end))?;
            }
        }
        writeln!(out)?;
    }

    for kind in BoardKind::ALL {
        for board in graph.boards(kind) {
            let name = board.name().unwrap_or_default();
            write_board(out, board, &format!("{path}.{kind}.{name}"))?;
        }
    }
    Ok(())
}

/// The whole graph serialized as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Exporter for JsonExporter {
    fn export_graph(&self, graph: &Graph) -> Result<String, Error> {
        let json = if self.pretty {
            serde_json::to_string_pretty(graph)?
        } else {
            serde_json::to_string(graph)?
        };
        Ok(json)
    }
}

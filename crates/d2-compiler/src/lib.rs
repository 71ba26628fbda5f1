//! # D2 Compiler
//!
//! Compiles D2 diagram source into a typed [`Graph`](d2_core::graph::Graph).
//! The pipeline runs in four stages:
//!
//! 1. **Parse** - source text to a spanned syntax tree ([`ast`])
//! 2. **Build IR** - expand and merge keys into a scope-resolved tree ([`ir`])
//! 3. **Compile** - create objects and edges, apply reserved keywords and
//!    styles, specialize classes and SQL tables
//! 4. **Validate** - check keyword combinations and `near` targets
//!
//! Nested `layers`, `scenarios` and `steps` run stages 3 and 4 on their own.
//! Syntax errors stop the pipeline after stage 1; every later stage keeps
//! going after an error so one call reports as many problems as possible.
//!
//! ## Usage
//!
//! ```
//! # use d2_compiler::{compile, CompileOptions, ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = "server -> db: queries\ndb.shape: cylinder";
//!     let diagram = compile("example.d2", source, &CompileOptions::default())?;
//!     assert_eq!(diagram.graph().edges().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod ast;
mod board;
mod compile;
mod error;
pub mod ir;
mod parser;
mod reserved;
mod specialize;
mod style;
mod validate;

pub use error::{Diagnostic, ErrorCode, Label, LineIndex, Location, ParseError, Severity};
pub use parser::{parse, parse_key};

use d2_core::graph::Graph;
use log::{debug, info, trace};

/// Options for [`compile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Report diagnostic columns in UTF-16 code units instead of characters.
    pub utf16: bool,
}

/// A compiled diagram: the graph and the syntax tree it came from.
#[derive(Debug, Clone)]
pub struct Diagram {
    graph: Graph,
    ast: ast::Map,
}

impl Diagram {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn ast(&self) -> &ast::Map {
        &self.ast
    }

    pub fn into_parts(self) -> (Graph, ast::Map) {
        (self.graph, self.ast)
    }
}

/// Compile D2 source text into a diagram.
///
/// `path` is only used to locate diagnostics.
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic, each located as
/// `path:line:column`, if any stage reported an error. No partial graph is
/// returned.
pub fn compile(path: &str, source: &str, options: &CompileOptions) -> Result<Diagram, ParseError> {
    info!(path, bytes = source.len(); "Compiling diagram");
    trace!(source; "Source text");
    let index = LineIndex::new(source);

    let ast = parser::parse(source).map_err(|err| err.locate(path, &index, options.utf16))?;
    debug!(statements = ast.keys().count(); "Parsed source");

    let (map, mut diagnostics) = ir::build(&ast);
    let (graph, board_diagnostics) = board::compile_board(&map, None, Vec::new());
    diagnostics.extend(board_diagnostics);

    if !diagnostics.is_empty() {
        info!(errors = diagnostics.len(); "Compilation failed");
        return Err(ParseError::new(diagnostics).locate(path, &index, options.utf16));
    }

    info!(objects = graph.objects().count(), edges = graph.edges().len(); "Compiled diagram");
    Ok(Diagram { graph, ast })
}

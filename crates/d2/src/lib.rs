//! D2 - compile diagram source into a typed graph.
//!
//! This crate wires the compiler to configuration, file input and graph
//! export. The data model lives in [`d2_core`] and the compiler itself in
//! [`d2_compiler`].

pub mod config;
pub mod export;

mod error;

pub use d2_compiler::{CompileOptions, Diagnostic, Diagram, ErrorCode, ParseError, Severity};
pub use d2_core::{attributes, graph, keyword, shape, specialization, style};

pub use error::D2Error;

use std::{fs, path::Path};

use log::{debug, info};

use config::AppConfig;
use export::Exporter;

/// Builder for compiling and exporting D2 diagrams.
///
/// # Examples
///
/// ```
/// use d2::{DiagramBuilder, config::AppConfig, export::TextExporter};
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder
///     .compile("example.d2", "app -> db")
///     .expect("Failed to compile");
/// assert_eq!(diagram.graph().edges().len(), 1);
///
/// let text = builder.export(&diagram, &TextExporter).expect("Failed to export");
/// assert!(text.contains("edge (app -> db)[0]"));
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Compile source text into a diagram.
    ///
    /// `path` names the source in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`D2Error::Compile`] with every diagnostic and the source
    /// text when compilation fails.
    pub fn compile(&self, path: &str, source: &str) -> Result<Diagram, D2Error> {
        let options = CompileOptions {
            utf16: self.config.compile().utf16(),
        };
        let diagram = d2_compiler::compile(path, source, &options)
            .map_err(|err| D2Error::new_compile_error(err, path, source))?;
        debug!(objects = diagram.graph().objects().count(); "Diagram compiled successfully");
        Ok(diagram)
    }

    /// Read and compile a source file.
    ///
    /// # Errors
    ///
    /// Returns [`D2Error::Io`] if the file cannot be read, or the errors of
    /// [`DiagramBuilder::compile`].
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<Diagram, D2Error> {
        let path = path.as_ref();
        info!(path:? = path; "Reading source file");
        let source = fs::read_to_string(path)?;
        self.compile(&path.to_string_lossy(), &source)
    }

    /// Export a compiled diagram with `exporter`.
    ///
    /// # Errors
    ///
    /// Returns [`D2Error::Export`] if the exporter fails.
    pub fn export(&self, diagram: &Diagram, exporter: &dyn Exporter) -> Result<String, D2Error> {
        let output = exporter.export_graph(diagram.graph())?;
        debug!(bytes = output.len(); "Diagram exported");
        Ok(output)
    }
}

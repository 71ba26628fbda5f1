//! CLI logic for the `d2c` diagram compiler.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Format};

use std::{fs, io::Write};

use log::info;

use d2::{
    D2Error, DiagramBuilder,
    export::{Exporter, JsonExporter, TextExporter},
};

/// Run the compiler on `args.input`
///
/// The compiled graph is written to `args.output`, or to stdout when no
/// output path is given.
///
/// # Errors
///
/// Returns `D2Error` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Compile errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), D2Error> {
    info!(
        input_path = args.input,
        format:? = args.format;
        "Processing diagram"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.utf16 {
        app_config.compile_mut().set_utf16(true);
    }

    let builder = DiagramBuilder::new(app_config);
    let diagram = builder.compile_file(&args.input)?;

    let exporter: Box<dyn Exporter> = match args.format {
        Format::Text => Box::new(TextExporter),
        Format::Json => Box::new(JsonExporter::new(true)),
    };
    let output = builder.export(&diagram, exporter.as_ref())?;

    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            info!(output_file = path.as_str(); "Graph exported successfully");
        }
        None => std::io::stdout().write_all(output.as_bytes())?,
    }

    Ok(())
}

//! Command-line argument definitions for `d2c`.
//!
//! [`Args`] is parsed with [`clap`] and selects the input file, the output
//! destination and format, configuration and logging.

use clap::{Parser, ValueEnum};

/// Compile a D2 diagram into a typed graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input D2 file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Output file; the graph is written to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Report diagnostic columns in UTF-16 code units
    #[arg(long)]
    pub utf16: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Output format of the compiled graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One line per object and edge
    Text,
    /// The full graph as pretty-printed JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["d2c", "in.d2"]);
        assert_eq!(args.input, "in.d2");
        assert_eq!(args.output, None);
        assert_eq!(args.format, Format::Text);
        assert!(!args.utf16);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_flags() {
        let args = Args::parse_from([
            "d2c", "in.d2", "-o", "out.json", "--format", "json", "--utf16", "-c", "d2.toml",
        ]);
        assert_eq!(args.output.as_deref(), Some("out.json"));
        assert_eq!(args.format, Format::Json);
        assert!(args.utf16);
        assert_eq!(args.config.as_deref(), Some("d2.toml"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["d2c", "in.d2", "--format", "svg"]).is_err());
    }
}

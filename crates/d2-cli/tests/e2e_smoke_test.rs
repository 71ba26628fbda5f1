use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use d2::D2Error;
use d2_cli::{Args, Format};

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

/// Collects all .d2 files from a directory
fn collect_d2_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("d2"))
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn args(input: &Path, output: &Path, format: Format) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        format,
        utf16: false,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let demos = collect_d2_files(demos_dir());
    assert!(!demos.is_empty(), "No demos found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let stem = demo.file_stem().unwrap().to_string_lossy();
        for (format, ext) in [(Format::Text, "txt"), (Format::Json, "json")] {
            let output = temp_dir.path().join(format!("{stem}.{ext}"));
            if let Err(e) = d2_cli::run(&args(demo, &output, format)) {
                failed.push((demo.clone(), e));
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo run(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let demos = collect_d2_files(demos_dir().join("errors"));
    assert!(!demos.is_empty(), "No error demos found in demos/errors/");

    for demo in &demos {
        let output = temp_dir.path().join("out.txt");
        match d2_cli::run(&args(demo, &output, Format::Text)) {
            Err(D2Error::Compile { err, .. }) => assert!(
                !err.diagnostics().is_empty(),
                "{} failed without diagnostics",
                demo.display()
            ),
            Err(other) => panic!("{} failed with a non-compile error: {other}", demo.display()),
            Ok(()) => panic!("{} compiled but should have failed", demo.display()),
        }
        assert!(!output.exists(), "{} produced output", demo.display());
    }
}

#[test]
fn e2e_text_output_contents() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("layers.txt");

    d2_cli::run(&args(&demos_dir().join("layers.d2"), &output, Format::Text)).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("board root\n"));
    assert!(text.contains("  edge (client -> server)[0] label=\"\"\n"));
    assert!(text.contains("board root.layers.server-detail\n"));
    assert!(text.contains("board root.steps.start\n"));
}

#[test]
fn e2e_json_output_contents() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("sql.json");

    d2_cli::run(&args(&demos_dir().join("sql_tables.d2"), &output, Format::Json)).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["edges"].as_array().map(Vec::len), Some(1));
}

#[test]
fn e2e_config_file_is_applied() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[compile]\nutf16 = true\n").unwrap();
    let input = temp_dir.path().join("emoji.d2");
    fs::write(&input, "😀😀.shape: blob\n").unwrap();

    let mut run_args = args(&input, &temp_dir.path().join("out.txt"), Format::Text);
    run_args.config = Some(config.to_string_lossy().to_string());

    let err = d2_cli::run(&run_args).unwrap_err();
    assert!(err.to_string().ends_with(":1:13: unknown shape \"blob\""), "{err}");
}

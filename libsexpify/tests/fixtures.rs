//! Test harness converting the fixture inputs under test/input/.
//!
//! Every input file is loaded, encoded and compared against the expected
//! flat output in test/sexp/ and the pretty-printed output in test/pretty/.

use std::fs;
use std::path::{Path, PathBuf};

use libsexpify::{
    load_file, pretty, to_sexpr, InputFormat, LoadOptions, DEFAULT_INDENT, DEFAULT_PREFIX,
};
use tempfile::TempDir;

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// Get all input fixtures, sorted.
fn get_input_files() -> Vec<PathBuf> {
    let pattern = test_root().join("input").join("*.*");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .flatten()
        .collect();
    files.sort();
    files
}

/// Read the expected output for an input file from a sibling directory.
fn read_expected(input: &Path, subdir: &str) -> Option<String> {
    let stem = input.file_stem().unwrap().to_string_lossy();
    let path = test_root().join(subdir).join(format!("{}.scm", stem));
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim_end().to_string())
}

/// JSON fixtures are not inferred from their extension, so ask for them.
fn options_for(input: &Path) -> LoadOptions {
    let format = match input.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(InputFormat::Json),
        _ => None,
    };
    LoadOptions {
        format,
        ..LoadOptions::default()
    }
}

fn run_fixture(input: &Path, subdir: &str, indent: Option<usize>) -> Result<(), String> {
    let name = input.file_name().unwrap().to_string_lossy().to_string();
    let expected = read_expected(input, subdir)
        .ok_or_else(|| format!("{}: no expected output in {}/", name, subdir))?;
    let value = load_file(input, &options_for(input))
        .map_err(|e| format!("{}: load failed: {}", name, e))?;
    let actual = to_sexpr(&value, DEFAULT_PREFIX, indent);
    if actual != expected {
        return Err(format!(
            "{}: output mismatch\n  Expected:\n{}\n  Actual:\n{}",
            name, expected, actual
        ));
    }
    Ok(())
}

fn run_all(subdir: &str, indent: Option<usize>) {
    let files = get_input_files();
    assert!(!files.is_empty(), "No fixture inputs found!");

    let mut failures = Vec::new();
    for file in &files {
        if let Err(msg) = run_fixture(file, subdir, indent) {
            failures.push(msg);
        }
    }

    println!(
        "\n{} results: {} passed, {} failed",
        subdir,
        files.len() - failures.len(),
        failures.len()
    );
    for failure in &failures {
        println!("  - {}", failure);
    }
    assert!(failures.is_empty(), "{} fixture tests failed", failures.len());
}

#[test]
fn test_flat_fixtures() {
    run_all("sexp", None);
}

#[test]
fn test_pretty_fixtures() {
    run_all("pretty", Some(DEFAULT_INDENT));
}

#[test]
fn test_pretty_fixtures_are_stable() {
    for file in get_input_files() {
        let expected = read_expected(&file, "pretty").unwrap();
        assert_eq!(
            pretty(&expected, DEFAULT_INDENT),
            expected,
            "re-printing changed {}",
            file.display()
        );
    }
}

// Individual checks for specific fixtures

#[test]
fn test_basic_fixture_key_order() {
    let value = load_file(&test_root().join("input/basic.yaml"), &LoadOptions::default()).unwrap();
    let keys: Vec<&str> = value
        .as_mapping()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(
        keys,
        ["name", "active", "when", "count", "ratio", "note", "code", "missing"]
    );
}

#[test]
fn test_multi_document_fixture_is_sequence_of_mappings() {
    let value = load_file(&test_root().join("input/multi.yaml"), &LoadOptions::default()).unwrap();
    let docs = value.as_sequence().unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[2].get("kind").and_then(|v| v.as_str()), Some("Footer"));
}

#[test]
fn test_env_substitution_in_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("env.yaml");
    fs::write(&path, "host: ${DB_HOST}\nport: ${DB_PORT}\n").unwrap();

    let options = LoadOptions {
        substitute_env: true,
        ..LoadOptions::default()
    };
    let value = libsexpify::load_file_with(&path, &options, |name| match name {
        "DB_HOST" => Some("db01".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(
        to_sexpr(&value, DEFAULT_PREFIX, None),
        "((yaml:host 'db01)\n(yaml:port 'nil))"
    );
}

#[test]
fn test_json_fixture_needs_explicit_format() {
    let path = test_root().join("input/data.json");
    let err = load_file(&path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, libsexpify::Error::Format(_)));
    assert!(load_file(&path, &options_for(&path)).is_ok());
}

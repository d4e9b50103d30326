//! Shared test utilities for the twigify test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let html = read_fixture(&tmp, "index.html");
//! let templated = templatize(&html).unwrap();
//! assert_placeholders(&templated.render(false), &["{{ h1_content }}"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

/// Read a fixture file from a directory created by [`setup_fixtures`].
pub fn read_fixture(dir: &TempDir, name: &str) -> String {
    let path = dir.path().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture '{}' unreadable: {e}", path.display()))
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert that every placeholder appears in `output`.
pub fn assert_placeholders(output: &str, expected: &[&str]) {
    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|p| !output.contains(p))
        .collect();
    assert!(
        missing.is_empty(),
        "missing placeholders {missing:?} in output:\n{output}"
    );
}

/// Assert that none of `literals` survive in `output` outside the lines
/// that contain `except`.
pub fn assert_no_literals(output: &str, literals: &[&str], except: &str) {
    for (number, line) in output.lines().enumerate() {
        if !except.is_empty() && line.contains(except) {
            continue;
        }
        for literal in literals {
            assert!(
                !line.contains(literal),
                "literal '{literal}' left on line {}: {line}",
                number + 1
            );
        }
    }
}

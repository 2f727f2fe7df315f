//! Structural tests for layer boundaries.
//!
//! These scan the source tree so a stray import fails the build's tests
//! rather than a review.

use std::path::{Path, PathBuf};

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines of a file, with their 1-based line numbers.
fn code_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .enumerate()
        .filter(|(_, l)| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(|(i, l)| (i + 1, l.to_string()))
        .collect()
}

/// Lines under `dir` that mention any of `forbidden`.
fn violations(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (lineno, line) in code_lines(&file) {
            for needle in forbidden {
                if line.contains(needle) {
                    found.push(format!("{rel}:{lineno}: `{needle}`: {}", line.trim()));
                }
            }
        }
    }
    found
}

#[test]
fn domain_is_free_of_io_and_outer_layers() {
    let found = violations(
        &src_dir().join("domain"),
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "std::process",
            "reqwest",
        ],
    );
    assert!(found.is_empty(), "domain/ must stay pure:\n{}", found.join("\n"));
}

#[test]
fn application_does_not_reach_into_adapters() {
    let found = violations(
        &src_dir().join("application"),
        &["crate::infra", "crate::commands", "crate::output", "reqwest"],
    );
    assert!(
        found.is_empty(),
        "application/ must depend on ports only:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_does_not_depend_on_presentation() {
    let found = violations(&src_dir().join("infra"), &["crate::commands", "crate::output"]);
    assert!(found.is_empty(), "infra/ must not print:\n{}", found.join("\n"));
}

#[test]
fn services_take_trait_bounds_not_adapters() {
    let found = violations(
        &src_dir().join("application").join("services"),
        &["DockerOrchestrator", "TwitterRuleRegistry", "TokioCommandRunner"],
    );
    assert!(
        found.is_empty(),
        "services must take `&impl Port`:\n{}",
        found.join("\n")
    );
}

//! Package-manifest reading for `agentsync-detector`.
//!
//! `detect_manifest(root)` inspects indicator files in a project root and
//! returns the named scripts agents should run (lint, test, build, …) as
//! runnable shell commands. Checks are ordered by specificity: a `package.json`
//! with explicit scripts wins over language conventions, and a `Makefile` is
//! the last resort.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use agentsync_core::Manifest;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// JavaScript package manager, inferred from the lockfile next to
/// `package.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Lockfile checks in priority order; `npm` when none is present.
    pub fn detect(root: &Path) -> Self {
        if root.join("pnpm-lock.yaml").exists() {
            PackageManager::Pnpm
        } else if root.join("yarn.lock").exists() {
            PackageManager::Yarn
        } else if root.join("bun.lockb").exists() || root.join("bun.lock").exists() {
            PackageManager::Bun
        } else {
            PackageManager::Npm
        }
    }

    /// Shell command that runs the package script `script`.
    pub fn run(self, script: &str) -> String {
        match (self, script) {
            (PackageManager::Npm, "test") => "npm test".to_string(),
            (PackageManager::Npm, _) => format!("npm run {script}"),
            (PackageManager::Pnpm, _) => format!("pnpm run {script}"),
            (PackageManager::Yarn, _) => format!("yarn {script}"),
            (PackageManager::Bun, _) => format!("bun run {script}"),
        }
    }
}

/// Errors from manifest detection.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Detect the project manifest at `root`.
///
/// Returns `Ok(None)` when no known indicator file exists. A malformed
/// `package.json`, `Cargo.toml` or `pyproject.toml` is an error; `go.mod`
/// and `Makefile` are read leniently.
pub fn detect_manifest(root: &Path) -> Result<Option<Manifest>, DetectError> {
    if let Some(m) = detect_node(root)? { return Ok(Some(m)); }
    if let Some(m) = detect_cargo(root)? { return Ok(Some(m)); }
    if let Some(m) = detect_python(root)? { return Ok(Some(m)); }
    if let Some(m) = detect_go(root)? { return Ok(Some(m)); }
    if let Some(m) = detect_make(root)? { return Ok(Some(m)); }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Manifest readers
// ---------------------------------------------------------------------------

fn detect_node(root: &Path) -> Result<Option<Manifest>, DetectError> {
    let Some(content) = read_optional(&root.join("package.json"))? else {
        return Ok(None);
    };
    let json: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        DetectError::ParseError { path: root.join("package.json"), message: e.to_string() }
    })?;

    let pm = PackageManager::detect(root);
    let scripts = json
        .get("scripts")
        .and_then(|v| v.as_object())
        .map(|obj| {
            obj.iter()
                .filter(|(_, body)| body.as_str().is_some_and(|b| !b.trim().is_empty()))
                .map(|(name, _)| (name.clone(), pm.run(name)))
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(Manifest {
        name: json.get("name").and_then(|v| v.as_str()).map(str::to_string),
        source: "package.json".to_string(),
        scripts,
    }))
}

fn detect_cargo(root: &Path) -> Result<Option<Manifest>, DetectError> {
    let Some(content) = read_optional(&root.join("Cargo.toml"))? else {
        return Ok(None);
    };
    let table = parse_toml(&root.join("Cargo.toml"), &content)?;
    let all = if table.contains_key("workspace") { " --workspace" } else { "" };

    Ok(Some(Manifest {
        name: toml_string(&table, &["package", "name"]),
        source: "Cargo.toml".to_string(),
        scripts: scripts(&[
            ("lint", format!("cargo clippy{all} --all-targets -- -D warnings")),
            ("test", format!("cargo test{all}")),
            ("build", format!("cargo build{all}")),
            ("format", "cargo fmt --all -- --check".to_string()),
        ]),
    }))
}

fn detect_python(root: &Path) -> Result<Option<Manifest>, DetectError> {
    let Some(content) = read_optional(&root.join("pyproject.toml"))? else {
        return Ok(None);
    };
    let table = parse_toml(&root.join("pyproject.toml"), &content)?;
    let lower = content.to_lowercase();

    let mut entries = vec![
        ("test", "pytest".to_string()),
        ("build", "python -m build".to_string()),
    ];
    if lower.contains("ruff") {
        entries.push(("lint", "ruff check .".to_string()));
        entries.push(("format", "ruff format --check .".to_string()));
    } else if lower.contains("flake8") {
        entries.push(("lint", "flake8".to_string()));
    }
    if lower.contains("mypy") {
        entries.push(("typecheck", "mypy .".to_string()));
    }

    Ok(Some(Manifest {
        name: toml_string(&table, &["project", "name"])
            .or_else(|| toml_string(&table, &["tool", "poetry", "name"])),
        source: "pyproject.toml".to_string(),
        scripts: scripts(&entries),
    }))
}

fn detect_go(root: &Path) -> Result<Option<Manifest>, DetectError> {
    let Some(content) = read_optional(&root.join("go.mod"))? else {
        return Ok(None);
    };
    let module = content
        .lines()
        .find_map(|l| l.trim().strip_prefix("module "))
        .map(|m| m.trim().to_string());

    Ok(Some(Manifest {
        name: module,
        source: "go.mod".to_string(),
        scripts: scripts(&[
            ("lint", "go vet ./...".to_string()),
            ("test", "go test ./...".to_string()),
            ("build", "go build ./...".to_string()),
            ("format", "gofmt -l .".to_string()),
        ]),
    }))
}

fn detect_make(root: &Path) -> Result<Option<Manifest>, DetectError> {
    let Some(content) = read_optional(&root.join("Makefile"))? else {
        return Ok(None);
    };
    let scripts: BTreeMap<String, String> = make_targets(&content)
        .into_iter()
        .map(|t| (t.to_string(), format!("make {t}")))
        .collect();
    if scripts.is_empty() {
        return Ok(None);
    }
    Ok(Some(Manifest { name: None, source: "Makefile".to_string(), scripts }))
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

fn read_optional(path: &Path) -> Result<Option<String>, DetectError> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|source| DetectError::Io { path: path.to_path_buf(), source })
}

fn scripts(entries: &[(&str, String)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn parse_toml(path: &Path, content: &str) -> Result<toml::Table, DetectError> {
    toml::from_str(content)
        .map_err(|e| DetectError::ParseError { path: path.to_path_buf(), message: e.to_string() })
}

/// Non-blank string at the dotted key path `keys`.
fn toml_string(table: &toml::Table, keys: &[&str]) -> Option<String> {
    let (last, tables) = keys.split_last()?;
    let mut current = table;
    for key in tables {
        current = current.get(*key)?.as_table()?;
    }
    let value = current.get(*last)?.as_str()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Explicit rule targets (`name:` at column 0). Skips special targets
/// (`.PHONY`), pattern rules and variable assignments (`X := y`).
fn make_targets(content: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for line in content.lines() {
        if line.starts_with(['\t', ' ', '#', '.']) {
            continue;
        }
        let Some((target, rest)) = line.split_once(':') else { continue };
        if rest.starts_with('=') || rest.starts_with(':') {
            continue;
        }
        for name in target.split_whitespace() {
            let valid = name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
            if valid && !out.contains(&name) {
                out.push(name);
            }
        }
    }
    out
}

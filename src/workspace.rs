//! # Workspace Discovery and Expansion
//!
//! A monorepo project declares workspace patterns (e.g. `packages/*`) in its
//! `.toolbelt.yaml`. Discovery globs those patterns against the project root
//! and keeps every directory that contains a `package.json`, reading the
//! package name from it. Expansion then filters the discovered packages
//! against the user-supplied `--workspaces` pattern.
//!
//! Two distinct "empty" situations matter downstream:
//!
//! - The project declares patterns but expansion matched nothing (or
//!   discovery found nothing): a valid, non-error outcome — the command
//!   simply has zero packages to run against.
//! - The project declares no patterns at all while `--workspaces` was
//!   passed: a fatal configuration error, raised before any expansion
//!   attempt, carrying the offending flag value.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One sub-project within a monorepo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePackage {
    /// Package name, from its `package.json` (directory name fallback).
    pub name: String,
    /// Absolute package path.
    pub path: PathBuf,
}

/// Fatal-error guard for workspace-scoped commands: `--workspaces` against a
/// project with no workspace patterns aborts before expansion.
pub fn ensure_enabled(pattern: &str, configured: &[String]) -> Result<()> {
    if configured.is_empty() {
        return Err(Error::WorkspacesNotEnabled {
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

/// Discover workspace packages by globbing the configured patterns against
/// `root`. Directories without a `package.json` are skipped. Results follow
/// glob iteration order per pattern, patterns in declaration order.
pub fn discover(root: &Path, patterns: &[String]) -> Result<Vec<WorkspacePackage>> {
    let mut packages = Vec::new();

    for pattern in patterns {
        let full_pattern = root.join(pattern);
        let entries = glob::glob(&full_pattern.to_string_lossy())?;

        for entry in entries.flatten() {
            if !entry.is_dir() {
                continue;
            }
            let manifest = entry.join("package.json");
            if !manifest.exists() {
                continue;
            }
            packages.push(WorkspacePackage {
                name: read_package_name(&manifest, &entry),
                path: entry,
            });
        }
    }

    Ok(packages)
}

/// Read the `name` field from a package manifest, falling back to the
/// directory name when the manifest is unreadable or nameless.
fn read_package_name(manifest: &Path, dir: &Path) -> String {
    let fallback = || {
        dir.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    match std::fs::read_to_string(manifest) {
        Ok(content) => match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) => value["name"]
                .as_str()
                .map(|name| name.to_string())
                .unwrap_or_else(fallback),
            Err(_) => fallback(),
        },
        Err(_) => fallback(),
    }
}

/// Filter discovered packages against a `--workspaces` pattern.
///
/// `*` matches every package. Any other pattern matches by substring
/// containment after stripping `*` wildcards, so `driver-*` keeps every
/// package whose name contains `driver-` and an exact name matches itself.
/// Discovery order is preserved.
pub fn expand(pattern: &str, packages: &[WorkspacePackage]) -> Vec<WorkspacePackage> {
    if pattern == "*" {
        return packages.to_vec();
    }

    let needle = pattern.trim_matches('*');
    packages
        .iter()
        .filter(|package| package.name.contains(needle))
        .cloned()
        .collect()
}

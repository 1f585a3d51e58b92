//! # Run Context
//!
//! `RunContext` carries the per-run state every component needs: the parsed
//! passthrough arguments, the working-directory root, the config module
//! root, workspace information, scheduling preferences, and the set of
//! config files materialized so far.
//!
//! Workspace fan-out works by *shallow cloning*: `for_workspace` returns a
//! clone with only `root` overridden, so N package invocations share one
//! bootstrap (same argv, same resolved drivers, same config-path set)
//! without re-initializing anything. The config-path set is therefore held
//! behind `Arc<Mutex<...>>` — cloning the context shares the set, and a
//! secondary file registered by one invocation is cleaned up exactly once at
//! the end of the run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

/// Per-run state, cloned per workspace package during fan-out.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Passthrough arguments forwarded to the underlying tool.
    pub argv: Vec<String>,

    /// Working directory for invocations. The run root, or a workspace
    /// package path after `for_workspace`.
    pub root: PathBuf,

    /// Location of the configuration module (driver config templates).
    pub module_root: PathBuf,

    /// The project root, unchanged by workspace fan-out.
    pub workspace_root: PathBuf,

    /// Workspace patterns declared by the project config. Empty means the
    /// project is not workspaces enabled.
    pub workspaces: Vec<String>,

    /// Priority names from `--priority`, already split on commas.
    pub priority: Vec<String>,

    /// Concurrency override from `--concurrency`, if given.
    pub concurrency: Option<usize>,

    /// Config files materialized during this run, shared across clones.
    config_paths: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl RunContext {
    /// Create a context rooted at `root`, with the module root alongside it.
    pub fn new(root: PathBuf, module_root: PathBuf) -> Self {
        Self {
            argv: Vec::new(),
            workspace_root: root.clone(),
            root,
            module_root,
            workspaces: Vec::new(),
            priority: Vec::new(),
            concurrency: None,
            config_paths: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }

    /// Clone this context for a workspace package, overriding only the
    /// working-directory root. Everything else — argv, module root,
    /// workspace metadata, the shared config-path set — is carried over.
    pub fn for_workspace(&self, package_root: &Path) -> Self {
        let mut context = self.clone();
        context.root = package_root.to_path_buf();
        context
    }

    /// Record a materialized config file for end-of-run cleanup.
    ///
    /// Append-only and idempotent: registering the same path twice is a
    /// no-op, so secondary files created per workspace do not become
    /// duplicate cleanup entries.
    pub fn add_config_path(&self, path: PathBuf) -> Result<()> {
        let mut paths = self.config_paths.lock().map_err(|_| Error::LockPoisoned {
            context: "config path set".to_string(),
        })?;
        paths.insert(path);
        Ok(())
    }

    /// Snapshot of every config path registered so far, in sorted order.
    pub fn config_paths(&self) -> Result<Vec<PathBuf>> {
        let paths = self.config_paths.lock().map_err(|_| Error::LockPoisoned {
            context: "config path set".to_string(),
        })?;
        Ok(paths.iter().cloned().collect())
    }
}

//! # Project Configuration Schema and Parsing
//!
//! Defines the data structures behind the `.toolbelt.yaml` project file and
//! the logic for parsing it.
//!
//! ## Key Components
//!
//! - **`ProjectConfig`**: the whole file — the config module root, the list
//!   of enabled drivers, workspace patterns, and run settings.
//!
//! - **`DriverEntry`**: one enabled driver. Supports two formats: a bare
//!   string (`- eslint`) for drivers run with defaults, and a detailed map
//!   (`- name: eslint`, plus optional `config:` fragment and `args:`) when a
//!   project overrides the driver's template configuration.
//!
//! - **`Settings`**: run-wide toggles — parallel config materialization,
//!   cleanup of temporary config files, and the default concurrency for the
//!   scheduler's parallel phase. Every value has a serde default so an empty
//!   `settings:` block (or none at all) is valid.
//!
//! Driver config fragments are held as `serde_json::Value` because every
//! built-in driver's config file is JSON-shaped; YAML input deserializes
//! into JSON values transparently.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Name of the project configuration file, looked up in the run root.
pub const CONFIG_FILE: &str = ".toolbelt.yaml";

/// The parsed `.toolbelt.yaml` project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory holding driver configuration templates (`configs/<name>.yaml`)
    /// and any other module-provided assets. Relative paths are resolved
    /// against the project root.
    #[serde(default = "default_module")]
    pub module: PathBuf,

    /// Drivers enabled for this project.
    #[serde(default)]
    pub drivers: Vec<DriverEntry>,

    /// Workspace package patterns (e.g. `packages/*`). An empty list means
    /// the project is not workspaces enabled, which makes `--workspaces` a
    /// fatal flag.
    #[serde(default)]
    pub workspaces: Vec<String>,

    /// Run-wide settings.
    #[serde(default)]
    pub settings: Settings,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            module: default_module(),
            drivers: Vec::new(),
            workspaces: Vec::new(),
            settings: Settings::default(),
        }
    }
}

fn default_module() -> PathBuf {
    PathBuf::from(".")
}

/// One enabled driver: either a bare name or a detailed entry with a project
/// config fragment and extra arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriverEntry {
    /// `- eslint`
    Name(String),
    /// `- name: eslint` with optional `config:` and `args:` keys.
    Detailed {
        name: String,
        /// Project-level config fragment merged over the module template.
        #[serde(default)]
        config: Option<JsonValue>,
        /// Extra arguments appended ahead of CLI passthrough args.
        #[serde(default)]
        args: Vec<String>,
    },
}

impl DriverEntry {
    /// The driver name this entry enables.
    pub fn name(&self) -> &str {
        match self {
            DriverEntry::Name(name) => name,
            DriverEntry::Detailed { name, .. } => name,
        }
    }

    /// The project config fragment, if one was provided.
    pub fn config(&self) -> Option<&JsonValue> {
        match self {
            DriverEntry::Name(_) => None,
            DriverEntry::Detailed { config, .. } => config.as_ref(),
        }
    }

    /// Extra arguments configured for this driver.
    pub fn args(&self) -> &[String] {
        match self {
            DriverEntry::Name(_) => &[],
            DriverEntry::Detailed { args, .. } => args,
        }
    }
}

/// Run-wide settings with serde defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Materialize driver configs in parallel instead of reverse resolution
    /// order. Explicit toggle, never auto-detected.
    #[serde(default = "default_true")]
    pub parallel_configure: bool,

    /// Delete materialized config files when the run finishes.
    #[serde(default = "default_true")]
    pub cleanup: bool,

    /// Worker count for the scheduler's parallel phase; `--concurrency`
    /// overrides this per run.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parallel_configure: true,
            cleanup: true,
            concurrency: default_concurrency(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

/// Parse a YAML string into a `ProjectConfig`.
pub fn parse(content: &str) -> Result<ProjectConfig> {
    serde_yaml::from_str(content).map_err(|err| Error::ConfigParse {
        message: err.to_string(),
    })
}

/// Load and parse the project configuration from a file.
pub fn from_file(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path).map_err(|err| Error::ConfigParse {
        message: format!("Failed to read {}: {}", path.display(), err),
    })?;
    parse(&content)
}

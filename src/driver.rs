//! # Driver Contract
//!
//! A driver wraps one external developer tool: which binary to run, what its
//! configuration file is called, which other drivers it depends on, and how
//! project config fragments merge over the module template.
//!
//! The contract is the `DriverAdapter` trait. Adapters are registered once at
//! startup (see [`crate::registry`]), held as `Arc<dyn DriverAdapter>`, and
//! referenced — never copied — by resolution output and invocations.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::context::RunContext;
use crate::error::Result;
use crate::merge;

/// Static metadata describing one driver. Immutable after registration.
#[derive(Debug, Clone)]
pub struct DriverMetadata {
    /// Unique driver name, used for registry lookup and priority keys.
    pub name: String,
    /// Human-facing title for listings.
    pub title: String,
    /// Binary to execute.
    pub bin: String,
    /// File name of the materialized configuration, written under the
    /// invocation root.
    pub config_name: String,
    /// Names of drivers that must be resolved alongside this one.
    pub dependencies: Vec<String>,
    /// Strip framework-level flags from passthrough args before invoking.
    pub filter_options: bool,
    /// Pass the materialized config path to the tool via `--config`.
    pub use_config_option: bool,
}

impl DriverMetadata {
    /// Metadata with no dependencies and all flags off.
    pub fn new(name: &str, title: &str, bin: &str, config_name: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            bin: bin.to_string(),
            config_name: config_name.to_string(),
            dependencies: Vec::new(),
            filter_options: false,
            use_config_option: false,
        }
    }

    pub fn with_dependencies(mut self, dependencies: &[&str]) -> Self {
        self.dependencies = dependencies.iter().map(|dep| dep.to_string()).collect();
        self
    }

    pub fn with_filter_options(mut self, filter_options: bool) -> Self {
        self.filter_options = filter_options;
        self
    }

    pub fn with_config_option(mut self, use_config_option: bool) -> Self {
        self.use_config_option = use_config_option;
        self
    }
}

/// The capability interface every driver adapter satisfies.
pub trait DriverAdapter: Send + Sync {
    /// Static metadata for this driver.
    fn metadata(&self) -> &DriverMetadata;

    /// The driver's registry name.
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Arguments the driver always passes to its binary, ahead of any
    /// passthrough args.
    fn base_args(&self) -> Vec<String> {
        Vec::new()
    }

    /// Merge a later config fragment over an earlier one.
    ///
    /// The default is a deep merge: nested objects merge recursively,
    /// scalars and arrays are last-writer-wins. Adapters with tool-specific
    /// merge rules override this.
    fn merge_config(&self, prev: JsonValue, next: JsonValue) -> JsonValue {
        merge::deep_merge(prev, next)
    }

    /// Hook invoked after the merged config is assembled and before it is
    /// written. Adapters may mutate the config and register secondary
    /// artifacts (e.g. an ignore file) on the context for cleanup.
    fn on_config_created(
        &self,
        _context: &RunContext,
        _config_path: &Path,
        _config: &mut JsonValue,
    ) -> Result<()> {
        Ok(())
    }
}

/// Shared handle to a registered driver.
pub type DriverRef = Arc<dyn DriverAdapter>;

//! # Error Handling
//!
//! Centralized error handling for `toolbelt`, built on `thiserror`. The
//! `Error` enum covers every anticipated failure mode with enough context
//! (driver names, patterns, captured stderr) to produce actionable messages.
//!
//! Two propagation policies apply, matching how the rest of the crate treats
//! failures:
//!
//! - **Run-invalidating errors** (unknown driver dependency, workspaces
//!   requested but not enabled, malformed driver config) surface immediately
//!   and abort before any tool process is spawned.
//! - **Unit-of-work errors** (one driver's config generation, one package's
//!   invocation) are collected by the component that owns the fan-out and
//!   reported in aggregate after all siblings have finished.
//!
//! The `Result<T>` alias is used throughout the library; the binary converts
//! to `anyhow` at the CLI boundary.

use thiserror::Error;

/// Main error type for toolbelt operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the `.toolbelt.yaml` configuration file.
    #[error("Configuration parsing error: {message}")]
    ConfigParse { message: String },

    /// A driver name was requested (directly or as a dependency) that is not
    /// present in the driver registry.
    #[error("Unknown driver \"{name}\". Make sure it is registered before running.")]
    UnknownDriver { name: String },

    /// A script name was requested that is not present in the script registry.
    #[error("Unknown script \"{name}\". Make sure it is registered before running.")]
    UnknownScript { name: String },

    /// Workspace fan-out was requested but the project configuration declares
    /// no workspace patterns.
    #[error("Option --workspaces={pattern} provided but project is not workspaces enabled.")]
    WorkspacesNotEnabled { pattern: String },

    /// A driver-supplied configuration value had the wrong shape (e.g. a
    /// non-array where an array is required).
    #[error("Invalid config for driver {driver}: {message}")]
    InvalidConfigShape { driver: String, message: String },

    /// A single driver's configuration file could not be produced.
    #[error("Failed to create config file for {driver}: {message}")]
    ConfigGeneration { driver: String, message: String },

    /// An external tool process could not be spawned.
    #[error("Failed to execute {driver}: {message}")]
    DriverExecution { driver: String, message: String },

    /// At least one invocation in the aggregate result set failed.
    ///
    /// The full result sequence is still available to the caller; this error
    /// only carries the failure count for the exit path.
    #[error("Execution failure: {failures} of {total} invocations failed")]
    ExecutionFailure { failures: usize, total: usize },

    /// The execution pool could not be constructed.
    #[error("Scheduler error: {message}")]
    Scheduler { message: String },

    /// A mutex guarding shared run state has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

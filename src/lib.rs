//! # Toolbelt Library
//!
//! This library provides the core functionality for managing per-tool
//! configuration files and orchestrating external developer tools (linters,
//! transpilers, test runners) across a single project or a monorepo of
//! workspace packages. It is designed to be used by the `toolbelt`
//! command-line tool but can also be embedded by applications that register
//! their own drivers and scripts.
//!
//! ## Core Concepts
//!
//! - **Drivers (`driver`, `registry`, `drivers`)**: a driver wraps one
//!   external tool — its binary, config file name, dependencies, and merge
//!   behavior. The registry is a typed plugin map resolved at startup.
//! - **Resolution (`resolver`)**: expands a requested driver into its full
//!   transitive dependency set, ordered, de-duplicated, and cycle-safe.
//! - **Configs (`configure`, `merge`, `cleanup`)**: each resolved driver gets
//!   a temporary merged config file materialized under the run root and
//!   removed again when the run finishes.
//! - **Workspaces (`workspace`)**: discovery of monorepo packages and
//!   pattern-based expansion for fan-out.
//! - **Execution (`invocation`, `scheduler`, `process`, `script`)**: one
//!   invocation per (driver, working directory), partitioned into a serial
//!   priority phase and a concurrency-bounded parallel phase, with per-unit
//!   failure isolation and a merged aggregate result.
//! - **Context (`context`)**: per-run state; workspace fan-out clones it,
//!   overriding only the root.
//! - **Events (`events`)**: an explicit observer registry announcing
//!   resolution, config, and execution milestones.
//!
//! ## Execution Flow
//!
//! A `run` command resolves the requested driver and its dependencies,
//! materializes one config file per resolved driver, expands workspaces when
//! requested, builds one invocation per package (or one for the project
//! root), schedules the batch (priority names run serially first, the rest
//! run in a bounded pool), merges everything into one aggregate result, and
//! finally deletes the materialized config files.

pub mod cleanup;
pub mod config;
pub mod configure;
pub mod context;
pub mod driver;
pub mod drivers;
pub mod error;
pub mod events;
pub mod invocation;
pub mod merge;
pub mod process;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod script;
pub mod workspace;

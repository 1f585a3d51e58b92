//! CLI command implementations
//!
//! Each submodule owns one subcommand: its clap `Args` struct and an
//! `execute` function that wires the library pipeline together and prints
//! human-facing output.

pub mod clean;
pub mod ls;
pub mod run;
pub mod run_script;

/// Split a comma-separated `--priority` value into trimmed, non-empty names.
pub(crate) fn split_names(value: Option<String>) -> Vec<String> {
    value
        .map(|names| {
            names
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

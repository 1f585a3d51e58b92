//! Ls command implementation
//!
//! Lists every registered driver with its metadata, marking the drivers the
//! current project enables.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use toolbelt::config::{self, ProjectConfig, CONFIG_FILE};
use toolbelt::registry::DriverRegistry;

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to the project config file
    #[arg(long, value_name = "PATH", env = "TOOLBELT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the ls command
pub fn execute(args: LsArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let config_path = args.config.unwrap_or_else(|| root.join(CONFIG_FILE));

    // Listing works without a project config; nothing is marked enabled.
    let project = if config_path.exists() {
        config::from_file(&config_path)?
    } else {
        ProjectConfig::default()
    };

    let registry = DriverRegistry::with_builtins();

    for name in registry.names() {
        let driver = registry.get(&name)?;
        let metadata = driver.metadata();
        let enabled = project.drivers.iter().any(|entry| entry.name() == name);

        let marker = if enabled {
            style("●").green()
        } else {
            style("○").dim()
        };

        let mut line = format!(
            "{} {} ({}) -> {}",
            marker,
            style(&metadata.title).bold(),
            metadata.bin,
            metadata.config_name
        );
        if !metadata.dependencies.is_empty() {
            line.push_str(&format!(" [depends on: {}]", metadata.dependencies.join(", ")));
        }
        println!("{}", line);
    }

    Ok(())
}

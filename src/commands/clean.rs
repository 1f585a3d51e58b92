//! Clean command implementation
//!
//! Removes materialized config files left behind by a previous run (e.g.
//! one that disabled cleanup, or was interrupted). Candidate paths are
//! re-derived from the project's enabled drivers, so only files this tool
//! would have created are ever touched.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use toolbelt::cleanup;
use toolbelt::config::{self, Settings, CONFIG_FILE};
use toolbelt::context::RunContext;
use toolbelt::events::{EventBus, LogSubscriber};
use toolbelt::registry::DriverRegistry;

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Path to the project config file
    #[arg(long, value_name = "PATH", env = "TOOLBELT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the clean command
pub fn execute(args: CleanArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let config_path = args.config.unwrap_or_else(|| root.join(CONFIG_FILE));
    if !config_path.exists() {
        anyhow::bail!("Configuration file not found: {}", config_path.display());
    }
    let project = config::from_file(&config_path)?;

    let bus = Arc::new(EventBus::new());
    bus.subscribe(Box::new(LogSubscriber));
    let registry = DriverRegistry::with_builtins();

    let context = RunContext::new(root.clone(), root.join(&project.module));
    for entry in &project.drivers {
        let driver = registry.get(entry.name())?;
        context.add_config_path(root.join(&driver.metadata().config_name))?;
    }

    let candidates = context.config_paths()?;
    let existing = candidates.iter().filter(|path| path.exists()).count();

    // The command is an explicit request, so it ignores `settings.cleanup`.
    cleanup::run(&context, &Settings::default(), &bus)?;

    println!(
        "🧹 Removed {} config file{}",
        style(existing).bold(),
        if existing == 1 { "" } else { "s" }
    );

    Ok(())
}

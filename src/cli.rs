//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Toolbelt - Manage developer tool configs and orchestrate tool execution
#[derive(Parser, Debug)]
#[command(name = "toolbelt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a driver's tool, materializing its config files first
    Run(commands::run::RunArgs),

    /// Run a registered script, with the same workspace fan-out as drivers
    RunScript(commands::run_script::RunScriptArgs),

    /// List registered drivers and their metadata
    Ls(commands::ls::LsArgs),

    /// Remove materialized config files left behind by a previous run
    Clean(commands::clean::CleanArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        match self.command {
            Commands::Run(args) => commands::run::execute(args),
            Commands::RunScript(args) => commands::run_script::execute(args),
            Commands::Ls(args) => commands::ls::execute(args),
            Commands::Clean(args) => commands::clean::execute(args),
        }
    }
}

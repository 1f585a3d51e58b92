//! Run-script command implementation
//!
//! Scripts share the driver pipeline's scheduling and fan-out but skip
//! config materialization: the script is loaded from the typed registry,
//! wrapped in one task per workspace package (or one for the project root),
//! and scheduled with the same priority/concurrency semantics as drivers.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use toolbelt::config::{self, CONFIG_FILE};
use toolbelt::context::RunContext;
use toolbelt::events::{EventBus, LogSubscriber};
use toolbelt::scheduler::{ExecutionScheduler, Task};
use toolbelt::script::{ScriptRegistry, ScriptTask};
use toolbelt::workspace;

/// Arguments for the run-script command
#[derive(Args, Debug)]
pub struct RunScriptArgs {
    /// Name of the script to run
    pub script: String,

    /// Fan out across workspace packages matching this pattern (`*` for all)
    #[arg(long, value_name = "PATTERN")]
    pub workspaces: Option<String>,

    /// Comma-separated task keys to run serially before the rest
    #[arg(long, value_name = "NAMES")]
    pub priority: Option<String>,

    /// Maximum concurrent script runs in the parallel phase
    #[arg(long, value_name = "COUNT")]
    pub concurrency: Option<usize>,

    /// Path to the project config file
    #[arg(long, value_name = "PATH", env = "TOOLBELT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Arguments forwarded to the script through its context
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Execute the run-script command against the given registry.
///
/// The CLI binary starts from an empty registry — scripts are a library
/// surface; embedders register theirs before dispatch.
pub fn execute_with_registry(args: RunScriptArgs, registry: &ScriptRegistry) -> Result<()> {
    let start_time = Instant::now();
    let root = std::env::current_dir()?;

    let config_path = args.config.clone().unwrap_or_else(|| root.join(CONFIG_FILE));
    if !config_path.exists() {
        anyhow::bail!("Configuration file not found: {}", config_path.display());
    }
    let project = config::from_file(&config_path)?;

    let bus = Arc::new(EventBus::new());
    bus.subscribe(Box::new(LogSubscriber));

    let mut context = RunContext::new(root.clone(), root.join(&project.module));
    context.argv = args.args.clone();
    context.workspaces = project.workspaces.clone();
    context.priority = super::split_names(args.priority.clone());
    context.concurrency = args.concurrency;

    if let Some(pattern) = &args.workspaces {
        workspace::ensure_enabled(pattern, &project.workspaces)?;
    }

    let script = registry.load(&args.script, &bus)?;

    let tasks: Vec<Box<dyn Task>> = match &args.workspaces {
        Some(pattern) => {
            let discovered = workspace::discover(&root, &project.workspaces)?;
            workspace::expand(pattern, &discovered)
                .iter()
                .map(|package| -> Box<dyn Task> {
                    Box::new(ScriptTask::new(
                        script.clone(),
                        context.for_workspace(&package.path),
                        package.name.clone(),
                        bus.clone(),
                    ))
                })
                .collect()
        }
        None => vec![Box::new(ScriptTask::new(
            script.clone(),
            context.clone(),
            args.script.clone(),
            bus.clone(),
        ))],
    };

    let concurrency = context.concurrency.unwrap_or(project.settings.concurrency);
    let aggregate = ExecutionScheduler::new(concurrency).schedule(tasks, &context.priority)?;

    for result in &aggregate.results {
        let marker = if result.success {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {} {}", marker, result.key);
        if !result.stdout.is_empty() {
            println!("{}", result.stdout.trim_end());
        }
    }
    for error in &aggregate.errors {
        println!("  {} {}", style("✗").red(), error);
    }

    aggregate.ensure_success()?;

    println!(
        "✅ {} completed in {:.2}s",
        args.script,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Execute the run-script command with the binary's (empty) registry.
pub fn execute(args: RunScriptArgs) -> Result<()> {
    execute_with_registry(args, &ScriptRegistry::new())
}

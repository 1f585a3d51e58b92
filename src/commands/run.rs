//! Run command implementation
//!
//! The run command executes the full driver pipeline:
//! 1. Resolve the requested driver and its transitive dependencies
//! 2. Materialize one merged config file per resolved driver
//! 3. Expand workspace packages when `--workspaces` is given
//! 4. Build one invocation per package (or one for the project root)
//! 5. Schedule: priority invocations serially, the rest in a bounded pool
//! 6. Report the aggregate result and clean up the materialized configs

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use toolbelt::cleanup;
use toolbelt::config::{self, CONFIG_FILE};
use toolbelt::configure;
use toolbelt::context::RunContext;
use toolbelt::events::{EventBus, LogSubscriber};
use toolbelt::invocation::Invocation;
use toolbelt::process::{ProcessRunner, SystemProcessRunner};
use toolbelt::registry::DriverRegistry;
use toolbelt::resolver;
use toolbelt::scheduler::{AggregateResult, ExecutionScheduler, Task};
use toolbelt::workspace;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Name of the driver to run
    pub driver: String,

    /// Fan out across workspace packages matching this pattern (`*` for all)
    #[arg(long, value_name = "PATTERN")]
    pub workspaces: Option<String>,

    /// Comma-separated invocation keys to run serially before the rest
    #[arg(long, value_name = "NAMES")]
    pub priority: Option<String>,

    /// Maximum concurrent invocations in the parallel phase
    #[arg(long, value_name = "COUNT")]
    pub concurrency: Option<usize>,

    /// Path to the project config file
    #[arg(long, value_name = "PATH", env = "TOOLBELT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress per-invocation output
    #[arg(short, long)]
    pub quiet: bool,

    /// Arguments forwarded verbatim to the underlying tool
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Execute the run command
pub fn execute(args: RunArgs) -> Result<()> {
    let start_time = Instant::now();
    let root = std::env::current_dir()?;

    let config_path = args.config.clone().unwrap_or_else(|| root.join(CONFIG_FILE));
    if !config_path.exists() {
        anyhow::bail!("Configuration file not found: {}", config_path.display());
    }
    let project = config::from_file(&config_path)?;

    let bus = Arc::new(EventBus::new());
    bus.subscribe(Box::new(LogSubscriber));
    let registry = DriverRegistry::with_builtins();

    let mut context = RunContext::new(root.clone(), root.join(&project.module));
    context.argv = args.args.clone();
    context.workspaces = project.workspaces.clone();
    context.priority = super::split_names(args.priority.clone());
    context.concurrency = args.concurrency;

    // Fatal configuration checks happen before any config file is written or
    // any process is spawned.
    if let Some(pattern) = &args.workspaces {
        workspace::ensure_enabled(pattern, &project.workspaces)?;
    }

    let resolved = resolver::resolve(&args.driver, &registry, &bus)?;
    configure::materialize_all(&resolved, &project, &context, &bus)?;

    let primary = resolved[0].clone();
    let extra_args: Vec<String> = project
        .drivers
        .iter()
        .find(|entry| entry.name() == args.driver)
        .map(|entry| entry.args().to_vec())
        .unwrap_or_default();
    let runner: Arc<dyn ProcessRunner> = Arc::new(SystemProcessRunner);

    let tasks: Vec<Box<dyn Task>> = match &args.workspaces {
        Some(pattern) => {
            let discovered = workspace::discover(&root, &project.workspaces)?;
            let packages = workspace::expand(pattern, &discovered);

            if packages.is_empty() && !args.quiet {
                println!("No workspace packages matched {}", style(pattern).cyan());
            }

            packages
                .iter()
                .map(|package| -> Box<dyn Task> {
                    Box::new(Invocation::new(
                        primary.clone(),
                        context.for_workspace(&package.path),
                        package.name.clone(),
                        &extra_args,
                        runner.clone(),
                        bus.clone(),
                    ))
                })
                .collect()
        }
        None => vec![Box::new(Invocation::new(
            primary.clone(),
            context.clone(),
            args.driver.clone(),
            &extra_args,
            runner.clone(),
            bus.clone(),
        ))],
    };

    if !args.quiet {
        println!(
            "🔧 Running {} ({} invocation{})",
            style(&args.driver).cyan().bold(),
            tasks.len(),
            if tasks.len() == 1 { "" } else { "s" }
        );
    }

    let concurrency = context.concurrency.unwrap_or(project.settings.concurrency);
    let scheduler = ExecutionScheduler::new(concurrency);
    let aggregate = scheduler.schedule(tasks, &context.priority)?;

    if !args.quiet {
        report(&aggregate);
    }

    // Temp configs are deleted on both success and failure; an execution
    // failure takes precedence over a cleanup error in the exit path.
    let cleaned = cleanup::run(&context, &project.settings, &bus);
    aggregate.ensure_success()?;
    cleaned?;

    if !args.quiet {
        println!(
            "✅ {} completed in {:.2}s",
            args.driver,
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Print one line per invocation, with captured output for failures.
fn report(aggregate: &AggregateResult) {
    for result in &aggregate.results {
        if result.success {
            println!(
                "  {} {} ({:.2}s)",
                style("✓").green(),
                result.key,
                result.elapsed.as_secs_f64()
            );
        } else {
            println!(
                "  {} {} exited with code {} ({:.2}s)",
                style("✗").red(),
                result.key,
                result.exit_code,
                result.elapsed.as_secs_f64()
            );
            if !result.stdout.is_empty() {
                println!("{}", result.stdout.trim_end());
            }
            if !result.stderr.is_empty() {
                eprintln!("{}", result.stderr.trim_end());
            }
        }
    }
    for error in &aggregate.errors {
        println!("  {} {}", style("✗").red(), error);
    }
}

//! # Run Invocation
//!
//! One concrete execution of a driver's binary against one working
//! directory. The argument vector is computed once at construction: the
//! driver's base args, then project-configured extras, then the CLI
//! passthrough args (with framework-level flags filtered out when the
//! driver asks for it), and finally the `--config` pointer for drivers that
//! take their config path as an option.
//!
//! Execution emits the three lifecycle notifications around the process
//! call — before-execute, after-execute on a zero exit, failed-execute on a
//! non-zero exit or spawn error. A spawn error propagates to the scheduler;
//! it is never swallowed here.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::RunContext;
use crate::driver::DriverRef;
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::process::ProcessRunner;
use crate::scheduler::Task;

/// Flags owned by toolbelt itself, stripped from passthrough args for
/// drivers that set `filter_options`.
const FRAMEWORK_FLAGS: &[&str] = &["--workspaces", "--priority", "--concurrency"];

/// Outcome of one invocation.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Grouping key: the driver name, or the package name under fan-out.
    pub key: String,
    pub exit_code: i32,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Remove framework-level flags (both `--flag value` and `--flag=value`
/// forms) from a passthrough argument vector.
pub fn filter_framework_args(argv: &[String]) -> Vec<String> {
    let mut filtered = Vec::with_capacity(argv.len());
    let mut skip_value = false;

    for arg in argv {
        if skip_value {
            skip_value = false;
            continue;
        }

        if FRAMEWORK_FLAGS.contains(&arg.as_str()) {
            skip_value = true;
            continue;
        }
        if FRAMEWORK_FLAGS
            .iter()
            .any(|flag| arg.starts_with(&format!("{}=", flag)))
        {
            continue;
        }

        filtered.push(arg.clone());
    }

    filtered
}

/// One (driver, context) pair with a computed argument vector and working
/// directory. Executed exactly once, never retried.
pub struct Invocation {
    driver: DriverRef,
    context: RunContext,
    key: String,
    argv: Vec<String>,
    runner: Arc<dyn ProcessRunner>,
    bus: Arc<EventBus>,
}

impl Invocation {
    /// Build an invocation, computing the final argument vector.
    ///
    /// `extra_args` come from the project's driver entry and sit between the
    /// driver's base args and the passthrough args.
    pub fn new(
        driver: DriverRef,
        context: RunContext,
        key: String,
        extra_args: &[String],
        runner: Arc<dyn ProcessRunner>,
        bus: Arc<EventBus>,
    ) -> Self {
        let metadata = driver.metadata();

        let mut argv = driver.base_args();
        argv.extend(extra_args.iter().cloned());

        if metadata.filter_options {
            argv.extend(filter_framework_args(&context.argv));
        } else {
            argv.extend(context.argv.iter().cloned());
        }

        if metadata.use_config_option {
            // Fan-out invocations point back at the config materialized in
            // the project root, not the package directory.
            argv.push("--config".to_string());
            argv.push(
                context
                    .workspace_root
                    .join(&metadata.config_name)
                    .to_string_lossy()
                    .into_owned(),
            );
        }

        Self {
            driver,
            context,
            key,
            argv,
            runner,
            bus,
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn working_dir(&self) -> &Path {
        &self.context.root
    }
}

impl Task for Invocation {
    fn key(&self) -> &str {
        &self.key
    }

    fn run(&self) -> Result<ExecutionResult> {
        let metadata = self.driver.metadata();
        let name = metadata.name.clone();

        log::debug!(
            "Executing {} {} in {}",
            metadata.bin,
            self.argv.join(" "),
            console::style(self.context.root.display()).cyan()
        );

        self.bus.emit(Event::BeforeExecute {
            name: name.clone(),
            argv: self.argv.clone(),
        });

        let started = Instant::now();
        let output = match self.runner.run(&metadata.bin, &self.argv, &self.context.root) {
            Ok(output) => output,
            Err(err) => {
                self.bus.emit(Event::FailedExecute {
                    name,
                    message: err.to_string(),
                });
                return Err(err);
            }
        };
        let elapsed = started.elapsed();

        if output.success {
            self.bus.emit(Event::AfterExecute {
                name,
                exit_code: output.exit_code,
            });
        } else {
            self.bus.emit(Event::FailedExecute {
                name,
                message: format!("{} exited with code {}", metadata.bin, output.exit_code),
            });
        }

        Ok(ExecutionResult {
            key: self.key.clone(),
            exit_code: output.exit_code,
            success: output.success,
            stdout: output.stdout,
            stderr: output.stderr,
            elapsed,
        })
    }
}

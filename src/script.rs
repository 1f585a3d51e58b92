//! # Script Execution
//!
//! Scripts are project-defined units of logic that run in-process rather
//! than as external binaries, but flow through the same scheduling pipeline
//! as driver invocations. The registry is a typed plugin mapping resolved at
//! startup: library consumers register implementations of `Script` by name,
//! and the `run-script` command looks them up at dispatch time.
//!
//! Under workspace fan-out a script runs once per package against a cloned
//! context whose root points at that package — the same clone-and-override
//! mechanism used for driver invocations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::events::{Event, EventBus};
use crate::invocation::ExecutionResult;
use crate::scheduler::Task;

/// A named, in-process unit of work.
pub trait Script: Send + Sync {
    /// Registry name, matched against the `run-script` argument.
    fn name(&self) -> &str;

    /// Execute against the given context; the returned string becomes the
    /// captured stdout of the execution result.
    fn run(&self, context: &RunContext) -> Result<String>;
}

/// Typed plugin registry mapping script names to implementations.
#[derive(Default)]
pub struct ScriptRegistry {
    scripts: HashMap<String, Arc<dyn Script>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script under its own name.
    pub fn register(&mut self, script: Arc<dyn Script>) {
        self.scripts.insert(script.name().to_string(), script);
    }

    /// Resolve a script by name, announcing the load.
    pub fn load(&self, name: &str, bus: &EventBus) -> Result<Arc<dyn Script>> {
        let script = self
            .scripts
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownScript {
                name: name.to_string(),
            })?;
        bus.emit(Event::LoadScript {
            name: name.to_string(),
        });
        Ok(script)
    }

    /// Whether a script with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }
}

/// Adapter placing one script run into the scheduler's task model.
pub struct ScriptTask {
    script: Arc<dyn Script>,
    context: RunContext,
    key: String,
    bus: Arc<EventBus>,
}

impl ScriptTask {
    /// `key` is the script name, or the package name under fan-out.
    pub fn new(
        script: Arc<dyn Script>,
        context: RunContext,
        key: String,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            script,
            context,
            key,
            bus,
        }
    }
}

impl Task for ScriptTask {
    fn key(&self) -> &str {
        &self.key
    }

    fn run(&self) -> Result<ExecutionResult> {
        let name = self.script.name().to_string();

        self.bus.emit(Event::BeforeExecute {
            name: name.clone(),
            argv: self.context.argv.clone(),
        });

        let started = Instant::now();
        match self.script.run(&self.context) {
            Ok(output) => {
                self.bus.emit(Event::AfterExecute {
                    name,
                    exit_code: 0,
                });
                Ok(ExecutionResult {
                    key: self.key.clone(),
                    exit_code: 0,
                    success: true,
                    stdout: output,
                    stderr: String::new(),
                    elapsed: started.elapsed(),
                })
            }
            Err(err) => {
                self.bus.emit(Event::FailedExecute {
                    name,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

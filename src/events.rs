//! # Lifecycle Events
//!
//! Components announce run milestones (dependency resolution, config file
//! creation and deletion, tool execution) through an explicit observer
//! registry rather than hidden global state. The `EventBus` is created once
//! per run, shared by `Arc`, and passed by reference to every component that
//! emits; external collaborators (logging, telemetry) implement `Subscriber`
//! and register themselves before the run starts.
//!
//! Event names follow a dotted convention so that driver-scoped events read
//! as `eslint.before-execute`, `eslint.after-execute`, and so on.

use std::path::PathBuf;
use std::sync::RwLock;

/// A lifecycle notification emitted during a run.
#[derive(Debug, Clone)]
pub enum Event {
    /// Dependency resolution finished; carries the ordered driver names.
    ResolveDependencies { drivers: Vec<String> },

    /// A tool is about to be executed with the given arguments.
    BeforeExecute { name: String, argv: Vec<String> },

    /// A tool finished with a zero exit status.
    AfterExecute { name: String, exit_code: i32 },

    /// A tool exited non-zero or could not be spawned.
    FailedExecute { name: String, message: String },

    /// A merged configuration file was written for a driver.
    CreateConfigFile { driver: String, path: PathBuf },

    /// A materialized configuration file was removed during cleanup.
    DeleteConfigFile { path: PathBuf },

    /// A script was resolved from the script registry.
    LoadScript { name: String },
}

impl Event {
    /// The dotted event name, e.g. `eslint.before-execute` or
    /// `create-config-file`.
    pub fn name(&self) -> String {
        match self {
            Event::ResolveDependencies { .. } => "resolve-dependencies".to_string(),
            Event::BeforeExecute { name, .. } => format!("{}.before-execute", name),
            Event::AfterExecute { name, .. } => format!("{}.after-execute", name),
            Event::FailedExecute { name, .. } => format!("{}.failed-execute", name),
            Event::CreateConfigFile { .. } => "create-config-file".to_string(),
            Event::DeleteConfigFile { .. } => "delete-config-file".to_string(),
            Event::LoadScript { .. } => "load-script".to_string(),
        }
    }
}

/// An observer of run lifecycle events.
pub trait Subscriber: Send + Sync {
    /// Called for every emitted event, in emission order per thread.
    fn on_event(&self, event: &Event);
}

/// Registry of subscribers that fan each emitted event out to all observers.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Box<dyn Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Subscribers added after emission starts only
    /// see subsequent events.
    pub fn subscribe(&self, subscriber: Box<dyn Subscriber>) {
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.push(subscriber);
        }
    }

    /// Deliver an event to every registered subscriber.
    ///
    /// Emission never fails: a poisoned registry is treated as empty so a
    /// panicking subscriber on another thread cannot wedge the run.
    pub fn emit(&self, event: Event) {
        if let Ok(subscribers) = self.subscribers.read() {
            for subscriber in subscribers.iter() {
                subscriber.on_event(&event);
            }
        }
    }
}

/// Forwards every event to the `log` crate at debug level.
pub struct LogSubscriber;

impl Subscriber for LogSubscriber {
    fn on_event(&self, event: &Event) {
        match event {
            Event::ResolveDependencies { drivers } => {
                log::debug!("[resolve-dependencies] {}", drivers.join(", "));
            }
            Event::BeforeExecute { name, argv } => {
                log::debug!("[{}.before-execute] {}", name, argv.join(" "));
            }
            Event::AfterExecute { name, exit_code } => {
                log::debug!("[{}.after-execute] exit {}", name, exit_code);
            }
            Event::FailedExecute { name, message } => {
                log::warn!("[{}.failed-execute] {}", name, message);
            }
            Event::CreateConfigFile { driver, path } => {
                log::debug!("[create-config-file] {} -> {}", driver, path.display());
            }
            Event::DeleteConfigFile { path } => {
                log::debug!("[delete-config-file] {}", path.display());
            }
            Event::LoadScript { name } => {
                log::debug!("[load-script] {}", name);
            }
        }
    }
}

//! # Driver Registry
//!
//! A typed plugin registry mapping driver names to adapter instances,
//! resolved at startup. Built-in adapters cover the bundled tools; library
//! consumers and tests register their own through `register`.
//!
//! Looking up a name that was never registered is a configuration error
//! (`Error::UnknownDriver`) — the registry is the single authority on which
//! drivers exist, for both direct requests and transitive dependencies.

use std::collections::HashMap;

use crate::driver::DriverRef;
use crate::drivers;
use crate::error::{Error, Result};

/// The set of known drivers and their static metadata.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: HashMap<String, DriverRef>,
}

impl DriverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in adapters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for driver in drivers::builtins() {
            registry.register(driver);
        }
        registry
    }

    /// Register a driver under its metadata name. A later registration with
    /// the same name replaces the earlier one.
    pub fn register(&mut self, driver: DriverRef) {
        self.drivers.insert(driver.name().to_string(), driver);
    }

    /// Look up a driver by name.
    pub fn get(&self, name: &str) -> Result<DriverRef> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownDriver {
                name: name.to_string(),
            })
    }

    /// Whether a driver with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Sorted names of all registered drivers.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.keys().cloned().collect();
        names.sort();
        names
    }
}

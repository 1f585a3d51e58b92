//! Mocha driver adapter

use crate::driver::{DriverAdapter, DriverMetadata};

pub struct MochaDriver {
    metadata: DriverMetadata,
}

impl MochaDriver {
    pub fn new() -> Self {
        Self {
            // Test files are transpiled on the fly, so the babel driver's
            // config must be materialized alongside mocha's own.
            metadata: DriverMetadata::new("mocha", "Mocha", "mocha", ".mocharc.json")
                .with_dependencies(&["babel"])
                .with_filter_options(true),
        }
    }
}

impl Default for MochaDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverAdapter for MochaDriver {
    fn metadata(&self) -> &DriverMetadata {
        &self.metadata
    }
}

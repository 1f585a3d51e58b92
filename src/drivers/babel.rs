//! Babel driver adapter

use crate::driver::{DriverAdapter, DriverMetadata};

pub struct BabelDriver {
    metadata: DriverMetadata,
}

impl BabelDriver {
    pub fn new() -> Self {
        Self {
            metadata: DriverMetadata::new("babel", "Babel", "babel", ".babelrc"),
        }
    }
}

impl Default for BabelDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverAdapter for BabelDriver {
    fn metadata(&self) -> &DriverMetadata {
        &self.metadata
    }
}

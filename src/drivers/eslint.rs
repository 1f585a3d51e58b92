//! ESLint driver adapter
//!
//! Success: writes nothing to stdout or stderr. Failure: writes lint
//! violations to stdout.

use std::path::Path;

use serde_json::Value as JsonValue;

use crate::context::RunContext;
use crate::driver::{DriverAdapter, DriverMetadata};
use crate::error::{Error, Result};

pub struct EslintDriver {
    metadata: DriverMetadata,
}

impl EslintDriver {
    pub fn new() -> Self {
        Self {
            metadata: DriverMetadata::new("eslint", "ESLint", "eslint", ".eslintrc.json")
                .with_filter_options(true),
        }
    }
}

impl Default for EslintDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverAdapter for EslintDriver {
    fn metadata(&self) -> &DriverMetadata {
        &self.metadata
    }

    /// When the merged config carries an `ignore` list, materialize it as an
    /// `.eslintignore` file beside the config and strip the key — ESLint
    /// rejects unknown top-level keys in its config file.
    fn on_config_created(
        &self,
        context: &RunContext,
        config_path: &Path,
        config: &mut JsonValue,
    ) -> Result<()> {
        let Some(ignore) = config.get("ignore") else {
            return Ok(());
        };

        let Some(patterns) = ignore.as_array() else {
            return Err(Error::InvalidConfigShape {
                driver: self.metadata.name.clone(),
                message: "\"ignore\" must be an array of file patterns".to_string(),
            });
        };

        let mut lines = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let Some(line) = pattern.as_str() else {
                return Err(Error::InvalidConfigShape {
                    driver: self.metadata.name.clone(),
                    message: "\"ignore\" must be an array of file patterns".to_string(),
                });
            };
            lines.push(line.to_string());
        }

        let ignore_path = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(".eslintignore");
        std::fs::write(&ignore_path, lines.join("\n"))?;

        // Register it so cleanup removes it with the config file.
        context.add_config_path(ignore_path)?;

        if let Some(map) = config.as_object_mut() {
            map.remove("ignore");
        }

        Ok(())
    }
}

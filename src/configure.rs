//! # Config Materialization
//!
//! Produces one temporary configuration file per resolved driver: the
//! module-provided template (`<module_root>/configs/<name>.yaml`) merged
//! with the project's fragment for that driver, run through the driver's
//! `on_config_created` hook, and written as JSON under the run root. Every
//! produced path is registered on the run context so cleanup can remove
//! exactly what this run created.
//!
//! Ordering is an explicit configuration toggle, never auto-detected:
//!
//! - **Serial** (`parallel_configure: false`): drivers are processed in
//!   *reverse* resolution order, so dependencies materialize before the
//!   drivers that depend on them, and the first failure aborts the phase.
//! - **Parallel** (`parallel_configure: true`): drivers materialize
//!   concurrently; a failure does not abort siblings. Failures are collected
//!   and the phase reports the first one only after every attempt has
//!   finished. When two drivers target the same path, the last writer wins
//!   and the order is undefined.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;
use serde_json::Value as JsonValue;

use crate::config::ProjectConfig;
use crate::context::RunContext;
use crate::driver::DriverRef;
use crate::error::{Error, Result};
use crate::events::{Event, EventBus};
use crate::resolver::ResolvedDriverSet;

/// Materialize the merged configuration file for a single driver.
pub fn materialize(
    driver: &DriverRef,
    fragment: Option<&JsonValue>,
    context: &RunContext,
    bus: &EventBus,
) -> Result<PathBuf> {
    let metadata = driver.metadata();

    let template = load_template(&context.module_root, &metadata.name)?;
    let mut config = match fragment {
        Some(fragment) => driver.merge_config(template, fragment.clone()),
        None => template,
    };

    let config_path = context.root.join(&metadata.config_name);
    driver.on_config_created(context, &config_path, &mut config)?;

    let serialized =
        serde_json::to_string_pretty(&config).map_err(|err| Error::ConfigGeneration {
            driver: metadata.name.clone(),
            message: err.to_string(),
        })?;
    std::fs::write(&config_path, serialized).map_err(|err| Error::ConfigGeneration {
        driver: metadata.name.clone(),
        message: format!("{}: {}", config_path.display(), err),
    })?;

    context.add_config_path(config_path.clone())?;
    log::debug!(
        "Created config file {}",
        console::style(config_path.display()).cyan()
    );
    bus.emit(Event::CreateConfigFile {
        driver: metadata.name.clone(),
        path: config_path.clone(),
    });

    Ok(config_path)
}

/// Materialize config files for every driver in a resolved set.
///
/// Project fragments are looked up by driver name from the `drivers:` list.
/// Returns the produced paths in processing order.
pub fn materialize_all(
    resolved: &ResolvedDriverSet,
    project: &ProjectConfig,
    context: &RunContext,
    bus: &EventBus,
) -> Result<Vec<PathBuf>> {
    let fragment_for = |name: &str| {
        project
            .drivers
            .iter()
            .find(|entry| entry.name() == name)
            .and_then(|entry| entry.config())
    };

    if project.settings.parallel_configure {
        // Every driver gets an attempt; the first collected error is
        // reported once all attempts have finished.
        let errors: Mutex<Vec<Error>> = Mutex::new(Vec::new());
        let paths: Vec<PathBuf> = resolved
            .par_iter()
            .filter_map(|driver| {
                match materialize(driver, fragment_for(driver.name()), context, bus) {
                    Ok(path) => Some(path),
                    Err(err) => {
                        errors.lock().unwrap().push(err);
                        None
                    }
                }
            })
            .collect();

        let collected = errors.into_inner().unwrap();
        if let Some(first_error) = collected.into_iter().next() {
            return Err(first_error);
        }
        return Ok(paths);
    }

    // Serial: dependencies first (reverse resolution order), abort on the
    // first failure.
    let mut paths = Vec::with_capacity(resolved.len());
    for driver in resolved.iter().rev() {
        paths.push(materialize(
            driver,
            fragment_for(driver.name()),
            context,
            bus,
        )?);
    }
    Ok(paths)
}

/// Load a driver's config template from the module root, or an empty object
/// when the module provides none.
fn load_template(module_root: &Path, name: &str) -> Result<JsonValue> {
    let path = module_root.join("configs").join(format!("{}.yaml", name));
    if !path.exists() {
        return Ok(JsonValue::Object(serde_json::Map::new()));
    }

    let content = std::fs::read_to_string(&path).map_err(|err| Error::ConfigGeneration {
        driver: name.to_string(),
        message: format!("{}: {}", path.display(), err),
    })?;
    serde_yaml::from_str(&content).map_err(|err| Error::ConfigGeneration {
        driver: name.to_string(),
        message: format!("{}: {}", path.display(), err),
    })
}

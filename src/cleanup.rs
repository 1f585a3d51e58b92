//! # Cleanup Coordination
//!
//! Removes the temporary config files a run materialized, keyed by the same
//! context that created them: only paths registered in the context's
//! config-path set are ever touched, so pre-existing files are safe by
//! construction.
//!
//! Cleanup is idempotent — a path that is already gone is not an error, so
//! running cleanup twice (or after a partially failed run) is safe. The
//! whole pass is skipped when the project disables it via
//! `settings.cleanup: false`.

use crate::config::Settings;
use crate::context::RunContext;
use crate::error::Result;
use crate::events::{Event, EventBus};

/// Delete every config file recorded on the context.
pub fn run(context: &RunContext, settings: &Settings, bus: &EventBus) -> Result<()> {
    if !settings.cleanup {
        log::debug!("Cleanup disabled by configuration, keeping config files");
        return Ok(());
    }

    for path in context.config_paths()? {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::debug!(
                    "Deleted config file {}",
                    console::style(path.display()).cyan()
                );
                bus.emit(Event::DeleteConfigFile { path });
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

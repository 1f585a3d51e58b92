//! # Dependency Resolution
//!
//! Expands a requested driver into its full transitive dependency set:
//! ordered, de-duplicated, and cycle-safe.
//!
//! The expansion is a breadth-first fixed point over an insertion-ordered
//! set. The requested driver goes in first; then, walking the set in
//! insertion order, each member's declared dependency names are looked up in
//! the registry and appended if not already present. The walk ends when no
//! member introduces an absent dependency. This gives the guarantees the
//! rest of the pipeline relies on:
//!
//! - the primary driver is always first;
//! - a dependency never appears before it was discovered;
//! - a diamond (two parents sharing a dependency) resolves once, at its
//!   first-discovery position;
//! - a cycle stops expanding once all of its members are present —
//!   membership is checked before insertion, so growth is bounded.
//!
//! An unregistered dependency name is fatal and surfaces immediately; no
//! partial set is returned.

use std::collections::HashSet;

use crate::driver::DriverRef;
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::registry::DriverRegistry;

/// An ordered, duplicate-free sequence of resolved drivers.
pub type ResolvedDriverSet = Vec<DriverRef>;

/// Resolve `root_name` and every driver transitively reachable through
/// declared dependencies.
///
/// Emits `resolve-dependencies` with the final ordered name list once the
/// fixed point is reached.
pub fn resolve(
    root_name: &str,
    registry: &DriverRegistry,
    bus: &EventBus,
) -> Result<ResolvedDriverSet> {
    let root = registry.get(root_name)?;

    let mut resolved: ResolvedDriverSet = vec![root];
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(root_name.to_string());

    // Walk the set as it grows; `index` chases the tail like a queue cursor.
    let mut index = 0;
    while index < resolved.len() {
        let dependencies = resolved[index].metadata().dependencies.clone();

        for dependency in dependencies {
            if seen.contains(&dependency) {
                continue;
            }
            let driver = registry.get(&dependency)?;
            seen.insert(dependency);
            resolved.push(driver);
        }

        index += 1;
    }

    let names: Vec<String> = resolved
        .iter()
        .map(|driver| driver.name().to_string())
        .collect();
    log::debug!("Resolved drivers: {}", names.join(" -> "));
    bus.emit(Event::ResolveDependencies { drivers: names });

    Ok(resolved)
}

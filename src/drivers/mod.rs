//! Built-in driver adapters
//!
//! Each adapter describes one external tool: its binary, config file name,
//! dependency drivers, and any tool-specific config handling. Projects that
//! wrap additional tools implement `DriverAdapter` themselves and register
//! through `DriverRegistry::register`.

pub mod babel;
pub mod eslint;
pub mod mocha;

use std::sync::Arc;

use crate::driver::DriverRef;

/// All bundled adapters, in no particular order.
pub fn builtins() -> Vec<DriverRef> {
    vec![
        Arc::new(eslint::EslintDriver::new()),
        Arc::new(mocha::MochaDriver::new()),
        Arc::new(babel::BabelDriver::new()),
    ]
}

//! # External Process Execution
//!
//! Process spawning sits behind the `ProcessRunner` trait so the rest of the
//! engine treats it as a capability: run a binary in a working directory
//! with arguments, get back an exit status and captured streams. The default
//! implementation shells out with `std::process::Command`; tests substitute
//! doubles that record calls or script outcomes without spawning anything.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Captured outcome of one external process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code; -1 when the process was terminated by a signal.
    pub exit_code: i32,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Capability to run an external command. Allows mocking in tests.
pub trait ProcessRunner: Send + Sync {
    /// Run `bin` with `args` in `cwd`, waiting for completion and capturing
    /// both output streams.
    ///
    /// A non-zero exit is a successful *call* (the output carries the
    /// status); only a failure to spawn is an `Err`.
    fn run(&self, bin: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput>;
}

/// The default implementation, spawning real processes via
/// `std::process::Command`.
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, bin: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput> {
        let output = Command::new(bin)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|err| Error::DriverExecution {
                driver: bin.to_string(),
                message: err.to_string(),
            })?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

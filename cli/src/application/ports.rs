//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{ProvisionConfig, Step, StepResult};

// ── Execution Port ────────────────────────────────────────────────────────────

/// Runs one step against the execution context (local shell or SSH session).
#[allow(async_fn_in_trait)]
pub trait StepExecutor {
    /// Execute `step` and capture its output.
    ///
    /// Never fails: spawn, I/O and channel errors are folded into a failed
    /// [`StepResult`] whose stderr carries the cause. The caller decides
    /// whether the failure is fatal.
    async fn execute(&self, step: &Step) -> StepResult;
}

// ── Prompt Port ───────────────────────────────────────────────────────────────

/// Interactive questions asked by the input collector.
pub trait Prompter {
    /// Pick one of `items`; returns the chosen index.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails or no choice can be made.
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Free-text answer, pre-filled with `initial` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails or no value is available.
    fn input(&self, field: &'static str, prompt: &str, initial: Option<&str>) -> Result<String>;

    /// Hidden answer (passwords).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails or no value is available.
    fn password(&self, field: &'static str, prompt: &str) -> Result<String>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// A phase with `steps` steps is starting.
    fn phase(&self, title: &str, steps: usize);
    /// Step `index` (1-based) of `total` is about to run `command`.
    fn step(&self, index: usize, total: usize, command: &str);
    /// Captured stdout of a step (only called in verbose mode).
    fn output(&self, stdout: &str);
    /// A step failed; the run is about to abort.
    fn failure(&self, command: &str, result: &StepResult);
    /// Operator hint derived from a step's output.
    fn hint(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading of the provisioning configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<ProvisionConfig>;

    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

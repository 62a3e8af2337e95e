//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so the runner can emit progress events without depending on any
//! presentation type directly.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::domain::StepResult;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `phase()` prints a bold header (suppressed when `ctx.quiet`)
/// - `step()` prints `"  → [i/n] {command}"` (suppressed when `ctx.quiet`)
/// - `failure()` and `hint()` go to stderr and are never suppressed
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn phase(&self, title: &str, steps: usize) {
        if !self.ctx.quiet {
            println!();
            println!(
                "  {} {}",
                title.style(self.ctx.styles.header),
                format!("({steps} steps)").style(self.ctx.styles.dim)
            );
        }
    }

    fn step(&self, index: usize, total: usize, command: &str) {
        if !self.ctx.quiet {
            println!(
                "  {} {} {command}",
                "→".style(self.ctx.styles.step),
                format!("[{index}/{total}]").style(self.ctx.styles.dim)
            );
        }
    }

    fn output(&self, stdout: &str) {
        self.ctx.block(stdout, false);
    }

    fn failure(&self, command: &str, result: &StepResult) {
        let code = result
            .exit_code
            .map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"));
        self.ctx.error(&format!("command failed ({code}): {command}"));
        if !result.stdout.trim().is_empty() {
            eprintln!("  {}", "stdout:".style(self.ctx.styles.bold));
            self.ctx.block(&result.stdout, true);
        }
        if !result.stderr.trim().is_empty() {
            eprintln!("  {}", "stderr:".style(self.ctx.styles.bold));
            self.ctx.block(&result.stderr, true);
        }
    }

    fn hint(&self, message: &str) {
        eprintln!("  {} {message}", "hint:".style(self.ctx.styles.info));
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }
}

//! Application service: sequential, fail-fast plan runner.
//!
//! Each step is awaited before the next one is issued. The first failing
//! step aborts the run; nothing is rolled back.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::application::ports::{ProgressReporter, StepExecutor};
use crate::domain::{Plan, RunError, StepResult};

/// Marker printed by sshd-backed shells when the account password expired.
pub const PASSWORD_CHANGE_MARKER: &str = "Password change required but no TTY available";

/// Hint shown when [`PASSWORD_CHANGE_MARKER`] appears in a step's stderr.
pub const PASSWORD_CHANGE_HINT: &str =
    "SSH into the server, change the password when asked, then run movpn again.";

/// Runner behaviour flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Echo captured stdout of every step. Never changes control flow.
    pub verbose: bool,
}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Number of steps executed.
    pub executed: usize,
    /// Tolerant steps that failed and were skipped over.
    pub tolerated: Vec<String>,
    /// Client config paths produced by the plan.
    pub artifacts: Vec<String>,
}

/// Execute every step of `plan` in order.
///
/// # Errors
///
/// Returns [`RunError::StepFailed`] for the first failing step that does not
/// tolerate failure. Later steps are not executed.
pub async fn run_plan(
    executor: &impl StepExecutor,
    plan: &Plan,
    reporter: &impl ProgressReporter,
    opts: RunOptions,
) -> Result<RunReport> {
    let started_at = Utc::now();
    let clock = Instant::now();
    let total = plan.len();
    let mut executed = 0;
    let mut tolerated = Vec::new();

    tracing::info!(profile = %plan.profile, steps = total, "starting run");

    for phase in &plan.phases {
        reporter.phase(&phase.title, phase.steps.len());
        for step in &phase.steps {
            executed += 1;
            let command = step.display();
            tracing::debug!(phase = %phase.title, step = executed, command = %command, "running step");
            reporter.step(executed, total, &command);

            let result = executor.execute(step).await;
            inspect_output(&result, reporter, opts);

            if result.success {
                continue;
            }
            if step.ignores_failure() {
                tracing::debug!(command = %command, code = ?result.exit_code, "tolerated step failed");
                reporter.warn(&format!("ignored failure of `{command}`"));
                tolerated.push(command);
                continue;
            }

            tracing::debug!(
                phase = %phase.title,
                command = %command,
                code = ?result.exit_code,
                "step failed, aborting run",
            );
            reporter.failure(&command, &result);
            if !phase.revert.is_empty() {
                reporter.warn(&format!(
                    "rollback not performed: {} revert step(s) of '{}' were not run",
                    phase.revert.len(),
                    phase.title
                ));
            }
            return Err(RunError::StepFailed {
                phase: phase.title.clone(),
                command,
            }
            .into());
        }
    }

    let elapsed = clock.elapsed();
    tracing::info!(steps = executed, elapsed_ms = elapsed.as_millis(), "run finished");
    reporter.success(&format!(
        "{} finished: {executed} step(s) in {:.1}s",
        plan.profile.title(),
        elapsed.as_secs_f64()
    ));

    Ok(RunReport {
        started_at,
        elapsed,
        executed,
        tolerated,
        artifacts: plan.artifacts.clone(),
    })
}

fn inspect_output(result: &StepResult, reporter: &impl ProgressReporter, opts: RunOptions) {
    if opts.verbose && !result.stdout.trim().is_empty() {
        reporter.output(&result.stdout);
    }
    if result.stderr.contains(PASSWORD_CHANGE_MARKER) {
        reporter.hint(PASSWORD_CHANGE_HINT);
    }
}

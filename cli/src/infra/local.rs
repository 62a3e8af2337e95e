//! Infrastructure implementation of the `StepExecutor` port for this machine.
//!
//! `LocalExecutor` runs every step as `<shell> -c <command>` with tokio,
//! capturing stdout and stderr. There is no timeout: a hung command blocks
//! the run until the operator interrupts it.

use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};

use crate::application::ports::StepExecutor;
use crate::domain::{Endpoint, ShellCommand, Step, StepResult, rewrite_remote_lines};

/// Production `StepExecutor` for local subprocesses.
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    shell: String,
}

impl LocalExecutor {
    #[must_use]
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    fn command(&self, cmd: &ShellCommand) -> Command {
        let mut command = Command::new(&self.shell);
        command
            .arg("-c")
            .arg(&cmd.command)
            .current_dir(&cmd.cwd)
            .stdin(if cmd.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    fn spawn(&self, cmd: &ShellCommand) -> Result<Child> {
        self.command(cmd)
            .spawn()
            .with_context(|| format!("failed to spawn {} in {}", self.shell, cmd.cwd))
    }

    async fn run(&self, cmd: &ShellCommand) -> Result<StepResult> {
        let child = self.spawn(cmd)?;
        let output = wait_with_input(child, cmd.stdin.as_deref()).await?;
        Ok(to_result(&output))
    }

    async fn run_piped(&self, producer: &ShellCommand, consumer: &ShellCommand) -> Result<StepResult> {
        let mut upstream = self.spawn(producer)?;
        let pipe: Stdio = upstream
            .stdout
            .take()
            .context("producer stdout not captured")?
            .try_into()
            .context("cannot hand producer stdout to consumer")?;

        let downstream = self
            .command(consumer)
            .stdin(pipe)
            .spawn()
            .with_context(|| format!("failed to spawn {} in {}", self.shell, consumer.cwd))?;

        let (up, down) = tokio::try_join!(
            wait_with_input(upstream, producer.stdin.as_deref()),
            wait_with_input(downstream, None),
        )?;

        let mut result = to_result(&down);
        if !up.status.success() {
            result.success = false;
            result.exit_code = up.status.code();
        }
        let up_stderr = String::from_utf8_lossy(&up.stderr);
        if !up_stderr.is_empty() {
            result.stderr = format!("{up_stderr}{}", result.stderr);
        }
        Ok(result)
    }

    async fn run_redirected(&self, cmd: &ShellCommand, output: &str) -> Result<StepResult> {
        let child = self.spawn(cmd)?;
        let out = wait_with_input(child, cmd.stdin.as_deref()).await?;
        let mut result = to_result(&out);
        if result.success {
            tokio::fs::write(output, &out.stdout)
                .await
                .with_context(|| format!("cannot write {output}"))?;
            tracing::debug!(path = %output, bytes = out.stdout.len(), "wrote redirected output");
            result.stdout.clear();
        }
        Ok(result)
    }
}

impl StepExecutor for LocalExecutor {
    async fn execute(&self, step: &Step) -> StepResult {
        let outcome = match step {
            Step::Literal(cmd) => self.run(cmd).await,
            Step::Piped { producer, consumer } => self.run_piped(producer, consumer).await,
            Step::Redirected { command, output } => self.run_redirected(command, output).await,
            Step::RewriteRemote { path, endpoint } => rewrite_file(path, endpoint).await,
        };
        outcome.unwrap_or_else(|e| {
            tracing::debug!(error = %format!("{e:#}"), "local step could not run");
            StepResult::failed(None, format!("{e:#}"))
        })
    }
}

/// Rewrite the `remote` lines of a client config in place.
async fn rewrite_file(path: &str, endpoint: &Endpoint) -> Result<StepResult> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read {path}"))?;
    let rewritten = rewrite_remote_lines(&content, endpoint);
    tokio::fs::write(path, rewritten)
        .await
        .with_context(|| format!("cannot write {path}"))?;
    Ok(StepResult::succeeded(String::new()))
}

/// Feed `input` to the child's stdin (then close it) while collecting output.
async fn wait_with_input(mut child: Child, input: Option<&[u8]>) -> Result<Output> {
    let stdin_task = child.stdin.take().map(|mut stdin| {
        let input = input.unwrap_or_default().to_vec();
        tokio::spawn(async move {
            let _ = stdin.write_all(&input).await;
        })
    });

    let output = child
        .wait_with_output()
        .await
        .context("waiting for shell")?;
    if let Some(task) = stdin_task {
        let _ = task.await;
    }
    Ok(output)
}

fn to_result(output: &Output) -> StepResult {
    StepResult {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

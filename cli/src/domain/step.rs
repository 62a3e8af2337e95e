//! Steps, step results and shell rendering.
//!
//! A step is one shell-level unit of work. Steps are plain data: building
//! them never touches the network or the filesystem, only executors do.

use crate::domain::artifact::Endpoint;

// ── Commands ─────────────────────────────────────────────────────────────────

/// A shell command line bound to a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Command text, interpreted by the shell.
    pub command: String,
    /// Working directory the command runs in.
    pub cwd: String,
    /// Bytes written to the command's stdin, then closed.
    pub stdin: Option<Vec<u8>>,
    /// When set, a failure is reported as a warning and the run continues.
    pub ignore_failure: bool,
}

impl ShellCommand {
    #[must_use]
    pub fn new(command: impl Into<String>, cwd: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cwd: cwd.into(),
            stdin: None,
            ignore_failure: false,
        }
    }

    /// Feed `input` on stdin.
    #[must_use]
    pub fn with_stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Tolerate a non-zero exit.
    #[must_use]
    pub fn tolerant(mut self) -> Self {
        self.ignore_failure = true;
        self
    }

    fn render_in_dir(&self) -> String {
        format!("cd {} && {}", shell_quote(&self.cwd), self.command)
    }
}

// ── Steps ────────────────────────────────────────────────────────────────────

/// One unit of work, dispatched on by executors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run a command as-is.
    Literal(ShellCommand),
    /// Pipe the producer's stdout into the consumer's stdin.
    Piped {
        producer: ShellCommand,
        consumer: ShellCommand,
    },
    /// Write the command's stdout to `output`.
    Redirected { command: ShellCommand, output: String },
    /// Point every `remote` line of a client config at `endpoint`.
    RewriteRemote { path: String, endpoint: Endpoint },
}

impl Step {
    /// Shorthand for a literal command.
    #[must_use]
    pub fn run(command: impl Into<String>, cwd: impl Into<String>) -> Self {
        Self::Literal(ShellCommand::new(command, cwd))
    }

    /// Command text shown to the operator.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Literal(cmd) => cmd.command.clone(),
            Self::Piped { producer, consumer } => {
                format!("{} | {}", producer.command, consumer.command)
            }
            Self::Redirected { command, output } => {
                format!("{} > {}", command.command, shell_quote(output))
            }
            Self::RewriteRemote { path, endpoint } => {
                format!("rewrite remote -> {endpoint} in {path}")
            }
        }
    }

    /// The whole step as one shell line, working directories included.
    ///
    /// Used verbatim by the remote executor.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Literal(cmd) => cmd.render_in_dir(),
            // Without pipefail the pipeline reports the consumer's status.
            Self::Piped { producer, consumer } => format!(
                "set -o pipefail; ({}) | ({})",
                producer.render_in_dir(),
                consumer.render_in_dir()
            ),
            Self::Redirected { command, output } => {
                format!("{} > {}", command.render_in_dir(), shell_quote(output))
            }
            Self::RewriteRemote { path, endpoint } => {
                format!("sed -i {} {}", shell_quote(&endpoint.sed_script()), shell_quote(path))
            }
        }
    }

    /// Stdin to send with [`Step::render`], if any.
    #[must_use]
    pub fn stdin(&self) -> Option<&[u8]> {
        match self {
            Self::Literal(cmd) | Self::Redirected { command: cmd, .. } => cmd.stdin.as_deref(),
            Self::Piped { producer, .. } => producer.stdin.as_deref(),
            Self::RewriteRemote { .. } => None,
        }
    }

    /// Whether a failure of this step may be tolerated.
    #[must_use]
    pub fn ignores_failure(&self) -> bool {
        match self {
            Self::Literal(cmd) | Self::Redirected { command: cmd, .. } => cmd.ignore_failure,
            Self::Piped { consumer, .. } => consumer.ignore_failure,
            Self::RewriteRemote { .. } => false,
        }
    }
}

// ── Results ──────────────────────────────────────────────────────────────────

/// Outcome of executing a step. Executors never fail past this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepResult {
    pub success: bool,
    /// Exit code, when the process reported one.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepResult {
    #[must_use]
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn failed(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

// ── Quoting ──────────────────────────────────────────────────────────────────

/// Quote `value` as a single POSIX shell word.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | ':' | '~' | '@'))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

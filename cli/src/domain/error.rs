//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Input errors ──────────────────────────────────────────────────────────────

/// Operator input that failed validation. Raised before any side effect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required. Pass it as a flag or run without --yes to be prompted.")]
    Missing(&'static str),

    #[error("domain invalid: {0:?} (enter the bare domain, without http or www)")]
    InvalidDomain(String),

    #[error("email invalid: {0:?}")]
    InvalidEmail(String),

    #[error("Invalid client name '{0}': must match ^[A-Za-z0-9][A-Za-z0-9_.-]{{0,63}}$")]
    InvalidClientName(String),

    #[error("Client '{0}' is listed more than once.")]
    DuplicateClient(String),

    #[error("At least one client name is required.")]
    NoClients,
}

// ── Connection errors ─────────────────────────────────────────────────────────

/// Failure to open the remote execution context. No step has run yet.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("cannot reach {host}: {reason}")]
    Unreachable { host: String, reason: String },

    #[error("{host} rejected the credentials for user '{username}'")]
    AuthRejected { host: String, username: String },

    #[error("cannot load SSH key {path}: {reason}")]
    KeyFile { path: String, reason: String },
}

// ── Run errors ────────────────────────────────────────────────────────────────

/// A step failed and the remaining steps were skipped.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to run {phase}: `{command}` exited unsuccessfully")]
    StepFailed { phase: String, command: String },
}

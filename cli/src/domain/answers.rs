//! Operator answers and their validation.
//!
//! Every value here ends up interpolated into a shell command, so the
//! validators are strict. Pure functions only: no I/O, no async.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::InputError;
use crate::domain::profile::SetupProfile;

/// Client name accepted by easyrsa and safe to interpolate unquoted.
pub static CLIENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern, cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,63}$").expect("valid regex")
});

/// Bare DNS name: at least two labels, no scheme, path or port.
pub static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
        .expect("valid regex")
});

/// Characters that must never reach the shell through an answer.
pub static SHELL_METACHAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"[;|&`$()\\<>!#*\[\]{}'"\s]"#).expect("valid regex")
});

/// Client list used when `--clients` is not given.
pub const DEFAULT_CLIENTS: &str = "c1";

// ── Answer types ─────────────────────────────────────────────────────────────

/// Credential used to open the SSH session.
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    Password(String),
    KeyFile(PathBuf),
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
        }
    }
}

/// Remote host the steps run on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub secret: Secret,
}

/// Inputs for TLS certificate issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    pub domain: String,
    pub email: String,
}

/// Validated operator intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub profile: SetupProfile,
    /// `None` runs every step on this machine.
    pub remote: Option<RemoteTarget>,
    /// Present iff the profile requires a certificate.
    pub certificate: Option<CertificateRequest>,
    /// OpenVPN client names, in the order given.
    pub clients: Vec<String>,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validate a domain entered without scheme or `www`.
///
/// # Errors
///
/// Returns [`InputError::InvalidDomain`] if the value is empty or not a bare
/// host name.
pub fn validate_domain(domain: &str) -> Result<String, InputError> {
    let domain = domain.trim();
    if domain.is_empty() || !DOMAIN_RE.is_match(domain) {
        return Err(InputError::InvalidDomain(domain.to_string()));
    }
    Ok(domain.to_ascii_lowercase())
}

/// Validate an email address for the ACME account.
///
/// # Errors
///
/// Returns [`InputError::InvalidEmail`] if the value is empty, lacks `@`,
/// or contains whitespace or shell metacharacters.
pub fn validate_email(email: &str) -> Result<String, InputError> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, host)| !local.is_empty() && !host.is_empty())
        && !SHELL_METACHAR_RE.is_match(email);
    if !valid {
        return Err(InputError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_string())
}

/// Split a comma-separated client list and validate each name.
///
/// # Errors
///
/// Returns an error if the list is empty, a name is malformed, or a name
/// repeats.
pub fn parse_clients(list: &str) -> Result<Vec<String>, InputError> {
    let mut clients: Vec<String> = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !CLIENT_NAME_RE.is_match(name) {
            return Err(InputError::InvalidClientName(name.to_string()));
        }
        if clients.iter().any(|c| c == name) {
            return Err(InputError::DuplicateClient(name.to_string()));
        }
        clients.push(name.to_string());
    }
    if clients.is_empty() {
        return Err(InputError::NoClients);
    }
    Ok(clients)
}

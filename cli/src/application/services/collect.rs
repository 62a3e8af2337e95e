//! Application service: input collection use-case.
//!
//! Asks only what the chosen profile needs, pre-filling every question from
//! command-line values, and validates each answer before anything runs.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::Prompter;
use crate::domain::answers::{
    DEFAULT_CLIENTS, parse_clients, validate_domain, validate_email,
};
use crate::domain::{Answers, CertificateRequest, InputError, RemoteTarget, Secret, SetupProfile};

/// Values supplied on the command line, used as defaults for the prompts.
#[derive(Debug, Clone, Default)]
pub struct InputDefaults {
    pub setup: Option<SetupProfile>,
    /// When set, steps run on this host over SSH.
    pub host: Option<String>,
    pub port: u16,
    pub username: String,
    pub password: Option<String>,
    pub identity: Option<PathBuf>,
    pub domain: Option<String>,
    pub email: Option<String>,
    pub clients: Option<String>,
}

/// Collect and validate the operator's answers.
///
/// # Errors
///
/// Returns an [`InputError`] (wrapped in `anyhow`) if a required value is
/// missing or malformed, or a prompt error if the terminal cannot be read.
pub fn collect_answers(prompter: &impl Prompter, defaults: &InputDefaults) -> Result<Answers> {
    let profile = match defaults.setup {
        Some(profile) => profile,
        None => pick_profile(prompter)?,
    };

    let remote = match defaults.host.as_deref().map(str::trim) {
        Some(host) if !host.is_empty() => Some(remote_target(prompter, defaults, host)?),
        Some(_) => return Err(InputError::Missing("host").into()),
        None => None,
    };

    let certificate = if profile.requires_certificate() {
        Some(certificate_request(prompter, defaults)?)
    } else {
        None
    };

    let client_list = defaults.clients.as_deref().unwrap_or(DEFAULT_CLIENTS);
    let clients = if profile == SetupProfile::AddOpenVpnUsers {
        let answer = prompter.input(
            "clients",
            "Client names (comma-separated)",
            Some(client_list),
        )?;
        parse_clients(&answer)?
    } else {
        parse_clients(client_list)?
    };

    Ok(Answers {
        profile,
        remote,
        certificate,
        clients,
    })
}

fn pick_profile(prompter: &impl Prompter) -> Result<SetupProfile> {
    let titles: Vec<&str> = SetupProfile::ALL.iter().map(|p| p.title()).collect();
    let idx = prompter.select("Pick a setup (VPN, etc)", &titles, 0)?;
    SetupProfile::ALL
        .get(idx)
        .copied()
        .ok_or_else(|| InputError::Missing("setup").into())
}

fn remote_target(
    prompter: &impl Prompter,
    defaults: &InputDefaults,
    host: &str,
) -> Result<RemoteTarget> {
    let username = defaults.username.trim();
    if username.is_empty() {
        return Err(InputError::Missing("username").into());
    }
    let secret = match (&defaults.identity, &defaults.password) {
        (Some(key), _) => Secret::KeyFile(key.clone()),
        (None, Some(password)) => Secret::Password(password.clone()),
        (None, None) => Secret::Password(
            prompter.password("password", &format!("Password for {username}@{host}"))?,
        ),
    };
    Ok(RemoteTarget {
        host: host.to_string(),
        port: defaults.port,
        username: username.to_string(),
        secret,
    })
}

fn certificate_request(
    prompter: &impl Prompter,
    defaults: &InputDefaults,
) -> Result<CertificateRequest> {
    let domain = prompter.input(
        "domain",
        "Enter your domain without http or www",
        defaults.domain.as_deref(),
    )?;
    let domain = validate_domain(&domain)?;
    let email = prompter.input("email", "Enter your email", defaults.email.as_deref())?;
    let email = validate_email(&email)?;
    Ok(CertificateRequest { domain, email })
}

//! Setup profiles and the shared firewall table.
//!
//! Pure data only: no I/O, no async.

use std::fmt;

use clap::ValueEnum;

// ── Constants ────────────────────────────────────────────────────────────────

/// Port the x-ui panel listens on after `x-ui setting -port`.
pub const PANEL_PORT: u16 = 54321;

/// Default port for `--serve`.
pub const DEFAULT_SERVE_PORT: u16 = 3000;

// ── Profiles ─────────────────────────────────────────────────────────────────

/// VPN setup chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SetupProfile {
    /// OpenVPN behind stunnel, run with Docker Compose.
    #[value(name = "openvpn")]
    OpenVpn,
    /// VLess + XTLS through the x-ui panel.
    #[value(name = "vless")]
    Vless,
    /// Create client configs on an already provisioned OpenVPN host.
    #[value(name = "add_openvpn_user")]
    AddOpenVpnUsers,
}

impl SetupProfile {
    /// All profiles, in prompt order.
    pub const ALL: [Self; 3] = [Self::OpenVpn, Self::Vless, Self::AddOpenVpnUsers];

    /// Value accepted by `--setup`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::OpenVpn => "openvpn",
            Self::Vless => "vless",
            Self::AddOpenVpnUsers => "add_openvpn_user",
        }
    }

    /// Label shown in the interactive picker.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::OpenVpn => "OpenVPN with stunnel",
            Self::Vless => "VLess + XTLS",
            Self::AddOpenVpnUsers => "Add OpenVPN users",
        }
    }

    /// Whether the profile issues a TLS certificate (needs domain + email).
    #[must_use]
    pub fn requires_certificate(self) -> bool {
        matches!(self, Self::Vless)
    }

    /// Whether the profile produces OpenVPN client configs.
    #[must_use]
    pub fn creates_clients(self) -> bool {
        matches!(self, Self::OpenVpn | Self::AddOpenVpnUsers)
    }
}

impl fmt::Display for SetupProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Firewall table ───────────────────────────────────────────────────────────

/// A single `ufw allow` rule. Every port the profiles open is TCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRule {
    pub port: u16,
}

impl PortRule {
    #[must_use]
    pub const fn tcp(port: u16) -> Self {
        Self { port }
    }

    /// Argument for `ufw allow`, e.g. `443/tcp`.
    #[must_use]
    pub fn ufw_spec(self) -> String {
        format!("{}/tcp", self.port)
    }
}

const OPENVPN_RULES: &[PortRule] = &[PortRule::tcp(80), PortRule::tcp(443), PortRule::tcp(993)];

const VLESS_RULES: &[PortRule] = &[
    PortRule::tcp(80),
    PortRule::tcp(443),
    PortRule::tcp(993),
    PortRule::tcp(PANEL_PORT),
];

/// Ordered firewall rules opened by `profile`. `ssh` is always allowed on top.
#[must_use]
pub fn firewall_rules(profile: SetupProfile) -> &'static [PortRule] {
    match profile {
        SetupProfile::OpenVpn => OPENVPN_RULES,
        SetupProfile::Vless => VLESS_RULES,
        SetupProfile::AddOpenVpnUsers => &[],
    }
}

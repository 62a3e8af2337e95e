//! Provisioning configuration schema.
//!
//! Every fixed path, URL and credential used by the profile builder lives
//! here so it can be overridden from `~/.movpn/config.yaml`.
//! Pure types only: no I/O, no async.

use serde::{Deserialize, Serialize};

use crate::domain::artifact::Endpoint;

/// Top-level configuration stored in `~/.movpn/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Working directory for steps without a more specific one.
    pub root_dir: String,
    /// Shell used to interpret step command lines (`<shell> -c`).
    pub shell: String,
    pub openvpn: OpenVpnConfig,
    pub vless: VlessConfig,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            root_dir: "/root".to_string(),
            shell: "bash".to_string(),
            openvpn: OpenVpnConfig::default(),
            vless: VlessConfig::default(),
        }
    }
}

/// OpenVPN + stunnel container settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenVpnConfig {
    /// Git repository with the compose stack and `bin/init.sh`.
    pub repo_url: String,
    /// Where the repository is cloned.
    pub repo_dir: String,
    /// Where generated `.ovpn` files are written.
    pub configs_dir: String,
    /// Endpoint written into every client's `remote` line.
    pub endpoint: Endpoint,
    /// stunnel client config, relative to `repo_dir`, copied next to the
    /// client configs.
    pub relay_config: String,
}

impl Default for OpenVpnConfig {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/morajabi/docker-stealth-openvpn".to_string(),
            repo_dir: "/root/docker-stealth-openvpn".to_string(),
            configs_dir: "/root/configs".to_string(),
            endpoint: Endpoint::default(),
            relay_config: "stunnel-client.conf".to_string(),
        }
    }
}

/// VLess / x-ui settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlessConfig {
    /// x-ui install script, piped into bash.
    pub installer_url: String,
    /// acme.sh bootstrap script, piped into sh.
    pub acme_url: String,
    /// Directory receiving the issued certificate files.
    pub certs_dir: String,
    /// x-ui panel login.
    pub panel_username: String,
    pub panel_password: String,
}

impl Default for VlessConfig {
    fn default() -> Self {
        Self {
            installer_url: "https://raw.githubusercontent.com/vaxilu/x-ui/master/install.sh"
                .to_string(),
            acme_url: "https://get.acme.sh".to_string(),
            certs_dir: "/root/certs".to_string(),
            panel_username: "admin".to_string(),
            panel_password: "amazing1212".to_string(),
        }
    }
}

//! Generated client configs and the `remote` line rewrite.
//!
//! Pure functions only: no I/O, no async.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Directive rewritten in generated `.ovpn` files.
const REMOTE_DIRECTIVE: &str = "remote ";

/// Endpoint the clients dial: the local stunnel listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub proto: String,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 41194,
            proto: "tcp".to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.host, self.port, self.proto)
    }
}

impl Endpoint {
    /// The replacement `remote` line, without line terminator.
    #[must_use]
    pub fn remote_line(&self) -> String {
        format!("{REMOTE_DIRECTIVE}{self}")
    }

    /// `sed` expression equivalent to [`rewrite_remote_lines`].
    ///
    /// Stops at the first control character so a trailing `\r` survives.
    #[must_use]
    pub fn sed_script(&self) -> String {
        let replacement = self.remote_line().replace('/', r"\/").replace('&', r"\&");
        format!("s/^{REMOTE_DIRECTIVE}[^[:cntrl:]]*/{replacement}/")
    }
}

/// Replace every line starting with `remote ` by `endpoint`'s remote line.
///
/// Line terminators (`\n` or `\r\n`) are kept as they were; every other
/// line is returned untouched.
#[must_use]
pub fn rewrite_remote_lines(content: &str, endpoint: &Endpoint) -> String {
    let replacement = endpoint.remote_line();
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if line.starts_with(REMOTE_DIRECTIVE) {
            let body_len = line.trim_end_matches(['\n', '\r']).len();
            out.push_str(&replacement);
            out.push_str(&line[body_len..]);
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Where the relay config `relay_config` lands once copied into `configs_dir`.
#[must_use]
pub fn companion_path(configs_dir: &str, relay_config: &str) -> String {
    let name = relay_config.rsplit('/').next().unwrap_or(relay_config);
    format!("{}/{name}", configs_dir.trim_end_matches('/'))
}

/// Path of the client config generated for `client` under `configs_dir`.
#[must_use]
pub fn client_config_path(configs_dir: &str, client: &str) -> String {
    format!("{}/{client}.ovpn", configs_dir.trim_end_matches('/'))
}

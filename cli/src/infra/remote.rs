//! Infrastructure implementation of the `StepExecutor` port over SSH.
//!
//! One authenticated session is opened before any step runs; every step
//! then gets its own exec channel on that session.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key;

use crate::application::ports::StepExecutor;
use crate::domain::{ConnectionError, RemoteTarget, Secret, Step, StepResult};

/// Extended-data stream id carrying stderr.
const SSH_EXTENDED_DATA_STDERR: u32 = 1;

/// Session handler. Host keys are accepted and their fingerprint logged.
struct AcceptingHandler {
    host: String,
}

#[async_trait]
impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        tracing::info!(
            host = %self.host,
            fingerprint = %server_public_key.fingerprint(),
            "accepting host key"
        );
        Ok(true)
    }
}

/// `StepExecutor` running steps on a remote host.
pub struct RemoteExecutor {
    session: Handle<AcceptingHandler>,
    host: String,
}

impl RemoteExecutor {
    /// Connect and authenticate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectionError`] if the host is unreachable, the key file
    /// cannot be loaded, or the credentials are rejected.
    pub async fn connect(target: &RemoteTarget) -> Result<Self, ConnectionError> {
        let config = Arc::new(client::Config::default());
        let handler = AcceptingHandler {
            host: target.host.clone(),
        };
        let unreachable = |e: russh::Error| ConnectionError::Unreachable {
            host: target.host.clone(),
            reason: e.to_string(),
        };

        let mut session = client::connect(config, (target.host.as_str(), target.port), handler)
            .await
            .map_err(unreachable)?;

        let accepted = match &target.secret {
            Secret::Password(password) => session
                .authenticate_password(&target.username, password)
                .await
                .map_err(unreachable)?,
            Secret::KeyFile(path) => {
                let key_pair = russh_keys::load_secret_key(path, None).map_err(|e| {
                    ConnectionError::KeyFile {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                })?;
                session
                    .authenticate_publickey(&target.username, Arc::new(key_pair))
                    .await
                    .map_err(unreachable)?
            }
        };
        if !accepted {
            return Err(ConnectionError::AuthRejected {
                host: target.host.clone(),
                username: target.username.clone(),
            });
        }

        tracing::info!(host = %target.host, user = %target.username, "connected");
        Ok(Self {
            session,
            host: target.host.clone(),
        })
    }

    /// Close the session.
    pub async fn disconnect(&self) {
        if let Err(e) = self
            .session
            .disconnect(Disconnect::ByApplication, "provisioning finished", "en")
            .await
        {
            tracing::debug!(host = %self.host, error = %e, "disconnect failed");
        }
    }

    async fn exec(&self, command: &str, stdin: Option<&[u8]>) -> Result<StepResult, russh::Error> {
        let mut channel = self.session.channel_open_session().await?;
        channel.exec(true, command).await?;
        if let Some(input) = stdin {
            channel.data(input).await?;
        }
        channel.eof().await?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = None;
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext } if ext == SSH_EXTENDED_DATA_STDERR => {
                    stderr.extend_from_slice(data);
                }
                ChannelMsg::ExitStatus { exit_status } => {
                    exit_code = Some(i32::try_from(exit_status).unwrap_or(i32::MAX));
                }
                _ => {}
            }
        }

        Ok(StepResult {
            success: exit_code == Some(0),
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

impl StepExecutor for RemoteExecutor {
    async fn execute(&self, step: &Step) -> StepResult {
        let line = step.render();
        match self.exec(&line, step.stdin()).await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(host = %self.host, error = %e, "remote step could not run");
                StepResult::failed(None, format!("ssh channel error: {e}"))
            }
        }
    }
}

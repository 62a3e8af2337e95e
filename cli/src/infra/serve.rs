//! Static artifact server.
//!
//! Serves the generated client configs over plain HTTP so they can be
//! fetched from the operator's machine. Only files produced by the run are
//! reachable; every other name is 404.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;

/// File name -> absolute path of every servable artifact.
#[derive(Debug, Clone, Default)]
pub struct ArtifactIndex {
    files: BTreeMap<String, PathBuf>,
}

impl ArtifactIndex {
    /// Index `paths` by file name. Later duplicates replace earlier ones.
    #[must_use]
    pub fn new<P: AsRef<FsPath>>(paths: &[P]) -> Self {
        let files = paths
            .iter()
            .filter_map(|p| {
                let path = p.as_ref();
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path.to_path_buf()))
            })
            .collect();
        Self { files }
    }

    /// Add the paths of `optional` that exist on disk; missing ones are
    /// skipped.
    #[must_use]
    pub fn with_existing<P: AsRef<FsPath>>(mut self, optional: &[P]) -> Self {
        for path in optional.iter().map(AsRef::as_ref) {
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "optional file absent, not served");
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                self.files.insert(name.to_string(), path.to_path_buf());
            }
        }
        self
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    fn get(&self, name: &str) -> Option<&PathBuf> {
        self.files.get(name)
    }
}

/// Build the router: `GET /` lists artifacts, `GET /{name}` downloads one.
pub fn router(index: ArtifactIndex) -> Router {
    Router::new()
        .route("/", get(list))
        .route("/{name}", get(download))
        .with_state(Arc::new(index))
}

async fn list(State(index): State<Arc<ArtifactIndex>>) -> Html<String> {
    let items: String = index
        .names()
        .iter()
        .map(|name| format!("<li><a href=\"/{name}\">{name}</a></li>"))
        .collect();
    Html(format!(
        "<!doctype html><title>artifacts</title><ul>{items}</ul>"
    ))
}

async fn download(
    State(index): State<Arc<ArtifactIndex>>,
    Path(name): Path<String>,
) -> Response {
    let Some(path) = index.get(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            tracing::info!(file = %name, bytes = bytes.len(), "served artifact");
            (
                [
                    (header::CONTENT_TYPE, content_type(&name).to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{name}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "artifact unreadable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn content_type(name: &str) -> &'static str {
    if name.ends_with(".ovpn") {
        "application/x-openvpn-profile"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Serve `index` on `0.0.0.0:port` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve_artifacts(
    index: ArtifactIndex,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, files = index.names().len(), "artifact server ready");

    axum::serve(listener, router(index))
        .with_graceful_shutdown(shutdown)
        .await
        .context("artifact server error")?;

    tracing::info!("artifact server shut down");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}

//! Configuration Loader
//!
//! Fetches the project configuration document once and keeps the outcome
//! for the lifetime of the loader.

use super::types::ProjectConfig;
use crate::remote::Remote;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Path of the configuration document relative to the application origin
pub const CONFIG_PATH: &str = "/config.json";

/// Where the configuration document is read from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Fetched over HTTP(S)
    Http { url: String },
    /// Read from the local filesystem
    File { path: PathBuf },
}

impl ConfigSource {
    /// The fixed configuration path under an application origin
    pub fn from_origin(origin: &str) -> Self {
        ConfigSource::Http {
            url: format!("{}{}", origin.trim_end_matches('/'), CONFIG_PATH),
        }
    }
}

/// Why the configuration could not be obtained
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("request to {url} failed: {error}")]
    Request { url: String, error: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("invalid configuration document: {0}")]
    Parse(String),
}

/// Fetch-once holder of the project configuration
///
/// Every caller of [`ConfigLoader::init`] shares the same fetch; once it
/// terminates the outcome is kept and never refetched.
pub struct ConfigLoader {
    client: Client,
    source: ConfigSource,
    outcome: OnceCell<Result<Arc<ProjectConfig>, ConfigError>>,
}

impl ConfigLoader {
    pub fn new(client: Client, source: ConfigSource) -> Self {
        Self {
            client,
            source,
            outcome: OnceCell::new(),
        }
    }

    /// Load the configuration, or return the outcome of the earlier load
    pub async fn init(&self) -> Result<Arc<ProjectConfig>, ConfigError> {
        self.outcome
            .get_or_init(|| async {
                let result = self.fetch().await.map(Arc::new);
                match &result {
                    Ok(config) => tracing::info!(
                        project = %config.project.name,
                        version = %config.project.version,
                        "Loaded project configuration"
                    ),
                    Err(e) => tracing::error!(error = %e, "Failed to load project configuration"),
                }
                result
            })
            .await
            .clone()
    }

    /// Current state without triggering a load
    pub fn state(&self) -> Remote<Arc<ProjectConfig>> {
        match self.outcome.get() {
            None => Remote::Loading,
            Some(Ok(config)) => Remote::Ready(config.clone()),
            Some(Err(e)) => Remote::failed(format!("Failed to load configuration: {}", e)),
        }
    }

    /// Loaded configuration, if the load finished successfully
    pub fn value(&self) -> Option<Arc<ProjectConfig>> {
        self.outcome.get().and_then(|r| r.as_ref().ok().cloned())
    }

    async fn fetch(&self) -> Result<ProjectConfig, ConfigError> {
        let text = match &self.source {
            ConfigSource::Http { url } => {
                tracing::debug!(url = %url, "Fetching project configuration");
                let response =
                    self.client
                        .get(url)
                        .send()
                        .await
                        .map_err(|e| ConfigError::Request {
                            url: url.clone(),
                            error: e.to_string(),
                        })?;

                if !response.status().is_success() {
                    return Err(ConfigError::Status {
                        url: url.clone(),
                        status: response.status().as_u16(),
                    });
                }

                response.text().await.map_err(|e| ConfigError::Request {
                    url: url.clone(),
                    error: e.to_string(),
                })?
            }
            ConfigSource::File { path } => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| ConfigError::Io {
                        path: path.clone(),
                        error: e.to_string(),
                    })?
            }
        };

        ProjectConfig::from_json(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

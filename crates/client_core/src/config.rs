use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/deploy";
pub const SETTINGS_FILE: &str = "deploy_client.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid deployment endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: String,
    /// Transport-level timeout. `None` leaves the HTTP client's default.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl ClientSettings {
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn normalized_endpoint(&self) -> Result<String, SettingsError> {
        normalize_endpoint(&self.endpoint)
    }
}

/// Defaults, then `deploy_client.toml` in the working directory, then the
/// process environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.endpoint {
                    settings.endpoint = v;
                }
                if let Some(secs) = file_cfg.request_timeout_secs {
                    settings.request_timeout = Some(Duration::from_secs(secs));
                }
            }
            Err(err) => {
                warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
            }
        }
    }

    if let Some(v) = env("DEPLOY_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = env("APP__DEPLOY_ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(secs) => settings.request_timeout = Some(Duration::from_secs(secs)),
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    settings
}

fn normalize_endpoint(raw_endpoint: &str) -> Result<String, SettingsError> {
    let raw_endpoint = raw_endpoint.trim();

    if raw_endpoint.is_empty() {
        return Ok(DEFAULT_ENDPOINT.to_string());
    }

    let candidate = if raw_endpoint.contains("://") {
        raw_endpoint.to_string()
    } else {
        format!("http://{raw_endpoint}")
    };

    let invalid = |reason: String| SettingsError::InvalidEndpoint {
        endpoint: raw_endpoint.to_string(),
        reason,
    };
    let parsed = Url::parse(&candidate).map_err(|err| invalid(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(parsed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

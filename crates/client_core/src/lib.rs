use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::DeploymentResult,
    error::SubmissionError,
    protocol::{extract_deployment, DeployRequest, ServiceErrorBody},
};
use tracing::{info, warn};

pub mod clipboard;
pub mod config;
pub mod controller;

pub use clipboard::{copy_text, ClipboardError, ClipboardSink, SystemClipboard};
pub use config::{load_settings, ClientSettings, SettingsError, DEFAULT_ENDPOINT};
pub use controller::{
    dispatch, reduce, Completion, PendingSubmission, SubmissionController, SubmissionEvent,
    SubmissionState,
};

/// The remote system that turns a repository reference into a published site.
///
/// Implementations fold every failure into a [`SubmissionError`]; nothing
/// else escapes a call.
#[async_trait]
pub trait DeploymentService: Send + Sync {
    async fn deploy(&self, request: &DeployRequest) -> Result<DeploymentResult, SubmissionError>;
}

pub struct HttpDeploymentService {
    http: Client,
    endpoint: String,
}

impl HttpDeploymentService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Builds a client for the normalized endpoint, honouring the optional
    /// transport timeout.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SettingsError> {
        let endpoint = settings.normalized_endpoint()?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| SettingsError::HttpClient(err.to_string()))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DeploymentService for HttpDeploymentService {
    async fn deploy(&self, request: &DeployRequest) -> Result<DeploymentResult, SubmissionError> {
        let response = match self.http.post(&self.endpoint).json(request).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(endpoint = %self.endpoint, "deploy: request did not complete: {err}");
                return Err(SubmissionError::transport());
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    endpoint = %self.endpoint,
                    status = status.as_u16(),
                    "deploy: failed to read response body: {err}"
                );
                return Err(SubmissionError::transport());
            }
        };

        if !status.is_success() {
            let error = SubmissionError::service(ServiceErrorBody::from_bytes(&body).message());
            warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                message = %error.message,
                "deploy: service rejected request"
            );
            return Err(error);
        }

        let value: serde_json::Value = serde_json::from_slice(&body).map_err(|err| {
            warn!(status = status.as_u16(), "deploy: response body is not JSON: {err}");
            SubmissionError::protocol(format!(
                "Unexpected response from deployment service: {err}"
            ))
        })?;
        let result = extract_deployment(&value)?;
        info!(
            repo = %result.repository_id,
            public_url = %result.deployment_url,
            "deploy: service reported success"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MISSING_REPOSITORY_MESSAGE: &str = "Please enter a GitHub repository URL";
pub const FALLBACK_FAILURE_MESSAGE: &str = "Failed to deploy. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected locally; never reaches the network.
    Validation,
    /// 2xx response whose body lacks a required field.
    Protocol,
    /// Non-2xx response from the deployment service.
    Service,
    /// No response at all.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct SubmissionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SubmissionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_repository() -> Self {
        Self::new(ErrorKind::Validation, MISSING_REPOSITORY_MESSAGE)
    }

    pub fn transport() -> Self {
        Self::new(ErrorKind::Transport, FALLBACK_FAILURE_MESSAGE)
    }

    /// Builds a service failure, falling back to the generic message when the
    /// service did not supply usable error text.
    pub fn service(message: Option<String>) -> Self {
        let message = message
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string());
        Self::new(ErrorKind::Service, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }
}

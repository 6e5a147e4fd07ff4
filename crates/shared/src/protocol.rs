use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{domain::DeploymentResult, error::SubmissionError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRequest {
    pub url: String,
}

impl DeployRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Body of a non-2xx response. Any shape is tolerated; only a string `error`
/// field is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub error: Option<Value>,
}

impl ServiceErrorBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub fn message(&self) -> Option<String> {
        match &self.error {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}

const REPO_FIELD: &str = "repo";
const PUBLIC_URL_FIELD: &str = "public_url";
const BUILD_RESULT_FIELD: &str = "buildResult";

/// Extracts `{repo, public_url, buildResult}` from a 2xx body. Other fields
/// are ignored. `buildResult` may hold any JSON value, including `null`.
pub fn extract_deployment(body: &Value) -> Result<DeploymentResult, SubmissionError> {
    let Some(object) = body.as_object() else {
        return Err(SubmissionError::protocol(
            "Unexpected response from deployment service: body is not a JSON object",
        ));
    };

    let string_field = |name: &str| -> Result<String, SubmissionError> {
        match object.get(name) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(_) => Err(SubmissionError::protocol(format!(
                "Unexpected response from deployment service: `{name}` is not a string"
            ))),
            None => Err(missing_field(name)),
        }
    };

    let repository_id = string_field(REPO_FIELD)?;
    let deployment_url = string_field(PUBLIC_URL_FIELD)?;
    let build_metadata = object
        .get(BUILD_RESULT_FIELD)
        .cloned()
        .ok_or_else(|| missing_field(BUILD_RESULT_FIELD))?;

    Ok(DeploymentResult {
        repository_id,
        deployment_url,
        build_metadata,
    })
}

fn missing_field(name: &str) -> SubmissionError {
    SubmissionError::protocol(format!(
        "Unexpected response from deployment service: missing `{name}`"
    ))
}

//! The `{statusCode, body}` value returned to the hosting runtime.
//!
//! Callers only ever see one of four fixed messages. Which parse step or which
//! service fault caused a failure is visible in the logs, never in the
//! response.

use serde::{Deserialize, Serialize};

use crate::{DeploymentOutcome, HandlerError};

/// Message returned when the deployment service accepted the request.
pub const DEPLOY_SUCCESSFUL: &str = "Deploy successful";
/// Message returned when the build did not succeed.
pub const BUILD_FAILED: &str = "Build failed";
/// Message returned when the notification could not be decoded or resolved.
pub const EXTRACTION_FAILED: &str = "Data extraction or conversion failed";
/// Message returned when the deployment service call failed.
pub const DISPATCH_FAILED: &str = "An error occurred during the deployment process";

/// Response of one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    /// HTTP-style status: 200, 400 or 500.
    pub status_code: u16,
    /// The message, JSON-encoded (e.g. `"\"Deploy successful\""`).
    pub body: String,
}

impl InvocationResponse {
    /// Creates a response whose body is the JSON encoding of `message`.
    pub fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::Value::from(message).to_string(),
        }
    }

    /// Decodes the message from the JSON-encoded body.
    pub fn message(&self) -> Option<String> {
        serde_json::from_str(&self.body).ok()
    }

    /// Maps the result of a handler run onto the fixed response contract.
    pub fn from_result(result: &Result<DeploymentOutcome, HandlerError>) -> Self {
        match result {
            Ok(DeploymentOutcome::Deployed { .. }) => Self::new(200, DEPLOY_SUCCESSFUL),
            Ok(DeploymentOutcome::BuildNotSucceeded { .. }) => Self::new(400, BUILD_FAILED),
            Err(HandlerError::Extraction(_)) => Self::new(500, EXTRACTION_FAILED),
            Err(HandlerError::Dispatch(_)) => Self::new(500, DISPATCH_FAILED),
        }
    }
}

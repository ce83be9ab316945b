//! Error kinds for each stage of a handler invocation.
//!
//! Every stage returns its own error type so callers of the domain logic can
//! tell failure causes apart:
//!
//! - [`ExtractionError`]: decoding the notification or deriving the
//!   deployment target failed. No deployment is attempted.
//! - [`DispatchError`]: the deployment service refused or could not be
//!   reached.
//!
//! [`HandlerError`] joins both for the full decode → resolve → dispatch run.
//! The outward response (see [`crate::response`]) deliberately collapses each
//! domain to one generic message.

use thiserror::Error;

use crate::ProjectName;

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// The notification could not be turned into a build event and deployment
/// target.
///
/// Every variant maps to the same "Data Extraction Failure" response; the
/// variant only matters for logs and for callers of the domain API.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The queue delivery carried an empty `Records` array.
    #[error("Notification contains no records")]
    NoRecords,

    /// The outer queue delivery is not an object with a `Records` array whose
    /// first entry has a string `body`.
    #[error("Queue delivery could not be decoded: {0}")]
    MalformedDelivery(#[source] serde_json::Error),

    /// The record `body` is not a JSON object with string `Type` and
    /// `Message` fields.
    #[error("Transport wrapper could not be decoded: {0}")]
    MalformedWrapper(#[source] serde_json::Error),

    /// The wrapper `Message` is not a build event with string
    /// `detail.project-name` and `detail.build-status` fields.
    #[error("Build event could not be decoded: {0}")]
    MalformedBuildEvent(#[source] serde_json::Error),

    /// The project name does not contain the `build-` marker.
    #[error("Project name '{project_name}' does not contain the 'build-' marker")]
    MissingBuildMarker {
        /// The offending project name.
        project_name: ProjectName,
    },

    /// The project name has nothing after the `build-` marker.
    #[error("Project name '{project_name}' has no function name after the 'build-' marker")]
    EmptyFunctionName {
        /// The offending project name.
        project_name: ProjectName,
    },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// The deployment service did not accept a deployment request.
///
/// Produced by [`crate::DeploymentService`] implementations. Never retried
/// locally; queue redelivery is the only retry mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The service answered and refused the request (unknown deployment
    /// group, missing permission, invalid revision, throttling, ...).
    #[error("Deployment service rejected the request [{code}]: {message}")]
    Rejected {
        /// Service error code (e.g. `"DeploymentGroupDoesNotExistException"`).
        code: String,
        /// Service-provided description.
        message: String,
    },

    /// The request never produced a service answer (network failure,
    /// timeout, credential resolution, request construction).
    #[error("Deployment service call failed: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Failure of a complete handler run.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Decoding or target derivation failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The deployment service call failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The process configuration is missing or invalid.
///
/// Produced at start-up; the handler never runs with an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration error: {message}")]
pub struct ConfigurationError {
    /// Description of the configuration problem.
    pub message: String,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

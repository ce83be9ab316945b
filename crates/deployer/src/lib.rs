//! Domain of the build-to-deploy bridge.
//!
//! Turns a queued build notification into at most one deployment request.
//! Every domain concept, newtype identifier, error kind and the port trait for
//! the deployment service live here. Infrastructure crates implement
//! [`DeploymentService`]; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`FunctionName`, `DeploymentGroupName`, etc.) |
//! | [`types`] | Value types (`BuildStatus`, `ArtifactLocation`, `DeploymentRequest`) |
//! | [`envelope`] | Decoding of the queue delivery → transport wrapper → build event |
//! | [`target`] | Deployment target derivation from the project name |
//! | [`dispatcher`] | The [`Deployer`] state machine |
//! | [`service`] | The [`DeploymentService`] port |
//! | [`response`] | The `{statusCode, body}` invocation response |
//! | [`config`] | Injected [`DeployerConfig`] |
//! | [`errors`] | Per-stage error kinds |

pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod errors;
pub mod identifiers;
pub mod response;
pub mod service;
pub mod target;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::DeployerConfig;
pub use dispatcher::{Deployer, DeploymentOutcome};
pub use envelope::{BuildEvent, DecodedNotification, TransportWrapper};
pub use errors::{ConfigurationError, DispatchError, ExtractionError, HandlerError};
pub use identifiers::{
    ApplicationName, ArtifactKey, BucketName, DeploymentGroupName, DeploymentId, FunctionName,
    InvocationId, ProjectName,
};
pub use response::InvocationResponse;
#[cfg(any(test, feature = "testing"))]
pub use service::MockDeploymentService;
pub use service::DeploymentService;
pub use target::DeploymentTarget;
pub use types::{ArtifactLocation, BuildStatus, BundleType, DeploymentReceipt, DeploymentRequest};

//! Port to the external deployment service.
//!
//! The domain only knows that a request is either accepted or refused.
//! Infrastructure crates (e.g. `codedeploy`) supply the implementation;
//! tests substitute a mock or a recording fake.

use async_trait::async_trait;

use crate::{DeploymentReceipt, DeploymentRequest, DispatchError};

/// Starts deployments on an external deployment service.
///
/// Implementations must not retry and must not wait for the deployment to
/// complete: returning `Ok` means the service accepted the request, nothing
/// more.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DeploymentService: Send + Sync {
    /// Asks the service to deploy `request.artifact` to
    /// `request.deployment_group_name`.
    ///
    /// # Errors
    ///
    /// Any fault raised while issuing the call, classified as a
    /// [`DispatchError`].
    async fn create_deployment(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentReceipt, DispatchError>;
}

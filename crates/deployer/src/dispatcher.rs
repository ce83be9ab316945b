//! The decode → resolve → dispatch flow for one notification.
//!
//! ```text
//!              decode/resolve fails
//!   payload ───────────────────────────────► [Extraction failure]   500
//!      │
//!      ▼ Decoded
//!   status != SUCCEEDED ───────────────────► [Build not succeeded]  400
//!      │
//!      ▼ Dispatching
//!   service accepts ───────────────────────► [Deployed]             200
//!   service faults ────────────────────────► [Dispatch failure]     500
//! ```
//!
//! A [`Deployer`] holds no per-invocation state; the same instance serves any
//! number of invocations, concurrently or not.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::{
    envelope, target, ArtifactLocation, BuildEvent, BuildStatus, DecodedNotification,
    DeployerConfig, DeploymentReceipt, DeploymentRequest, DeploymentService, DeploymentTarget,
    DispatchError, ExtractionError, HandlerError, InvocationId, InvocationResponse,
};

/// Terminal state of a handler run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    /// The deployment service accepted the request.
    Deployed {
        /// The request that was issued.
        request: DeploymentRequest,
        /// The service's acknowledgment.
        receipt: DeploymentReceipt,
    },
    /// The build did not succeed; no request was issued.
    BuildNotSucceeded {
        /// The status the build reported.
        status: BuildStatus,
    },
}

/// Bridges build notifications to the deployment service.
pub struct Deployer {
    config: DeployerConfig,
    service: Arc<dyn DeploymentService>,
}

impl Deployer {
    /// Creates a deployer that issues requests through `service`.
    pub fn new(config: DeployerConfig, service: Arc<dyn DeploymentService>) -> Self {
        Self { config, service }
    }

    /// Runs one invocation and maps the result onto the response contract.
    ///
    /// Never fails: every error is logged inside [`Deployer::process`] and
    /// turned into an error-shaped [`InvocationResponse`].
    pub async fn handle(&self, invocation_id: &InvocationId, payload: &Value) -> InvocationResponse {
        InvocationResponse::from_result(&self.process(invocation_id, payload).await)
    }

    /// Decodes `payload`, resolves its deployment target and dispatches.
    ///
    /// # Errors
    ///
    /// - [`HandlerError::Extraction`] if the notification could not be decoded
    ///   or the project name does not follow the naming convention. No
    ///   deployment is attempted.
    /// - [`HandlerError::Dispatch`] if the deployment service call failed.
    #[instrument(skip(self, payload), fields(invocation_id = %invocation_id))]
    pub async fn process(
        &self,
        invocation_id: &InvocationId,
        payload: &Value,
    ) -> Result<DeploymentOutcome, HandlerError> {
        let (notification, target) = extract(payload).inspect_err(|e| {
            error!(error = %e, "Data extraction or conversion failed");
        })?;

        if notification.ignored_records > 0 {
            // The remaining records are acknowledged with the batch and never
            // deployed.
            warn!(
                ignored_records = notification.ignored_records,
                "Only the first record of a batch is processed"
            );
        }

        info!(
            notification_type = %notification.kind,
            project_name = %notification.event.project_name,
            build_status = %notification.event.build_status,
            "Decoded build notification"
        );

        Ok(self.dispatch(&notification.event, &target).await?)
    }

    /// Builds the request that deploys `target`.
    pub fn build_request(&self, target: &DeploymentTarget) -> DeploymentRequest {
        DeploymentRequest {
            application_name: self.config.application_name.clone(),
            deployment_group_name: target.deployment_group_name.clone(),
            artifact: ArtifactLocation::manifest_for(
                &self.config.artifact_bucket,
                &target.function_name,
            ),
        }
    }

    /// Deploys `target` if `event` reports a successful build.
    ///
    /// # Errors
    ///
    /// Returns the [`DispatchError`] raised by the deployment service. The
    /// error is logged here with its full detail.
    pub async fn dispatch(
        &self,
        event: &BuildEvent,
        target: &DeploymentTarget,
    ) -> Result<DeploymentOutcome, DispatchError> {
        if !event.build_status.is_succeeded() {
            warn!(
                project_name = %event.project_name,
                build_status = %event.build_status,
                "Build failed"
            );
            return Ok(DeploymentOutcome::BuildNotSucceeded {
                status: event.build_status.clone(),
            });
        }

        let request = self.build_request(target);
        info!(
            application_name = %request.application_name,
            deployment_group_name = %request.deployment_group_name,
            bucket = %request.artifact.bucket,
            key = %request.artifact.key,
            "Creating deployment"
        );

        match self.service.create_deployment(&request).await {
            Ok(receipt) => {
                info!(deployment_id = ?receipt.deployment_id, "Deploy successful");
                Ok(DeploymentOutcome::Deployed { request, receipt })
            }
            Err(e) => {
                error!(
                    error = %e,
                    deployment_group_name = %request.deployment_group_name,
                    "An error occurred during the deployment process"
                );
                Err(e)
            }
        }
    }
}

fn extract(payload: &Value) -> Result<(DecodedNotification, DeploymentTarget), ExtractionError> {
    let notification = envelope::decode(payload)?;
    let target = target::resolve(&notification.event.project_name)?;
    Ok((notification, target))
}

//! AWS CodeDeploy infrastructure adapter.
//!
//! Implements the [`deployer::DeploymentService`] trait with
//! [`aws_sdk_codedeploy`]. A domain [`DeploymentRequest`] becomes one
//! `CreateDeployment` call whose revision is an S3-hosted `appspec` manifest.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! Credential resolution, region selection, request signing and SDK error
//! shapes are handled here; the [`deployer`] crate never sees them.
//!
//! ## Error Mapping
//!
//! | SDK outcome | [`DispatchError`] |
//! |-------------|-------------------|
//! | Service error (modelled or unmodelled) | `Rejected { code, message }` |
//! | Construction, dispatch, timeout or response error | `Transport { message }` |

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_codedeploy::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_codedeploy::operation::create_deployment::CreateDeploymentError;
use aws_sdk_codedeploy::types::{
    BundleType as SdkBundleType, RevisionLocation, RevisionLocationType, S3Location,
};
use aws_sdk_codedeploy::Client;
use tracing::{info, instrument};

use deployer::{
    ArtifactLocation, BundleType, DeploymentId, DeploymentReceipt, DeploymentRequest,
    DeploymentService, DispatchError,
};

/// [`DeploymentService`] backed by AWS CodeDeploy.
#[derive(Debug, Clone)]
pub struct CodeDeployClient {
    client: Client,
}

impl CodeDeployClient {
    /// Wraps an existing SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS provider chain (environment,
    /// profile, container or instance credentials; region from the same).
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl DeploymentService for CodeDeployClient {
    #[instrument(
        skip(self, request),
        fields(
            application_name = %request.application_name,
            deployment_group_name = %request.deployment_group_name,
        )
    )]
    async fn create_deployment(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentReceipt, DispatchError> {
        let output = self
            .client
            .create_deployment()
            .application_name(request.application_name.as_str())
            .deployment_group_name(request.deployment_group_name.as_str())
            .revision(revision_location(&request.artifact))
            .send()
            .await
            .map_err(classify)?;

        info!(response = ?output, "CreateDeployment accepted");

        Ok(DeploymentReceipt {
            deployment_id: output.deployment_id().and_then(DeploymentId::new),
        })
    }
}

/// Converts a domain artifact location into an S3 revision.
fn revision_location(artifact: &ArtifactLocation) -> RevisionLocation {
    let bundle_type = match artifact.bundle_type {
        BundleType::Yaml => SdkBundleType::Yaml,
    };

    let s3_location = S3Location::builder()
        .bucket(artifact.bucket.as_str())
        .key(artifact.key.as_str())
        .bundle_type(bundle_type)
        .build();

    RevisionLocation::builder()
        .revision_type(RevisionLocationType::S3)
        .s3_location(s3_location)
        .build()
}

fn classify(err: SdkError<CreateDeploymentError>) -> DispatchError {
    match err.as_service_error() {
        Some(service_err) => DispatchError::Rejected {
            code: service_err.code().unwrap_or("Unknown").to_string(),
            message: service_err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(service_err).to_string()),
        },
        None => DispatchError::Transport {
            message: DisplayErrorContext(&err).to_string(),
        },
    }
}

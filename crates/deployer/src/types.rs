//! Shared value types for the build-to-deploy domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! behaviour: a [`BuildStatus`] knows whether it represents success, and an
//! [`ArtifactLocation`] knows the naming convention for deployment manifests.

use serde::{Deserialize, Serialize};

use crate::{
    ApplicationName, ArtifactKey, BucketName, DeploymentGroupName, DeploymentId, FunctionName,
};

// ---------------------------------------------------------------------------
// Build status
// ---------------------------------------------------------------------------

/// Outcome reported by the build system for a finished build.
///
/// The build system emits an open set of values (`SUCCEEDED`, `FAILED`,
/// `STOPPED`, ...). Only the literal [`BuildStatus::SUCCEEDED`] triggers a
/// deployment; every other value, including the empty string, is treated as
/// "not succeeded".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildStatus(String);

impl BuildStatus {
    /// The only status value that leads to a deployment.
    pub const SUCCEEDED: &'static str = "SUCCEEDED";

    /// Wraps a raw status string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw status as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` only for the exact, case-sensitive value `SUCCEEDED`.
    pub fn is_succeeded(&self) -> bool {
        self.0 == Self::SUCCEEDED
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Artifact location
// ---------------------------------------------------------------------------

/// Format of the deployment manifest stored in the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleType {
    /// A YAML `appspec` manifest.
    Yaml,
}

/// Where the deployment service fetches the revision to deploy.
///
/// Always an object-store location; the key follows the convention
/// `codeDeploy/<function name>/appspec.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    /// Bucket holding the manifest.
    pub bucket: BucketName,
    /// Object key of the manifest.
    pub key: ArtifactKey,
    /// Manifest format.
    pub bundle_type: BundleType,
}

impl ArtifactLocation {
    /// Builds the conventional manifest location for `function` in `bucket`.
    pub fn manifest_for(bucket: &BucketName, function: &FunctionName) -> Self {
        Self {
            bucket: bucket.clone(),
            key: ArtifactKey::manifest_for(function),
            bundle_type: BundleType::Yaml,
        }
    }
}

// ---------------------------------------------------------------------------
// Deployment request / receipt
// ---------------------------------------------------------------------------

/// Everything the deployment service needs to start one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// Target application (from configuration).
    pub application_name: ApplicationName,
    /// Target deployment group (derived from the project name).
    pub deployment_group_name: DeploymentGroupName,
    /// Revision to deploy.
    pub artifact: ArtifactLocation,
}

/// Acknowledgment returned by the deployment service for an accepted request.
///
/// Only logged. The dispatcher never waits for the deployment to finish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentReceipt {
    /// Service-assigned id, when the service returned one.
    pub deployment_id: Option<DeploymentId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_succeeded_is_success() {
        assert!(BuildStatus::new("SUCCEEDED").is_succeeded());
        assert!(!BuildStatus::new("FAILED").is_succeeded());
        assert!(!BuildStatus::new("succeeded").is_succeeded());
        assert!(!BuildStatus::new("").is_succeeded());
    }

    #[test]
    fn test_manifest_location_follows_key_convention() {
        let bucket = BucketName::new("artifacts").unwrap();
        let function = FunctionName::new("orders-api").unwrap();

        let location = ArtifactLocation::manifest_for(&bucket, &function);

        assert_eq!(location.bucket.as_str(), "artifacts");
        assert_eq!(location.key.as_str(), "codeDeploy/orders-api/appspec.yaml");
        assert_eq!(location.bundle_type, BundleType::Yaml);
    }
}

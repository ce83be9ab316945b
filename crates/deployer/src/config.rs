//! Configuration injected into the [`crate::Deployer`].
//!
//! Loading from the process environment happens in the composition root;
//! this crate only validates values it is handed.

use crate::{ApplicationName, BucketName, ConfigurationError};

/// Fixed deployment settings for every invocation of the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployerConfig {
    /// Deployment application that owns the deployment groups.
    pub application_name: ApplicationName,
    /// Bucket holding deployment manifests.
    pub artifact_bucket: BucketName,
}

impl DeployerConfig {
    /// Validates raw configuration values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if either value is empty or only
    /// whitespace.
    pub fn new(
        application_name: impl Into<String>,
        artifact_bucket: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let application_name = ApplicationName::new(application_name.into().trim())
            .ok_or_else(|| ConfigurationError::new("deployment application name is empty"))?;
        let artifact_bucket = BucketName::new(artifact_bucket.into().trim())
            .ok_or_else(|| ConfigurationError::new("artifact bucket name is empty"))?;

        Ok(Self {
            application_name,
            artifact_bucket,
        })
    }
}

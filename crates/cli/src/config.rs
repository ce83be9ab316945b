use config::{Config, ConfigError, Environment};
use deployer::{ConfigurationError, DeployerConfig};
use serde::Deserialize;

use crate::telemetry::TelemetryConfig;

/// Process configuration, read once from the environment at start-up.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Deployment application name (`DEPLOY_APPLICATION`)
    pub deploy_application: String,

    /// Bucket holding deployment manifests (`S3_BUCKET`)
    pub s3_bucket: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Export spans over OTLP
    #[serde(default)]
    pub otel_enabled: bool,

    /// OTLP collector endpoint (gRPC)
    #[serde(default = "default_otel_endpoint")]
    pub otel_endpoint: String,

    /// Service name reported on exported spans
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "code-deployer".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Validates the deployment settings into the domain configuration.
    pub fn deployer_config(&self) -> Result<DeployerConfig, ConfigurationError> {
        DeployerConfig::new(self.deploy_application.as_str(), self.s3_bucket.as_str())
    }

    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            service_name: self.service_name.clone(),
            otel_endpoint: self.otel_endpoint.clone(),
            otel_enabled: self.otel_enabled,
            log_level: self.log_level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(source))
    }

    #[test]
    fn test_required_values_with_defaults() {
        let config = AppConfig::from_environment(environment(&[
            ("DEPLOY_APPLICATION", "inspector-deployment-application"),
            ("S3_BUCKET", "operation-bucket"),
        ]))
        .unwrap();

        assert_eq!(config.deploy_application, "inspector-deployment-application");
        assert_eq!(config.s3_bucket, "operation-bucket");
        assert_eq!(config.log_level, "info");
        assert!(!config.otel_enabled);
        assert_eq!(config.otel_endpoint, "http://localhost:4317");
        assert_eq!(config.service_name, "code-deployer");
    }

    #[test]
    fn test_custom_values() {
        let config = AppConfig::from_environment(environment(&[
            ("DEPLOY_APPLICATION", "app"),
            ("S3_BUCKET", "bucket"),
            ("LOG_LEVEL", "debug"),
            ("OTEL_ENABLED", "true"),
            ("OTEL_ENDPOINT", "http://collector:4317"),
            ("SERVICE_NAME", "deployer-staging"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.otel_enabled);
        assert_eq!(config.otel_endpoint, "http://collector:4317");

        let telemetry = config.telemetry_config();
        assert_eq!(telemetry.service_name, "deployer-staging");
        assert!(telemetry.otel_enabled);
    }

    #[test]
    fn test_missing_required_value_is_an_error() {
        let result = AppConfig::from_environment(environment(&[("S3_BUCKET", "bucket")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_deployer_config_rejects_blank_values() {
        let config = AppConfig::from_environment(environment(&[
            ("DEPLOY_APPLICATION", ""),
            ("S3_BUCKET", "bucket"),
        ]))
        .unwrap();

        assert!(config.deployer_config().is_err());
    }

    #[test]
    fn test_deployer_config_carries_names() {
        let config = AppConfig::from_environment(environment(&[
            ("DEPLOY_APPLICATION", "app"),
            ("S3_BUCKET", "bucket"),
        ]))
        .unwrap();

        let deployer_config = config.deployer_config().unwrap();
        assert_eq!(deployer_config.application_name.as_str(), "app");
        assert_eq!(deployer_config.artifact_bucket.as_str(), "bucket");
    }
}

//! Single-shot trigger mode: run one saved invocation payload locally.

use std::path::Path;

use anyhow::{Context, Result};
use deployer::{Deployer, InvocationId, InvocationResponse};
use serde_json::Value;
use tracing::info;

/// Feeds the JSON payload stored at `event` through `deployer` once.
///
/// The payload must be valid JSON; its *content* is validated by the deployer
/// exactly as under the Lambda runtime.
pub async fn execute(deployer: &Deployer, event: &Path) -> Result<InvocationResponse> {
    let raw = tokio::fs::read_to_string(event)
        .await
        .with_context(|| format!("failed to read event file {}", event.display()))?;
    let payload: Value = serde_json::from_str(&raw)
        .with_context(|| format!("event file {} is not valid JSON", event.display()))?;

    let invocation_id = InvocationId::new_random();
    info!(invocation_id = %invocation_id, event = %event.display(), "Replaying invocation");

    Ok(deployer.handle(&invocation_id, &payload).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use deployer::{DeployerConfig, DeploymentReceipt, MockDeploymentService};
    use serde_json::json;

    fn deployer(service: MockDeploymentService) -> Deployer {
        Deployer::new(
            DeployerConfig::new("inspector-app", "artifact-bucket").unwrap(),
            Arc::new(service),
        )
    }

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("code-deployer-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_execute_replays_saved_event() {
        let mut mock_service = MockDeploymentService::new();
        mock_service
            .expect_create_deployment()
            .times(1)
            .returning(|_| Ok(DeploymentReceipt::default()));

        let message = json!({ "detail": { "project-name": "build-orders-api", "build-status": "SUCCEEDED" } });
        let body = json!({ "Type": "Notification", "Message": message.to_string() });
        let path = scratch_file(
            "succeeded.json",
            &json!({ "Records": [ { "body": body.to_string() } ] }).to_string(),
        );

        let response = execute(&deployer(mock_service), &path).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(response.status_code, 200);
    }

    #[tokio::test]
    async fn test_execute_rejects_file_that_is_not_json() {
        let mut mock_service = MockDeploymentService::new();
        mock_service.expect_create_deployment().never();
        let path = scratch_file("garbage.json", "Records: nope");

        let result = execute(&deployer(mock_service), &path).await;
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_execute_rejects_missing_file() {
        let mut mock_service = MockDeploymentService::new();
        mock_service.expect_create_deployment().never();

        let result = execute(
            &deployer(mock_service),
            Path::new("/nonexistent/code-deployer/event.json"),
        )
        .await;

        assert!(result.is_err());
    }
}

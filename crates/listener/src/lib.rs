//! Trigger event source for the build-to-deploy bridge.
//!
//! [`LambdaEventSource`] hosts a [`deployer::Deployer`] inside the AWS Lambda
//! runtime. The function is subscribed to the build-result queue (SNS → SQS),
//! so every invocation payload is an SQS batch:
//!
//! ```text
//! { "Records": [ { "body": "<SNS notification JSON>", ... }, ... ] }
//! ```
//!
//! The payload is accepted as raw JSON rather than a typed SQS event so that a
//! malformed delivery still reaches the decoder and is answered with the
//! regular error-shaped response instead of a runtime deserialisation fault.
//!
//! Lambda freezes the execution environment as soon as a response is posted
//! and may discard it without notice, so anything buffered by the process
//! (exported spans in particular) must be drained before the handler returns.
//! [`LambdaEventSource::with_flush_hook`] registers that step.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Runtime API polling, invocation context and response
//! serialisation live here. The [`deployer`] crate sees only a JSON payload
//! and an [`InvocationId`].

use std::sync::Arc;

use deployer::{Deployer, InvocationId, InvocationResponse};
use lambda_runtime::{service_fn, Error as LambdaError, LambdaEvent};
use serde_json::Value;
use tracing::info;

/// Callback run after every invocation, before the response is posted.
pub type FlushHook = Arc<dyn Fn() + Send + Sync>;

/// Serves Lambda invocations with a shared [`Deployer`].
pub struct LambdaEventSource {
    deployer: Arc<Deployer>,
    flush: Option<FlushHook>,
}

impl LambdaEventSource {
    /// Creates an event source that hands every invocation to `deployer`.
    pub fn new(deployer: Arc<Deployer>) -> Self {
        Self {
            deployer,
            flush: None,
        }
    }

    /// Runs `flush` at the end of every invocation.
    pub fn with_flush_hook(mut self, flush: FlushHook) -> Self {
        self.flush = Some(flush);
        self
    }

    /// Handles one invocation.
    ///
    /// Always returns `Ok`: failures are reported through the response's
    /// status code, never as a runtime error.
    pub async fn handle(&self, event: LambdaEvent<Value>) -> Result<InvocationResponse, LambdaError> {
        let (payload, context) = event.into_parts();
        let invocation_id =
            InvocationId::new(context.request_id).unwrap_or_else(InvocationId::new_random);

        let response = self.deployer.handle(&invocation_id, &payload).await;
        info!(
            invocation_id = %invocation_id,
            status_code = response.status_code,
            "Invocation finished"
        );

        if let Some(flush) = &self.flush {
            flush();
        }
        Ok(response)
    }

    /// Polls the Lambda runtime API until the execution environment shuts
    /// down.
    ///
    /// # Errors
    ///
    /// Returns the runtime error that ended the polling loop (e.g. the
    /// runtime API is unreachable because the process is not running inside
    /// Lambda).
    pub async fn run(self) -> Result<(), LambdaError> {
        let source = Arc::new(self);
        lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
            let source = Arc::clone(&source);
            async move { source.handle(event).await }
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use deployer::{DeployerConfig, DeploymentReceipt, DispatchError, MockDeploymentService};
    use lambda_runtime::Context;
    use serde_json::json;

    fn deployer(service: MockDeploymentService) -> Arc<Deployer> {
        let config = DeployerConfig::new("inspector-app", "artifact-bucket").unwrap();
        Arc::new(Deployer::new(config, Arc::new(service)))
    }

    fn sqs_event(project: &str, status: &str) -> Value {
        let message = json!({ "detail": { "project-name": project, "build-status": status } });
        let body = json!({ "Type": "Notification", "Message": message.to_string() });
        json!({
            "Records": [ {
                "messageId": "059f36b4-87a3-44ab-83d2-661975830a7d",
                "receiptHandle": "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a",
                "body": body.to_string(),
                "eventSource": "aws:sqs",
                "awsRegion": "ap-northeast-2"
            } ]
        })
    }

    fn context_with_request_id(request_id: &str) -> Context {
        let mut context = Context::default();
        context.request_id = request_id.to_string();
        context
    }

    #[tokio::test]
    async fn test_handle_returns_success_response() {
        // Arrange
        let mut mock_service = MockDeploymentService::new();
        mock_service
            .expect_create_deployment()
            .times(1)
            .returning(|_| Ok(DeploymentReceipt::default()));
        let source = LambdaEventSource::new(deployer(mock_service));
        let event = LambdaEvent::new(
            sqs_event("build-orders-api", "SUCCEEDED"),
            context_with_request_id("52fdfc07-2182-154f-163f-5f0f9a621d72"),
        );

        // Act
        let response = source.handle(event).await.unwrap();

        // Assert
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "statusCode": 200, "body": "\"Deploy successful\"" })
        );
    }

    #[tokio::test]
    async fn test_handle_reports_dispatch_fault_without_runtime_error() {
        let mut mock_service = MockDeploymentService::new();
        mock_service.expect_create_deployment().times(1).returning(|_| {
            Err(DispatchError::Transport {
                message: "dispatch failure: connection refused".to_string(),
            })
        });
        let source = LambdaEventSource::new(deployer(mock_service));
        let event = LambdaEvent::new(
            sqs_event("build-orders-api", "SUCCEEDED"),
            Context::default(),
        );

        let response = source.handle(event).await.unwrap();

        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.message().as_deref(),
            Some("An error occurred during the deployment process")
        );
    }

    #[tokio::test]
    async fn test_handle_answers_non_sqs_payload_with_extraction_failure() {
        let mut mock_service = MockDeploymentService::new();
        mock_service.expect_create_deployment().never();
        let source = LambdaEventSource::new(deployer(mock_service));
        let event = LambdaEvent::new(json!("ping"), Context::default());

        let response = source.handle(event).await.unwrap();

        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.message().as_deref(),
            Some("Data extraction or conversion failed")
        );
    }

    #[tokio::test]
    async fn test_handle_reports_failed_build() {
        let mut mock_service = MockDeploymentService::new();
        mock_service.expect_create_deployment().never();
        let source = LambdaEventSource::new(deployer(mock_service));
        let event = LambdaEvent::new(
            sqs_event("build-orders-api", "FAILED"),
            context_with_request_id("c6af9ac6-7b61-11e6-9a41-93e812345678"),
        );

        let response = source.handle(event).await.unwrap();

        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, "\"Build failed\"");
    }

    #[tokio::test]
    async fn test_flush_hook_runs_once_per_invocation() {
        let mut mock_service = MockDeploymentService::new();
        mock_service
            .expect_create_deployment()
            .times(1)
            .returning(|_| Ok(DeploymentReceipt::default()));
        let flushes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&flushes);
        let source = LambdaEventSource::new(deployer(mock_service)).with_flush_hook(Arc::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        ));

        source
            .handle(LambdaEvent::new(
                sqs_event("build-orders-api", "SUCCEEDED"),
                Context::default(),
            ))
            .await
            .unwrap();
        assert_eq!(flushes.load(Ordering::SeqCst), 1);

        // Error-shaped responses are flushed too.
        let response = source
            .handle(LambdaEvent::new(json!({}), Context::default()))
            .await
            .unwrap();
        assert_eq!(response.status_code, 500);
        assert_eq!(flushes.load(Ordering::SeqCst), 2);
    }
}

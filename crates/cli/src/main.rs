//! `code-deployer` entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: read `DEPLOY_APPLICATION`, `S3_BUCKET` and the
//!    telemetry settings from the environment and validate them.
//! 2. **Wire observability**: configure `tracing-subscriber` with a JSON layer
//!    and, when enabled, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: create the `CodeDeployClient` and inject
//!    it into a `Deployer`.
//! 4. **Select trigger mode**:
//!    - `serve` (default): poll the Lambda runtime API with a
//!      `LambdaEventSource`, flushing exported spans after every invocation.
//!    - `replay --event <file>`: run one saved payload and print the response.

mod config;
mod replay;
mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use codedeploy::CodeDeployClient;
use deployer::Deployer;
use listener::LambdaEventSource;
use opentelemetry_sdk::trace::TracerProvider as SdkTracerProvider;
use tracing::{error, info};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "code-deployer",
    version,
    about = "Deploys successful builds announced on the build-result queue"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (error, warn, info, debug, trace); overrides LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Serve invocations from the AWS Lambda runtime (default)
    Serve,
    /// Run one saved invocation payload and print the response
    Replay {
        /// Path to a JSON file holding the invocation payload
        #[arg(long)]
        event: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::from_env().context("failed to load configuration")?;
    if let Some(level) = cli.log_level {
        app_config.log_level = level;
    }

    let providers = telemetry::init_telemetry(&app_config.telemetry_config())?;

    let result = run(
        cli.command.unwrap_or(Commands::Serve),
        &app_config,
        providers.as_ref(),
    )
    .await;
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "code-deployer stopped");
    }

    telemetry::shutdown_telemetry(providers);
    result
}

async fn run(
    command: Commands,
    app_config: &AppConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<()> {
    let deployer_config = app_config.deployer_config()?;
    info!(
        application_name = %deployer_config.application_name,
        artifact_bucket = %deployer_config.artifact_bucket,
        "Configuration loaded"
    );

    let service = CodeDeployClient::from_env().await;
    let deployer = Arc::new(Deployer::new(deployer_config, Arc::new(service)));

    match command {
        Commands::Serve => {
            info!("Serving Lambda invocations");
            let mut source = LambdaEventSource::new(deployer);
            if let Some(provider) = tracer_provider {
                let provider = provider.clone();
                source = source
                    .with_flush_hook(Arc::new(move || telemetry::flush_telemetry(&provider)));
            }
            source
                .run()
                .await
                .map_err(|e| anyhow!("Lambda runtime failed: {e}"))
        }
        Commands::Replay { event } => {
            let response = replay::execute(&deployer, &event).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["code-deployer"]).unwrap();
        assert_eq!(cli.command.unwrap_or(Commands::Serve), Commands::Serve);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_replay_requires_event_path() {
        assert!(Cli::try_parse_from(["code-deployer", "replay"]).is_err());

        let cli = Cli::try_parse_from([
            "code-deployer",
            "replay",
            "--event",
            "events/succeeded.json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Replay {
                event: PathBuf::from("events/succeeded.json")
            })
        );
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}

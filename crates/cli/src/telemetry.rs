//! Observability wiring: JSON logs on stdout, optional OTLP span export.

use anyhow::Result;
use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider as SdkTracerProvider},
    Resource,
};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for telemetry initialization
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub otel_endpoint: String,
    pub otel_enabled: bool,
    pub log_level: String,
}

/// Initialize tracing.
///
/// `RUST_LOG` takes precedence over `log_level`. When OTel is enabled, spans
/// are also exported over OTLP/gRPC and the returned provider must be passed
/// to [`shutdown_telemetry`] so pending spans are flushed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<Option<SdkTracerProvider>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if !config.otel_enabled {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_fmt_layer())
            .init();
        return Ok(None);
    }

    let resource = Resource::new(vec![KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otel_endpoint)
        .build()?;

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    let tracer = tracer_provider.tracer("code-deployer");
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .with(json_fmt_layer())
        .init();

    Ok(Some(tracer_provider))
}

// Lambda forwards stdout to CloudWatch; one JSON object per line.
fn json_fmt_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
}

/// Drains spans still held by the batch exporter.
///
/// Runs between Lambda invocations; the environment may be frozen or
/// discarded as soon as the response is posted. Must be called from a
/// multi-threaded runtime.
pub fn flush_telemetry(provider: &SdkTracerProvider) {
    let results = tokio::task::block_in_place(|| provider.force_flush());
    for result in results {
        if let Err(e) = result {
            warn!(error = %e, "Failed to flush spans");
        }
    }
}

/// Flush and stop span export.
pub fn shutdown_telemetry(provider: Option<SdkTracerProvider>) {
    if let Some(provider) = provider {
        if let Err(e) = provider.shutdown() {
            eprintln!("Error shutting down tracer provider: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_flush_without_exporters_is_a_no_op() {
        let provider = SdkTracerProvider::builder().build();

        flush_telemetry(&provider);
        flush_telemetry(&provider);

        shutdown_telemetry(Some(provider));
    }
}

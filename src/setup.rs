use std::{env, error::Error};

#[cfg(feature = "otlp")]
use opentelemetry::{global, trace::TraceError, KeyValue};
#[cfg(feature = "otlp")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "otlp")]
use opentelemetry_sdk::{runtime, trace::Tracer, Resource};
use tracing_core::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Sets up logging, so every event emitted while handling a request carries
/// the trace ids of its hop.
///
/// The filter is read from `RUST_LOG` and defaults to `info`. With the `otlp`
/// feature the request spans are additionally exported via otlp. The service
/// name can then be configured using the env var `SERVICE_NAME`, otherwise the
/// cargo name will be used. By default, everything is exported to
/// `http://localhost:4317`. This can be changed via env var
/// `OTEL_EXPORTER_OTLP_ENDPOINT`.
///
/// This should generally be the first statement of any server binary's main
/// function.
pub fn setup() -> Result<(), Box<dyn Error>> {
    let service = env::var("SERVICE_NAME").unwrap_or(env!("CARGO_PKG_NAME").to_string());

    let registry = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy()
        }))
        .with(tracing_subscriber::fmt::layer());

    #[cfg(feature = "otlp")]
    let registry = {
        let endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or("http://localhost:4317".to_string());
        let tracer = init_tracer(service.clone(), endpoint)?;
        registry.with(tracing_opentelemetry::layer().with_tracer(tracer))
    };

    registry.try_init()?;

    tracing::info!(%service, "starting server");
    Ok(())
}

#[cfg(feature = "otlp")]
fn init_tracer(service: String, endpoint: String) -> Result<Tracer, TraceError> {
    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(
            opentelemetry_sdk::trace::config().with_resource(Resource::new(vec![KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                service,
            )])),
        )
        .install_batch(runtime::Tokio)
}

/// Flushes exported spans. Call before the server binary exits.
pub fn teardown() {
    #[cfg(feature = "otlp")]
    global::shutdown_tracer_provider();
}

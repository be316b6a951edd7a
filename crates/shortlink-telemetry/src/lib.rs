//! Process-wide tracing setup shared by the shortlink binaries.
//!
//! Every binary calls [`init`] once at startup. Events go to stdout as
//! either human readable or JSON lines, filtered by `RUST_LOG` when it is
//! set. When an OTLP endpoint is configured, spans are also exported over
//! OTLP/HTTP so a request can be followed across the gateway and the
//! shortener.

mod config;
mod error;

pub use config::{LogFormat, TelemetryArgs, TelemetryConfig};
pub use error::TelemetryError;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the span exporter alive. Pending spans are flushed on drop.
#[must_use = "dropping the guard stops span export"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn exports_spans(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to shut down span exporter: {err}");
            }
        }
    }
}

/// Installs the global subscriber.
///
/// Fails if a global subscriber is already set or the exporter cannot be
/// built.
pub fn init(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(config.format)];

    let provider = match &config.otlp_endpoint {
        Some(endpoint) => {
            let provider = tracer_provider(&config.service_name, endpoint)?;
            let tracer = provider.tracer(config.service_name.clone());
            layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
            Some(provider)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    tracing::debug!(
        service_name = %config.service_name,
        format = %config.format,
        otlp = provider.is_some(),
        "telemetry initialized"
    );

    Ok(TelemetryGuard { provider })
}

fn fmt_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
    }
}

/// `endpoint` is the full OTLP/HTTP traces URL, e.g.
/// `http://localhost:4318/v1/traces`.
fn tracer_provider(
    service_name: &str,
    endpoint: &str,
) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpJson)
        .with_endpoint(endpoint)
        .build()?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_without_exporter_is_inert() {
        let guard = TelemetryGuard { provider: None };
        assert!(!guard.exports_spans());
        drop(guard);
    }

    #[test]
    fn second_init_fails() {
        let config = TelemetryConfig::builder()
            .service_name("telemetry-test")
            .build();

        let _guard = init(&config).unwrap();
        let err = init(&config).err().unwrap();
        assert!(matches!(err, TelemetryError::Subscriber(_)));
    }
}

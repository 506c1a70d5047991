//! Tracing subscriber and telemetry lifecycle management.

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace::SdkTracerProvider};
use tracing::{error, info};

use crate::config::ServerConfig;

use super::{ObservabilityError, logging, otel, settings};

/// Keeps the tracer provider alive until shutdown flushes it.
#[derive(Debug)]
pub(crate) struct Observability {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Observability {
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        let observability = &config.observability;

        settings::apply_runtime_config(observability);

        let tracer_provider = observability
            .otel_enabled
            .then(|| otel::build_tracer_provider(observability))
            .transpose()?;

        if tracer_provider.is_some() {
            global::set_text_map_propagator(TraceContextPropagator::new());
        }

        logging::init_subscriber(config, tracer_provider.as_ref())?;

        info!(
            otel_enabled = observability.otel_enabled,
            endpoint = %observability.otel_exporter_otlp_endpoint,
            sample_ratio = observability.sample_ratio(),
            "observability initialised"
        );

        Ok(Self { tracer_provider })
    }

    /// Flush pending spans. Call once, after the server has stopped.
    pub(crate) fn shutdown(self) {
        if let Some(provider) = self.tracer_provider
            && let Err(error) = provider.shutdown()
        {
            error!(%error, "failed to shut down tracer provider");
        }
    }
}

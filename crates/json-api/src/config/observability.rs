//! Observability Config

use std::time::Duration;

use clap::{ArgAction, Args};

/// Tracing export and request logging settings.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export traces over OTLP
    #[arg(long, env = "OTEL_ENABLED", default_value_t = false, action = ArgAction::Set)]
    pub otel_enabled: bool,

    /// Continue traces from an incoming `traceparent` header
    #[arg(
        long,
        env = "OTEL_PARENT_PROPAGATION_ENABLED",
        default_value_t = false,
        action = ArgAction::Set
    )]
    pub otel_parent_propagation_enabled: bool,

    /// OTLP gRPC endpoint
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub otel_exporter_otlp_endpoint: String,

    /// OTLP export timeout in seconds
    #[arg(long, env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS", default_value_t = 3)]
    pub otel_exporter_otlp_timeout_seconds: u64,

    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "shopfront-json")]
    pub otel_service_name: String,

    #[arg(long, env = "OTEL_SERVICE_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub otel_service_version: String,

    #[arg(long, env = "OTEL_DEPLOYMENT_ENVIRONMENT", default_value = "development")]
    pub otel_deployment_environment: String,

    /// Fraction of root traces to sample, clamped to [0.0, 1.0]
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0)]
    pub otel_trace_sample_ratio: f64,

    /// Requests slower than this are logged as warnings
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000)]
    pub slow_request_threshold_ms: u64,
}

impl ObservabilityConfig {
    /// Sampling ratio usable by the sampler. NaN falls back to sampling everything.
    #[must_use]
    pub fn sample_ratio(&self) -> f64 {
        if self.otel_trace_sample_ratio.is_nan() {
            return 1.0;
        }

        self.otel_trace_sample_ratio.clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn exporter_timeout(&self) -> Duration {
        Duration::from_secs(self.otel_exporter_otlp_timeout_seconds)
    }

    /// Whether incoming trace context should be honoured. Only meaningful when
    /// spans are exported.
    #[must_use]
    pub fn propagate_parent(&self) -> bool {
        self.otel_enabled && self.otel_parent_propagation_enabled
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        observability: ObservabilityConfig,
    }

    fn parse(args: &[&str]) -> Result<ObservabilityConfig, clap::Error> {
        let argv = std::iter::once("test").chain(args.iter().copied());

        Harness::try_parse_from(argv).map(|harness| harness.observability)
    }

    fn with_ratio(ratio: f64) -> Result<ObservabilityConfig, clap::Error> {
        let mut config = parse(&[])?;
        config.otel_trace_sample_ratio = ratio;

        Ok(config)
    }

    #[test]
    fn export_is_off_by_default() -> TestResult {
        let config = parse(&[])?;

        assert!(!config.otel_enabled, "export should be opt-in");
        assert!(!config.propagate_parent(), "nothing to propagate into");
        assert_eq!(config.exporter_timeout(), Duration::from_secs(3));

        Ok(())
    }

    #[test]
    fn propagation_requires_export() -> TestResult {
        let config = parse(&["--otel-parent-propagation-enabled", "true"])?;
        assert!(!config.propagate_parent(), "export is still off");

        let config = parse(&[
            "--otel-enabled",
            "true",
            "--otel-parent-propagation-enabled",
            "true",
        ])?;
        assert!(config.propagate_parent(), "both flags set");

        Ok(())
    }

    #[test]
    fn sample_ratio_is_clamped_to_unit_range() -> TestResult {
        for (raw, expected) in [(-0.5, 0.0), (0.25, 0.25), (7.0, 1.0), (f64::NAN, 1.0)] {
            let actual = with_ratio(raw)?.sample_ratio();

            assert!((actual - expected).abs() < f64::EPSILON, "{raw} -> {actual}");
        }

        Ok(())
    }
}

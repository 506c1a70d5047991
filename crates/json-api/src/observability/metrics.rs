//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use shopfront_app::errors::ErrorKind;
use tracing::error;

/// Checkout is a single transaction plus a few catalog reads, so most requests land
/// well under a second.
const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct ShopMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    checkouts_total: IntCounterVec,
}

static SHOP_METRICS: OnceLock<Option<ShopMetrics>> = OnceLock::new();

/// Result of a checkout attempt, as counted by `shopfront_json_checkouts_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckoutOutcome {
    Placed,
    Rejected(ErrorKind),
}

impl CheckoutOutcome {
    fn label(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Rejected(kind) => kind.code(),
        }
    }
}

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

pub(crate) fn observe_checkout(outcome: CheckoutOutcome) {
    let Some(metrics) = metrics() else {
        return;
    };

    metrics
        .checkouts_total
        .with_label_values(&[outcome.label()])
        .inc();
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();

    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metric_families, &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let content_type = match HeaderValue::from_str(encoder.format_type()) {
        Ok(value) => value,
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static ShopMetrics> {
    SHOP_METRICS
        .get_or_init(|| {
            ShopMetrics::register()
                .inspect_err(|error| error!(%error, "metrics disabled: registration failed"))
                .ok()
        })
        .as_ref()
}

impl ShopMetrics {
    fn register() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("shopfront_json".to_string()), None)?;

        let requests_total = IntCounterVec::new(
            Opts::new(
                "http_requests_total",
                "HTTP requests by method, route, status class and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?;

        let requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "HTTP requests currently being handled.",
        )?;

        let checkouts_total = IntCounterVec::new(
            Opts::new(
                "checkouts_total",
                "Checkout attempts by outcome: placed, or the rejection error code.",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(requests_in_flight.clone()))?;
        registry.register(Box::new(checkouts_total.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            requests_in_flight,
            checkouts_total,
        })
    }
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    async fn scrape() -> Result<String, salvo::Error> {
        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_metrics() -> TestResult {
        observe_request("GET", "/cart", 200, 0.042);
        observe_request("POST", "/orders", 503, 0.123);

        let response = scrape().await?;

        assert!(
            response.contains("shopfront_json_http_requests_total"),
            "expected requests_total metric in response"
        );
        assert!(
            response.contains("shopfront_json_http_request_duration_seconds"),
            "expected request_duration metric in response"
        );
        assert!(
            response.contains("shopfront_json_http_requests_in_flight"),
            "expected in-flight metric in response"
        );

        Ok(())
    }

    #[tokio::test]
    async fn checkout_outcomes_are_labelled_by_error_code() -> TestResult {
        observe_checkout(CheckoutOutcome::Placed);
        observe_checkout(CheckoutOutcome::Rejected(ErrorKind::EmptyCart));

        let response = scrape().await?;

        assert!(
            response.contains(r#"shopfront_json_checkouts_total{outcome="placed"}"#),
            "expected placed outcome in response"
        );
        assert!(
            response.contains(r#"shopfront_json_checkouts_total{outcome="empty_cart"}"#),
            "expected empty_cart outcome in response"
        );

        Ok(())
    }

    #[test]
    fn status_classes() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(409), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(42), "other");
    }
}

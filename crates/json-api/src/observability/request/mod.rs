//! Per-request span, completion logging and HTTP metrics.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Scrapes and liveness probes arrive every few seconds and would bury real traffic.
const UNTRACED_PATHS: [&str; 2] = ["/metrics", "/healthcheck"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Ok,
    ClientError,
    ServerError,
}

impl From<StatusCode> for Severity {
    fn from(status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::ServerError
        } else if status.is_client_error() {
            Self::ClientError
        } else {
            Self::Ok
        }
    }
}

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let path = req.uri().path().to_owned();

    if UNTRACED_PATHS.contains(&path.as_str()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();
    let _in_flight = metrics::InFlightRequestGuard::track();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());
    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let names = spans::request_span_name(&method, &path);

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %names.otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %req.remote_addr(),
        user_uuid = tracing::field::Empty,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if settings::propagate_parent()
        && let Some(parent) = parent_context::extract_parent_context(req.headers())
        && let Err(error) = span.set_parent(parent)
    {
        warn!(%error, "failed to attach remote parent to request span");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let elapsed = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);

    metrics::observe_request(
        &method,
        &names.otel_path,
        status.as_u16(),
        elapsed.as_secs_f64(),
    );

    log_completion(&span, status, elapsed, settings::slow_request_threshold());
}

fn log_completion(span: &Span, status: StatusCode, elapsed: Duration, slow_after: Duration) {
    let code = status.as_u16();
    let duration_ms = elapsed.as_millis();

    span.record("status", code);
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        match Severity::from(status) {
            Severity::ServerError => error!(status = code, duration_ms, "request failed"),
            Severity::ClientError => warn!(status = code, duration_ms, "request rejected"),
            Severity::Ok => info!(status = code, duration_ms, "request completed"),
        }

        if elapsed > slow_after {
            warn!(
                duration_ms,
                threshold_ms = slow_after.as_millis(),
                "slow request"
            );
        }
    });
}

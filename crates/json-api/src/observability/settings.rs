//! Process-global observability runtime settings.
//!
//! Request middleware is a plain salvo handler with no access to the parsed config,
//! so the few values it needs are copied here at startup.

use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::Duration,
};

use crate::config::observability::ObservabilityConfig;

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(1_000);
static PROPAGATE_PARENT: AtomicBool = AtomicBool::new(false);

pub(super) fn apply_runtime_config(config: &ObservabilityConfig) {
    SLOW_REQUEST_THRESHOLD_MS.store(config.slow_request_threshold_ms, Ordering::Relaxed);
    PROPAGATE_PARENT.store(config.propagate_parent(), Ordering::Relaxed);
}

pub(super) fn slow_request_threshold() -> Duration {
    Duration::from_millis(SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed))
}

pub(super) fn propagate_parent() -> bool {
    PROPAGATE_PARENT.load(Ordering::Relaxed)
}

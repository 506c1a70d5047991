//! W3C `traceparent` extraction from incoming headers.

use opentelemetry::{
    Context,
    propagation::{Extractor, TextMapPropagator as _},
    trace::TraceContextExt as _,
};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use salvo::http::{HeaderMap, HeaderName};

/// The remote parent described by `headers`, if they carry a valid one.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    // Start from an empty context so a request without trace headers never
    // inherits whatever span happens to be active on this task.
    let context =
        TraceContextPropagator::new().extract_with_context(&Context::new(), &Headers(headers));

    let valid = context.span().span_context().is_valid();

    valid.then_some(context)
}

#[derive(Debug)]
struct Headers<'a>(&'a HeaderMap);

impl Extractor for Headers<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

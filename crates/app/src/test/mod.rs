//! Test support for service-level integration tests.

mod context;

pub(crate) use context::TestContext;

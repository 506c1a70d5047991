//! Catalog Items
//!
//! Public, read-only catalog browsing.

mod errors;
mod handlers;

pub(crate) use handlers::*;

//! Carts
//!
//! Each user owns at most one open cart. Every mutation runs in a single
//! transaction that locks the cart row first, so concurrent changes to the
//! same cart are serialized.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;

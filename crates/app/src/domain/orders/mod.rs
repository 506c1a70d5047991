//! Orders
//!
//! Orders are immutable snapshots of a cart taken at checkout.

pub mod checkout;
pub mod data;
pub mod errors;
pub mod events;
pub mod records;
mod repositories;
pub mod service;

pub use checkout::*;
pub use errors::{CheckoutError, OrdersServiceError};
pub use service::*;

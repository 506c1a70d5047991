//! Carts
//!
//! The cart is always the caller's own open cart, so no route carries a cart id.

mod errors;
mod handlers;
pub(crate) mod items;

pub(crate) use handlers::*;

//! Commerce policy shared by carts and checkout.

use crate::domain::{orders::records::OrderStatus, pricing::PricingPolicy};

/// Tunable rules for pricing, stock and order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommercePolicy {
    pub pricing: PricingPolicy,

    /// Reject adds and checkouts that exceed the catalog's available quantity.
    pub enforce_stock: bool,

    /// Status given to orders created by checkout.
    pub initial_order_status: OrderStatus,
}

impl Default for CommercePolicy {
    fn default() -> Self {
        Self {
            pricing: PricingPolicy::default(),
            enforce_stock: true,
            initial_order_status: OrderStatus::Pending,
        }
    }
}

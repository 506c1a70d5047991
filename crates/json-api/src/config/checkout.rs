//! Checkout Policy Config

use clap::{ArgAction, Args};
use rust_decimal::Decimal;
use shopfront_app::domain::{
    orders::records::OrderStatus, policy::CommercePolicy, pricing::PricingPolicy,
};

/// Pricing, stock and order settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Tax rate applied to the subtotal, e.g. 0.10 for 10%
    #[arg(long, env = "TAX_RATE", default_value = "0.10", value_parser = parse_tax_rate)]
    pub tax_rate: Decimal,

    /// Subtotal (minor units) above which shipping is free
    #[arg(long, env = "FREE_SHIPPING_THRESHOLD", default_value_t = 50_00)]
    pub free_shipping_threshold: u64,

    /// Shipping fee (minor units) charged at or below the threshold
    #[arg(long, env = "FLAT_SHIPPING_FEE", default_value_t = 4_99)]
    pub flat_shipping_fee: u64,

    /// Reject quantities above the catalog's available stock
    #[arg(long, env = "ENFORCE_STOCK", default_value_t = true, action = ArgAction::Set)]
    pub enforce_stock: bool,

    /// Status given to newly placed orders: `pending` or `completed`
    #[arg(
        long,
        env = "ORDER_INITIAL_STATUS",
        default_value = "pending",
        value_parser = parse_initial_status
    )]
    pub order_initial_status: OrderStatus,
}

impl CheckoutConfig {
    #[must_use]
    pub fn policy(&self) -> CommercePolicy {
        CommercePolicy {
            pricing: PricingPolicy {
                tax_rate: self.tax_rate,
                free_shipping_threshold: self.free_shipping_threshold,
                flat_shipping_fee: self.flat_shipping_fee,
            },
            enforce_stock: self.enforce_stock,
            initial_order_status: self.order_initial_status,
        }
    }
}

fn parse_tax_rate(value: &str) -> Result<Decimal, String> {
    let rate = value
        .parse::<Decimal>()
        .map_err(|error| format!("invalid tax rate: {error}"))?;

    if rate.is_sign_negative() {
        return Err("tax rate cannot be negative".to_string());
    }

    Ok(rate)
}

/// Later statuses belong to fulfillment, so an order can only start out
/// awaiting payment or already settled.
fn parse_initial_status(value: &str) -> Result<OrderStatus, String> {
    match value.parse::<OrderStatus>() {
        Ok(status @ (OrderStatus::Pending | OrderStatus::Completed)) => Ok(status),
        Ok(status) => Err(format!(
            "`{status}` cannot be an initial order status, use `pending` or `completed`"
        )),
        Err(error) => Err(error.to_string()),
    }
}

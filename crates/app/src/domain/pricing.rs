//! Cart and order totals.
//!
//! Amounts are minor units. Tax is rounded half away from zero to a whole
//! minor unit; every other component is already whole.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Tax and shipping rules applied to a set of priced lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax, e.g. `0.10`.
    pub tax_rate: Decimal,

    /// Subtotals strictly above this ship for free.
    pub free_shipping_threshold: u64,

    /// Charged when the cart has lines and the subtotal is at or below the threshold.
    pub flat_shipping_fee: u64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            free_shipping_threshold: 50_00,
            flat_shipping_fee: 4_99,
        }
    }
}

/// Derived totals for a cart or order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,
}

/// A unit price and a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub price: u64,
    pub quantity: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("amount overflow while computing totals")]
    Overflow,

    #[error("tax rate must not be negative")]
    NegativeTaxRate,
}

impl PricingPolicy {
    /// Compute totals for the given lines.
    pub fn totals<I>(&self, lines: I) -> Result<Totals, PricingError>
    where
        I: IntoIterator<Item = PricedLine>,
    {
        let mut has_lines = false;
        let mut subtotal: u64 = 0;

        for line in lines {
            has_lines = true;

            let amount = line
                .price
                .checked_mul(u64::from(line.quantity))
                .ok_or(PricingError::Overflow)?;

            subtotal = subtotal.checked_add(amount).ok_or(PricingError::Overflow)?;
        }

        let tax = self.tax_on(subtotal)?;

        let shipping = if !has_lines || subtotal > self.free_shipping_threshold {
            0
        } else {
            self.flat_shipping_fee
        };

        let total = subtotal
            .checked_add(tax)
            .and_then(|amount| amount.checked_add(shipping))
            .ok_or(PricingError::Overflow)?;

        Ok(Totals {
            subtotal,
            tax,
            shipping,
            total,
        })
    }

    fn tax_on(&self, subtotal: u64) -> Result<u64, PricingError> {
        if self.tax_rate.is_sign_negative() {
            return Err(PricingError::NegativeTaxRate);
        }

        let applied = self
            .tax_rate
            .checked_mul(Decimal::from(subtotal))
            .ok_or(PricingError::Overflow)?;

        applied
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .ok_or(PricingError::Overflow)
    }
}

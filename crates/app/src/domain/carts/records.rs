//! Cart Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{
        catalog::records::ItemUuid,
        pricing::{PricedLine, Totals},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStatus {
    Open,
    CheckedOut,
}

impl CartStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::CheckedOut => "checked_out",
        }
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown cart status `{0}`")]
pub struct UnknownCartStatus(String);

impl FromStr for CartStatus {
    type Err = UnknownCartStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(Self::Open),
            "checked_out" => Ok(Self::CheckedOut),
            other => Err(UnknownCartStatus(other.to_string())),
        }
    }
}

/// Cart Record
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub status: CartStatus,

    /// Lines in insertion order.
    pub items: Vec<CartItemRecord>,

    pub subtotal: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,

    /// Bumped on every mutation; checkout closes the cart only if unchanged.
    pub version: i64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub closed_at: Option<Timestamp>,
}

impl CartRecord {
    #[must_use]
    pub const fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            total: self.total,
        }
    }
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Line Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub item_uuid: ItemUuid,
    pub quantity: u32,

    /// Unit price captured when the item was last added.
    pub price: u64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItemRecord {
    #[must_use]
    pub const fn priced_line(&self) -> PricedLine {
        PricedLine {
            price: self.price,
            quantity: self.quantity,
        }
    }
}

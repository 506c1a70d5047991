//! Order Data

use crate::domain::{
    carts::records::CartUuid,
    catalog::records::ItemUuid,
    orders::records::{OrderStatus, OrderUuid},
    pricing::{PricedLine, Totals},
    users::records::UserUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub cart_uuid: CartUuid,
    pub status: OrderStatus,
    pub totals: Totals,
}

/// A cart line re-priced against the catalog at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub item_uuid: ItemUuid,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
}

impl NewOrderItem {
    #[must_use]
    pub const fn priced_line(&self) -> PricedLine {
        PricedLine {
            price: self.price,
            quantity: self.quantity,
        }
    }
}

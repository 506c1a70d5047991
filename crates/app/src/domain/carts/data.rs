//! Cart Data

use crate::domain::catalog::records::ItemUuid;

/// Request to add units of a catalog item to the open cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub item_uuid: ItemUuid,

    /// Units to add; must be at least one.
    pub quantity: i32,
}

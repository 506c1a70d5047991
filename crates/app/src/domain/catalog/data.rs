//! Catalog Data

use crate::domain::catalog::records::ItemUuid;

/// New Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub uuid: ItemUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub available: u32,
}

/// Partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub available: Option<u32>,
}

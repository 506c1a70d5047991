//! Catalog Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Catalog Item UUID
pub type ItemUuid = TypedUuid<ItemRecord>;

/// Catalog Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub uuid: ItemUuid,
    pub name: String,
    pub description: String,

    /// Current unit price in minor units.
    pub price: u64,

    /// Units currently available for sale.
    pub available: u32,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

//! Shopfront Domain Concerns

pub mod carts;
pub mod catalog;
pub(crate) mod columns;
pub mod orders;
pub mod policy;
pub mod pricing;
pub mod users;

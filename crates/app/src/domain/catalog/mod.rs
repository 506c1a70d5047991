//! Catalog
//!
//! Items are owned by catalog administration. Carts and checkout only ever
//! read them through [`CatalogReader`].

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;

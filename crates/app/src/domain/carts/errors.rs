//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind as SqlErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{catalog::CatalogServiceError, catalog::records::ItemUuid, pricing::PricingError},
    errors::ErrorKind,
};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity must be between 1 and {}", i32::MAX)]
    InvalidQuantity,

    #[error("item not found")]
    ItemNotFound,

    #[error("item is not in the cart")]
    NotInCart,

    #[error("no open cart")]
    NoActiveCart,

    #[error("only {available} of item {item} available, {requested} requested")]
    OutOfStock {
        item: ItemUuid,
        requested: u32,
        available: u32,
    },

    #[error("could not compute cart totals")]
    Pricing(#[from] PricingError),

    #[error("catalog lookup failed")]
    Catalog(#[source] CatalogServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl CartsServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuantity | Self::Pricing(_) => ErrorKind::InvalidArgument,
            Self::ItemNotFound | Self::NotInCart => ErrorKind::NotFound,
            Self::NoActiveCart => ErrorKind::NoActiveCart,
            Self::OutOfStock { .. } => ErrorKind::OutOfStock,
            Self::Catalog(error) => error.kind(),
            Self::Sql(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<CatalogServiceError> for CartsServiceError {
    fn from(error: CatalogServiceError) -> Self {
        match error {
            CatalogServiceError::NotFound => Self::ItemNotFound,
            other => Self::Catalog(other),
        }
    }
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::Encode(_)) {
            return Self::InvalidQuantity;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(SqlErrorKind::CheckViolation) => Self::InvalidQuantity,
            _ => Self::Sql(error),
        }
    }
}

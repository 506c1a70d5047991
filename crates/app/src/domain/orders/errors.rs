//! Orders and checkout errors.

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
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Sql(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("no open cart")]
    NoActiveCart,

    #[error("cart is empty")]
    EmptyCart,

    #[error("item {item} is no longer available")]
    ItemUnavailable { item: ItemUuid },

    #[error("only {available} of item {item} available, {requested} requested")]
    OutOfStock {
        item: ItemUuid,
        requested: u32,
        available: u32,
    },

    #[error("cart changed or was checked out concurrently")]
    ConflictingCheckout,

    #[error("could not compute order totals")]
    Pricing(#[from] PricingError),

    #[error("catalog lookup failed")]
    Catalog(#[source] CatalogServiceError),

    #[error("could not encode order event")]
    EventPayload(#[from] serde_json::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl CheckoutError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoActiveCart => ErrorKind::NoActiveCart,
            Self::EmptyCart => ErrorKind::EmptyCart,
            Self::ItemUnavailable { .. } => ErrorKind::ItemUnavailable,
            Self::OutOfStock { .. } => ErrorKind::OutOfStock,
            Self::ConflictingCheckout => ErrorKind::ConflictingCheckout,
            Self::Pricing(_) => ErrorKind::InvalidArgument,
            Self::Catalog(error) => error.kind(),
            Self::EventPayload(_) | Self::Sql(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<CatalogServiceError> for CheckoutError {
    fn from(error: CatalogServiceError) -> Self {
        Self::Catalog(error)
    }
}

impl From<Error> for CheckoutError {
    fn from(error: Error) -> Self {
        // `orders.cart_uuid` is unique: a second order for the same cart lost a race.
        match error.as_database_error().map(DatabaseError::kind) {
            Some(SqlErrorKind::UniqueViolation) => Self::ConflictingCheckout,
            _ => Self::Sql(error),
        }
    }
}

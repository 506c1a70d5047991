//! Errors

use salvo::http::StatusError;
use shopfront_app::{
    domain::orders::{CheckoutError, OrdersServiceError},
    errors::ErrorKind,
};
use tracing::{error, warn};

use crate::errors::status_error;

const UNAVAILABLE: &str = "Order storage is temporarily unavailable";

pub(crate) fn checkout_status_error(error: CheckoutError) -> StatusError {
    let kind = error.kind();

    match &error {
        CheckoutError::Sql(source) => error!("checkout storage failure: {source}"),
        CheckoutError::EventPayload(source) => error!("failed to encode order event: {source}"),
        CheckoutError::Catalog(source) => error!("catalog lookup failed during checkout: {source}"),
        CheckoutError::ConflictingCheckout => warn!("checkout lost a race with a concurrent change"),
        _ => {}
    }

    let brief = if kind == ErrorKind::StorageFailure {
        UNAVAILABLE.to_string()
    } else {
        error.to_string()
    };

    status_error(kind, brief)
}

pub(crate) fn orders_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => status_error(ErrorKind::NotFound, "Order not found"),
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            status_error(ErrorKind::StorageFailure, UNAVAILABLE)
        }
    }
}

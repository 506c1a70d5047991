//! Errors

use salvo::http::StatusError;
use shopfront_app::{domain::carts::CartsServiceError, errors::ErrorKind};
use tracing::{error, warn};

use crate::errors::status_error;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    let kind = error.kind();

    match &error {
        CartsServiceError::Sql(source) => error!("cart storage failure: {source}"),
        CartsServiceError::Catalog(source) => error!("catalog lookup failed: {source}"),
        CartsServiceError::Pricing(source) => warn!("could not price cart: {source}"),
        _ => {}
    }

    let brief = if kind == ErrorKind::StorageFailure {
        "Cart storage is temporarily unavailable".to_string()
    } else {
        error.to_string()
    };

    status_error(kind, brief)
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use shopfront_app::domain::catalog::records::ItemUuid;

    use super::*;

    #[test]
    fn out_of_stock_is_409_with_message() {
        let error = into_status_error(CartsServiceError::OutOfStock {
            item: ItemUuid::new(),
            requested: 5,
            available: 2,
        });

        assert_eq!(error.code, StatusCode::CONFLICT);
        assert!(error.brief.contains("only 2"), "brief: {}", error.brief);
        assert_eq!(error.detail.as_deref(), Some("out_of_stock"));
    }

    #[test]
    fn storage_failure_hides_the_source() {
        let error = into_status_error(CartsServiceError::Sql(sqlx::Error::PoolTimedOut));

        assert_eq!(error.code, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!error.brief.contains("pool"), "brief: {}", error.brief);
    }

    #[test]
    fn invalid_quantity_is_400() {
        let error = into_status_error(CartsServiceError::InvalidQuantity);

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.detail.as_deref(), Some("invalid_argument"));
    }
}

//! Errors

use salvo::http::StatusError;
use shopfront_app::{domain::catalog::CatalogServiceError, errors::ErrorKind};
use tracing::error;

use crate::errors::status_error;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::NotFound => status_error(ErrorKind::NotFound, "Item not found"),
        CatalogServiceError::Sql(source) => {
            error!("catalog storage failure: {source}");

            status_error(
                ErrorKind::StorageFailure,
                "Catalog is temporarily unavailable",
            )
        }
        other => status_error(other.kind(), other.to_string()),
    }
}

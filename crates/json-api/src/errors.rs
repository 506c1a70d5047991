//! HTTP rendering of service error kinds.
//!
//! The human-readable message goes in `brief` and the stable kind code in
//! `detail`, so clients can branch on `detail` without parsing prose.

use salvo::http::StatusError;
use shopfront_app::errors::ErrorKind;

pub(crate) fn status_error(kind: ErrorKind, brief: impl Into<String>) -> StatusError {
    let status = match kind {
        ErrorKind::Unauthenticated => StatusError::unauthorized(),
        ErrorKind::InvalidArgument => StatusError::bad_request(),
        ErrorKind::NotFound | ErrorKind::NoActiveCart => StatusError::not_found(),
        ErrorKind::EmptyCart => StatusError::unprocessable_entity(),
        ErrorKind::OutOfStock | ErrorKind::ItemUnavailable | ErrorKind::ConflictingCheckout => {
            StatusError::conflict()
        }
        ErrorKind::StorageFailure => StatusError::service_unavailable(),
    };

    status.brief(brief).detail(kind.code())
}

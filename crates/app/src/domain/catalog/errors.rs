//! Catalog service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind as SqlErrorKind},
};
use thiserror::Error;

use crate::errors::ErrorKind;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("item already exists")]
    AlreadyExists,

    #[error("item not found")]
    NotFound,

    #[error("invalid item data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl CatalogServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists | Self::InvalidData => ErrorKind::InvalidArgument,
            Self::NotFound => ErrorKind::NotFound,
            Self::Sql(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<Error> for CatalogServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if matches!(error, Error::Encode(_)) {
            return Self::InvalidData;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(SqlErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(SqlErrorKind::CheckViolation | SqlErrorKind::NotNullViolation) => {
                Self::InvalidData
            }
            _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = CatalogServiceError::from(Error::RowNotFound);

        assert!(matches!(error, CatalogServiceError::NotFound));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn pool_timeout_is_a_storage_failure() {
        let error = CatalogServiceError::from(Error::PoolTimedOut);

        assert_eq!(error.kind(), ErrorKind::StorageFailure);
    }
}

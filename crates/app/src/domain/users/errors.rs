//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind as SqlErrorKind},
};
use thiserror::Error;

use crate::errors::ErrorKind;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user name must not be blank")]
    InvalidName,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl UsersServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists | Self::InvalidName => ErrorKind::InvalidArgument,
            Self::Sql(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(SqlErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(SqlErrorKind::CheckViolation) => Self::InvalidName,
            _ => Self::Sql(error),
        }
    }
}

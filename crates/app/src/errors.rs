//! Error kinds shared by every service.

use std::fmt::{self, Display, Formatter};

/// Stable, machine-readable classification of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    InvalidArgument,
    NotFound,
    NoActiveCart,
    EmptyCart,
    OutOfStock,
    ItemUnavailable,
    ConflictingCheckout,
    StorageFailure,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::NoActiveCart => "no_active_cart",
            Self::EmptyCart => "empty_cart",
            Self::OutOfStock => "out_of_stock",
            Self::ItemUnavailable => "item_unavailable",
            Self::ConflictingCheckout => "conflicting_checkout",
            Self::StorageFailure => "storage_failure",
        }
    }

    /// Whether the caller may repeat the whole operation and expect a
    /// different outcome.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::ConflictingCheckout | Self::StorageFailure)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let kinds = [
            ErrorKind::Unauthenticated,
            ErrorKind::InvalidArgument,
            ErrorKind::NotFound,
            ErrorKind::NoActiveCart,
            ErrorKind::EmptyCart,
            ErrorKind::OutOfStock,
            ErrorKind::ItemUnavailable,
            ErrorKind::ConflictingCheckout,
            ErrorKind::StorageFailure,
        ];

        let mut codes: Vec<&str> = kinds.iter().map(|kind| kind.code()).collect();
        codes.sort_unstable();
        codes.dedup();

        assert_eq!(codes.len(), kinds.len(), "every kind needs its own code");
    }

    #[test]
    fn only_conflicts_and_storage_failures_are_retryable() {
        assert!(ErrorKind::ConflictingCheckout.is_retryable());
        assert!(ErrorKind::StorageFailure.is_retryable());
        assert!(!ErrorKind::EmptyCart.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
    }
}

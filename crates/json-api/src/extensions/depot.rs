//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use shopfront_app::{domain::users::records::UserUuid, errors::ErrorKind};

const USER_UUID_DEPOT_KEY: &str = "user_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// The authenticated user, set by the auth middleware.
    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;

    fn insert_user_uuid(&mut self, user: UserUuid);
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.get::<UserUuid>(USER_UUID_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| {
                StatusError::unauthorized()
                    .brief("Authentication required")
                    .detail(ErrorKind::Unauthenticated.code())
            })
    }

    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.insert(USER_UUID_DEPOT_KEY, user);
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn missing_user_is_401() {
        let depot = Depot::new();

        let error = depot.user_uuid_or_401().err();

        assert_eq!(error.map(|e| e.code), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn inserted_user_is_returned() {
        let user = UserUuid::from_uuid(Uuid::now_v7());
        let mut depot = Depot::new();

        depot.insert_user_uuid(user);

        assert_eq!(depot.user_uuid_or_401().ok(), Some(user));
    }
}

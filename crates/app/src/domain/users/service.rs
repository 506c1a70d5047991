//! Users service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::domain::users::{
    data::NewUser, errors::UsersServiceError, records::UserRecord,
    repository::PgUsersRepository,
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgUsersRepository::new(pool),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        if user.name.trim().is_empty() {
            return Err(UsersServiceError::InvalidName);
        }

        let created = self.repository.create_user(user).await?;

        info!(user_uuid = %created.uuid, "created user");

        Ok(created)
    }
}

#[automock]
#[async_trait]
/// User persistence operations.
pub trait UsersService: Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{domain::users::records::UserUuid, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn create_user_returns_correct_uuid_and_name() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgUsersService::new(ctx.db.pool().clone());

        let uuid = UserUuid::new();
        let before = Timestamp::now();

        let user = svc
            .create_user(NewUser {
                uuid,
                name: "Ada".to_string(),
            })
            .await?;

        assert_eq!(user.uuid, uuid);
        assert_eq!(user.name, "Ada");
        assert!(user.created_at >= before);

        Ok(())
    }

    #[tokio::test]
    async fn create_user_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgUsersService::new(ctx.db.pool().clone());

        let uuid = UserUuid::new();

        svc.create_user(NewUser {
            uuid,
            name: "First".to_string(),
        })
        .await?;

        let result = svc
            .create_user(NewUser {
                uuid,
                name: "Second".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_user_blank_name_is_rejected() {
        let ctx = TestContext::new().await;
        let svc = PgUsersService::new(ctx.db.pool().clone());

        let result = svc
            .create_user(NewUser {
                uuid: UserUuid::new(),
                name: "   ".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidName)),
            "expected InvalidName, got {result:?}"
        );
    }
}

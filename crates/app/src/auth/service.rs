//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, NewApiToken,
        format_api_token, generate_api_token_secret, parse_api_token,
        repository::PgAuthRepository, token_verifier, verifiers_match,
    },
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given user.
    pub async fn issue_api_token(
        &self,
        user_uuid: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let token_hash = token_verifier(&token_uuid, version, &user_uuid, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user_uuid,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given user.
    pub async fn list_api_tokens(
        &self,
        user_uuid: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_user(user_uuid)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token_by_uuid(parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.version != parsed_token.version {
            return Err(AuthServiceError::NotFound);
        }

        let verifier = token_verifier(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.user_uuid,
            &parsed_token.secret,
        );

        if !verifiers_match(&token.token_hash, &verifier) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed_token.token_uuid)
            .await
        {
            warn!(token_uuid = %parsed_token.token_uuid, %error, "failed to record token use");
        }

        Ok(token.user_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::{auth::parse_api_token, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_its_user() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_api_token(ctx.user_uuid, None).await?;

        assert_eq!(issued.metadata.user_uuid, ctx.user_uuid);
        assert!(issued.metadata.revoked_at.is_none());

        let user = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(user, ctx.user_uuid);

        let tokens = ctx.auth.list_api_tokens(ctx.user_uuid).await?;

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].last_used_at.is_some(), "use should be recorded");

        Ok(())
    }

    #[tokio::test]
    async fn malformed_token_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.authenticate_bearer("not-a-token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn wrong_secret_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_api_token(ctx.user_uuid, None).await?;
        let parsed = parse_api_token(&issued.token)?;

        let forged = format_api_token(
            parsed.token_uuid,
            parsed.version,
            &generate_api_token_secret(),
        );

        let result = ctx.auth.authenticate_bearer(&forged).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_api_token(ctx.user_uuid, None).await?;

        assert!(ctx.auth.revoke_api_token(issued.metadata.uuid).await?);
        assert!(
            !ctx.auth.revoke_api_token(issued.metadata.uuid).await?,
            "second revoke is a no-op"
        );

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let expired = Timestamp::now().checked_sub(SignedDuration::from_secs(60))?;

        let issued = ctx
            .auth
            .issue_api_token(ctx.user_uuid, Some(expired))
            .await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn issuing_for_unknown_user_fails() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.issue_api_token(UserUuid::new(), None).await;

        assert!(
            matches!(result, Err(AuthServiceError::UnknownUser)),
            "expected UnknownUser, got {result:?}"
        );
    }
}

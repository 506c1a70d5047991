//! Auth middleware.

use salvo::{http::header::AUTHORIZATION, prelude::*};
use shopfront_app::{context::AppContext, errors::ErrorKind};
use tracing::error;

use crate::{errors::status_error, extensions::*};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(status_error(
            ErrorKind::Unauthenticated,
            "Missing or invalid Authorization header",
        ));
        ctrl.skip_rest();

        return;
    };

    let app = match depot.obtain_or_500::<AppContext>() {
        Ok(app) => app,
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    let user_uuid = match app.auth.authenticate_bearer(token).await {
        Ok(user_uuid) => user_uuid,
        Err(auth_error) => {
            let kind = auth_error.kind();

            if kind == ErrorKind::StorageFailure {
                error!("failed to validate api token: {auth_error}");
            }

            let brief = if kind == ErrorKind::Unauthenticated {
                "Invalid API token".to_string()
            } else {
                auth_error.to_string()
            };

            res.render(status_error(kind, brief));
            ctrl.skip_rest();

            return;
        }
    };

    tracing::Span::current().record("user_uuid", tracing::field::display(user_uuid));

    depot.insert_user_uuid(user_uuid);

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront_app::{
        auth::{AuthServiceError, MockAuthService},
        domain::users::records::UserUuid,
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::test_helpers::TestServices;

    use super::*;

    #[salvo::handler]
    async fn echo_user(depot: &mut Depot, res: &mut Response) {
        let user = depot.user_uuid_or_401().ok().map_or_else(
            || "missing".to_string(),
            |uuid: UserUuid| uuid.to_string(),
        );

        res.render(user);
    }

    fn make_service(auth: MockAuthService) -> Service {
        let mut services = TestServices::new();

        services.auth = auth;

        services.unauthenticated_service(Router::new().hoop(handler).get(echo_user))
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_bearer_authorization_header_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_token_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure_returns_503() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_token_injects_user_uuid() -> TestResult {
        let user = UserUuid::from_uuid(Uuid::now_v7());

        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(move |_| Ok(user));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "bearer abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, user.to_string());

        Ok(())
    }
}

//! Get Cart Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use shopfront_app::{
    context::AppContext,
    domain::carts::records::{CartItemRecord, CartRecord},
};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// Cart status; always `open` for the current cart
    pub status: String,

    /// The lines in the cart, oldest first
    pub items: Vec<CartItemResponse>,

    /// Sum of line totals, in minor units
    pub subtotal: u64,

    pub tax: u64,

    pub shipping: u64,

    /// `subtotal + tax + shipping`
    pub total: u64,

    /// Incremented on every change to the cart's lines
    pub version: i64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            uuid: cart.uuid.into_uuid(),
            status: cart.status.to_string(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            subtotal: cart.subtotal,
            tax: cart.tax,
            shipping: cart.shipping,
            total: cart.total,
            version: cart.version,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart line
    pub uuid: Uuid,

    /// The catalog item on this line
    pub item_uuid: Uuid,

    pub quantity: u32,

    /// Unit price captured when the line was last changed
    pub price: u64,

    /// `price * quantity`
    pub line_total: u64,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(line: CartItemRecord) -> Self {
        Self {
            uuid: line.uuid.into_uuid(),
            item_uuid: line.item_uuid.into_uuid(),
            quantity: line.quantity,
            price: line.price,
            line_total: line.price.saturating_mul(u64::from(line.quantity)),
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's open cart, creating an empty one if needed.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Open cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
#[tracing::instrument(
    name = "carts.get",
    skip(depot),
    fields(user_uuid = tracing::field::Empty, cart_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;
    let user = depot.user_uuid_or_401()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));

    let cart = app
        .carts
        .get_open_cart(user)
        .await
        .map_err(into_status_error)?;

    span.record("cart_uuid", tracing::field::display(cart.uuid));

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront_app::domain::carts::CartsServiceError;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, TestServices, make_cart, make_empty_cart, make_item};

    use super::*;

    fn make_service(services: TestServices) -> Service {
        services.service(Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_open_cart_with_totals() -> TestResult {
        let item = make_item(10_00, 5);
        let cart = make_cart(item.uuid, item.price, 2);
        let cart_uuid = cart.uuid;

        let mut services = TestServices::new();

        services
            .carts
            .expect_get_open_cart()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.uuid, cart_uuid.into_uuid());
        assert_eq!(body.status, "open");
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items.first().map(|line| line.line_total), Some(20_00));
        assert_eq!(body.subtotal, 20_00);
        assert_eq!(body.tax, 2_00);
        assert_eq!(body.shipping, 4_99);
        assert_eq!(body.total, 26_99);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_empty_cart_has_zero_totals() -> TestResult {
        let mut services = TestServices::new();

        services
            .carts
            .expect_get_open_cart()
            .once()
            .return_once(|_| Ok(make_empty_cart()));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(services))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert!(body.items.is_empty(), "expected no lines");
        assert_eq!(body.total, 0);
        assert_eq!(body.shipping, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_storage_failure_returns_503() -> TestResult {
        let mut services = TestServices::new();

        services
            .carts
            .expect_get_open_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_without_user_returns_401() -> TestResult {
        let mut services = TestServices::new();

        services.carts.expect_get_open_cart().never();

        let res = TestClient::get("http://example.com/cart")
            .send(&services.unauthenticated_service(Router::with_path("cart").get(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}

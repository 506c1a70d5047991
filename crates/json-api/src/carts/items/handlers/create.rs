//! Add Cart Item Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront_app::{context::AppContext, domain::carts::data::NewCartItem};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// Catalog item to add
    pub item_uuid: Uuid,

    /// Units to add; merged into an existing line for the same item
    pub quantity: i32,
}

impl From<AddCartItemRequest> for NewCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        NewCartItem {
            item_uuid: request.item_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Add Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quantity must be at least 1"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.add",
    skip(json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        item_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("item_uuid", tracing::field::display(request.item_uuid));
    span.record("quantity", request.quantity);

    let cart = app
        .carts
        .add_item(user, request.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use shopfront_app::domain::{carts::CartsServiceError, catalog::records::ItemUuid};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, TestServices, make_cart, make_item};

    use super::*;

    fn make_service(services: TestServices) -> Service {
        services.service(Router::with_path("cart/items").post(handler))
    }

    #[tokio::test]
    async fn test_add_item_returns_updated_cart() -> TestResult {
        let item = make_item(10_00, 10);
        let item_uuid = item.uuid;
        let cart = make_cart(item_uuid, item.price, 2);

        let mut services = TestServices::new();

        services
            .carts
            .expect_add_item()
            .once()
            .withf(move |user, new| {
                *user == TEST_USER_UUID
                    && *new
                        == NewCartItem {
                            item_uuid,
                            quantity: 2,
                        }
            })
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item_uuid": item_uuid.into_uuid(), "quantity": 2 }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.subtotal, 20_00);
        assert_eq!(
            body.items.first().map(|line| line.item_uuid),
            Some(item_uuid.into_uuid())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_invalid_quantity_returns_400() -> TestResult {
        let mut services = TestServices::new();

        services
            .carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InvalidQuantity));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item_uuid": Uuid::now_v7(), "quantity": 0 }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_item_returns_404() -> TestResult {
        let mut services = TestServices::new();

        services
            .carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ItemNotFound));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item_uuid": Uuid::now_v7(), "quantity": 1 }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_out_of_stock_returns_409() -> TestResult {
        let mut services = TestServices::new();

        services
            .carts
            .expect_add_item()
            .once()
            .return_once(|_, new| {
                Err(CartsServiceError::OutOfStock {
                    item: new.item_uuid,
                    requested: 3,
                    available: 1,
                })
            });

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item_uuid": ItemUuid::new().into_uuid(), "quantity": 3 }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_malformed_body_returns_400() -> TestResult {
        let mut services = TestServices::new();

        services.carts.expect_add_item().never();

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "item_uuid": "not-a-uuid", "quantity": 1 }))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}

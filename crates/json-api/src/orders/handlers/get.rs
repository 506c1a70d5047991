//! Get Order Handler

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront_app::{
    context::AppContext,
    domain::orders::records::{OrderItemRecord, OrderRecord},
};
use uuid::Uuid;

use crate::{extensions::*, orders::errors::orders_status_error};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The cart this order was placed from
    pub cart_uuid: Uuid,

    pub status: String,

    /// Order lines in cart order, with prices as charged at checkout
    pub items: Vec<OrderItemResponse>,

    pub subtotal: u64,

    pub tax: u64,

    pub shipping: u64,

    pub total: u64,

    /// The date and time the order was placed
    pub created_at: String,

    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            cart_uuid: order.cart_uuid.into_uuid(),
            status: order.status.to_string(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            subtotal: order.subtotal,
            tax: order.tax,
            shipping: order.shipping,
            total: order.total,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub item_uuid: Uuid,

    /// Item name at the time of checkout
    pub name: String,

    /// Unit price charged
    pub price: u64,

    pub quantity: u32,

    pub line_total: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(line: OrderItemRecord) -> Self {
        Self {
            item_uuid: line.item_uuid.into_uuid(),
            line_total: line.price.saturating_mul(u64::from(line.quantity)),
            name: line.name,
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// Get Order Handler
///
/// Returns one of the caller's orders. Orders of other users are reported as
/// not found.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
#[tracing::instrument(
    name = "orders.get",
    skip(order, depot),
    fields(user_uuid = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;
    let user = depot.user_uuid_or_401()?;
    let order = order.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("order_uuid", tracing::field::display(order));

    let order = app
        .orders
        .get_order(user, order.into())
        .await
        .map_err(orders_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront_app::domain::{
        catalog::records::ItemUuid,
        orders::{OrdersServiceError, records::OrderUuid},
    };
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, TestServices, make_cart, make_order};

    use super::*;

    fn make_service(services: TestServices) -> Service {
        services.service(Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_order_returns_snapshot() -> TestResult {
        let cart = make_cart(ItemUuid::new(), 12_50, 4);
        let order = make_order(&cart);
        let order_uuid = order.uuid;

        let mut services = TestServices::new();

        services
            .orders
            .expect_get_order()
            .once()
            .withf(move |user, o| *user == TEST_USER_UUID && *o == order_uuid)
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{order_uuid}"))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.uuid, order_uuid.into_uuid());
        assert_eq!(body.cart_uuid, cart.uuid.into_uuid());
        assert_eq!(body.status, "pending");
        assert_eq!(body.subtotal, 50_00);
        assert_eq!(body.shipping, 4_99);
        assert_eq!(body.items.first().map(|line| line.line_total), Some(50_00));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_order_returns_404() -> TestResult {
        let order = OrderUuid::new();

        let mut services = TestServices::new();

        services
            .orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{order}"))
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}

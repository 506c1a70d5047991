//! Checkout Handler

use salvo::{http::header::LOCATION, prelude::*};
use shopfront_app::context::AppContext;

use crate::{
    extensions::*,
    observability::{CheckoutOutcome, observe_checkout},
    orders::{errors::checkout_status_error, get::OrderResponse},
};

/// Checkout Handler
///
/// Converts the caller's open cart into an order. Prices are re-read from the
/// catalog, so the order may differ from the last cart view.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::NOT_FOUND, description = "No open cart"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Cart is empty"),
        (status_code = StatusCode::CONFLICT, description = "Out of stock, item unavailable, or concurrent checkout"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
#[tracing::instrument(
    name = "orders.checkout",
    skip(depot, res),
    fields(user_uuid = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;
    let user = depot.user_uuid_or_401()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));

    let order = match app.checkout.checkout(user).await {
        Ok(order) => order,
        Err(error) => {
            observe_checkout(CheckoutOutcome::Rejected(error.kind()));

            return Err(checkout_status_error(error));
        }
    };

    observe_checkout(CheckoutOutcome::Placed);

    span.record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(order_uuid = %order.uuid, total = order.total, "order placed");

    Ok(Json(order.into()))
}

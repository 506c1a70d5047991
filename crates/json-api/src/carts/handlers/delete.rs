//! Clear Cart Handler

use salvo::prelude::*;
use shopfront_app::context::AppContext;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
};

/// Clear Cart Handler
///
/// Removes every line from the open cart. The cart itself stays open.
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::NOT_FOUND, description = "No open cart"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
#[tracing::instrument(
    name = "carts.clear",
    skip(depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;
    let user = depot.user_uuid_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    let cart = app.carts.clear(user).await.map_err(into_status_error)?;

    tracing::info!(cart_uuid = %cart.uuid, "cleared cart");

    Ok(Json(cart.into()))
}

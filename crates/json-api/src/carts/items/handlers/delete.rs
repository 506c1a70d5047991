//! Remove Cart Item Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use shopfront_app::context::AppContext;
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
};

/// Remove Cart Item Handler
///
/// Removing an item that is not in the cart leaves the cart unchanged.
#[endpoint(
    tags("carts"),
    summary = "Remove Item from Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "No open cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    )
)]
#[tracing::instrument(
    name = "carts.items.remove",
    skip(item, depot),
    fields(user_uuid = tracing::field::Empty, item_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;
    let user = depot.user_uuid_or_401()?;
    let item = item.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("item_uuid", tracing::field::display(item));

    let cart = app
        .carts
        .remove_item(user, item.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

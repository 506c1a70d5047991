//! Update Cart Item Handler

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront_app::context::AppContext;
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New line quantity; zero or less removes the line
    pub quantity: i32,
}

/// Update Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Set Cart Item Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::NOT_FOUND, description = "No open cart, or item not in cart"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service Unavailable"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.update",
    skip(item, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        item_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;
    let user = depot.user_uuid_or_401()?;
    let item = item.into_inner();
    let quantity = json.into_inner().quantity;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("item_uuid", tracing::field::display(item));
    span.record("quantity", quantity);

    let cart = app
        .carts
        .update_item_quantity(user, item.into(), quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

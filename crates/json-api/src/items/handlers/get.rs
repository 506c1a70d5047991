//! Get Item Handler

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use shopfront_app::{context::AppContext, domain::catalog::records::ItemRecord};
use uuid::Uuid;

use crate::{extensions::*, items::errors::into_status_error};

/// Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemResponse {
    pub uuid: Uuid,

    pub name: String,

    pub description: String,

    /// Current unit price in minor units
    pub price: u64,

    /// Units currently in stock
    pub available: u32,
}

impl From<ItemRecord> for ItemResponse {
    fn from(item: ItemRecord) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            name: item.name,
            description: item.description,
            price: item.price,
            available: item.available,
        }
    }
}

/// Get Item Handler
#[endpoint(
    tags("items"),
    summary = "Get Item",
    responses(
        (status_code = StatusCode::OK, description = "Item"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ItemResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;

    let item = app
        .catalog
        .get_item(item.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(item.into()))
}

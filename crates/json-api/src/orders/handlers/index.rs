//! Order History Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use shopfront_app::{context::AppContext, domain::orders::records::OrderSummaryRecord};
use uuid::Uuid;

use crate::{extensions::*, orders::errors::orders_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// The caller's orders, newest first
    pub orders: Vec<OrderSummaryResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSummaryResponse {
    pub uuid: Uuid,
    pub status: String,
    pub total: u64,
    pub line_count: u32,
    pub created_at: String,
}

impl From<OrderSummaryRecord> for OrderSummaryResponse {
    fn from(summary: OrderSummaryRecord) -> Self {
        Self {
            uuid: summary.uuid.into_uuid(),
            status: summary.status.to_string(),
            total: summary.total,
            line_count: summary.line_count,
            created_at: summary.created_at.to_string(),
        }
    }
}

/// Order History Handler
#[endpoint(
    tags("orders"),
    summary = "List My Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;
    let user = depot.user_uuid_or_401()?;

    let orders = app
        .orders
        .list_orders(user)
        .await
        .map_err(orders_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

//! Order Events Repository

use serde_json::Value;
use sqlx::{Postgres, Transaction, query, types::Json};
use uuid::Uuid;

use crate::domain::{orders::records::OrderUuid, users::records::UserUuid};

const CREATE_ORDER_EVENT_SQL: &str = include_str!("../sql/create_order_event.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderEventsRepository;

impl PgOrderEventsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        user: UserUuid,
        kind: &str,
        payload: Value,
    ) -> Result<Uuid, sqlx::Error> {
        let uuid = Uuid::now_v7();

        query(CREATE_ORDER_EVENT_SQL)
            .bind(uuid)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .bind(kind)
            .bind(Json(payload))
            .execute(&mut **tx)
            .await?;

        Ok(uuid)
    }
}

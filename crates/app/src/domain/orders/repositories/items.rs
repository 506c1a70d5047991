//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    catalog::records::ItemUuid,
    columns::{amount_param, count_param, try_get_amount, try_get_count},
    orders::{
        data::NewOrderItem,
        records::{OrderItemRecord, OrderItemUuid, OrderUuid},
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert lines keeping their order as `position`.
    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        let mut created = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|e| sqlx::Error::Encode(format!("position: {e}").into()))?;

            let record = query_as::<Postgres, OrderItemRecord>(CREATE_ORDER_ITEM_SQL)
                .bind(OrderItemUuid::new().into_uuid())
                .bind(order.into_uuid())
                .bind(position)
                .bind(item.item_uuid.into_uuid())
                .bind(&item.name)
                .bind(amount_param("price", item.price)?)
                .bind(count_param("quantity", item.quantity)?)
                .fetch_one(&mut **tx)
                .await?;

            created.push(record);
        }

        Ok(created)
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            item_uuid: ItemUuid::from_uuid(row.try_get("item_uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            quantity: try_get_count(row, "quantity")?,
        })
    }
}

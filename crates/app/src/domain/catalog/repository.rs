//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    catalog::{
        data::{ItemUpdate, NewItem},
        records::{ItemRecord, ItemUuid},
    },
    columns::{amount_param, count_param, try_get_amount, try_get_count},
};

const GET_ITEM_SQL: &str = include_str!("sql/get_item.sql");
const GET_ITEMS_SQL: &str = include_str!("sql/get_items.sql");
const LIST_ITEMS_SQL: &str = include_str!("sql/list_items.sql");
const CREATE_ITEM_SQL: &str = include_str!("sql/create_item.sql");
const UPDATE_ITEM_SQL: &str = include_str!("sql/update_item.sql");
const DELETE_ITEM_SQL: &str = include_str!("sql/delete_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: ItemUuid,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(GET_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[ItemUuid],
    ) -> Result<Vec<ItemRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = items.iter().map(|item| item.into_uuid()).collect();

        query_as::<Postgres, ItemRecord>(GET_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ItemRecord>, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(LIST_ITEMS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: NewItem,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(CREATE_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(item.name)
            .bind(item.description)
            .bind(amount_param("price", item.price)?)
            .bind(count_param("available", item.available)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: ItemUuid,
        update: ItemUpdate,
    ) -> Result<ItemRecord, sqlx::Error> {
        let price = update
            .price
            .map(|price| amount_param("price", price))
            .transpose()?;

        let available = update
            .available
            .map(|available| count_param("available", available))
            .transpose()?;

        query_as::<Postgres, ItemRecord>(UPDATE_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(update.name)
            .bind(update.description)
            .bind(price)
            .bind(available)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: ItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ITEM_SQL)
            .bind(item.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ItemUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            available: try_get_count(row, "available")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

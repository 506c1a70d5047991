//! Carts Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::records::{CartRecord, CartStatus, CartUuid},
    columns::{amount_param, try_get_amount},
    pricing::Totals,
    users::records::UserUuid,
};

const CREATE_OPEN_CART_SQL: &str = include_str!("../sql/create_open_cart.sql");
const FIND_OPEN_CART_SQL: &str = include_str!("../sql/find_open_cart.sql");
const LOCK_OPEN_CART_SQL: &str = include_str!("../sql/lock_open_cart.sql");
const UPDATE_CART_TOTALS_SQL: &str = include_str!("../sql/update_cart_totals.sql");
const CLOSE_CART_SQL: &str = include_str!("../sql/close_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert an open cart unless the user already has one.
    pub(crate) async fn create_open_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        cart: CartUuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CREATE_OPEN_CART_SQL)
            .bind(cart.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    pub(crate) async fn find_open_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(FIND_OPEN_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::find_open_cart`], holding the row lock until the transaction ends.
    pub(crate) async fn lock_open_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(LOCK_OPEN_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        totals: Totals,
    ) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(UPDATE_CART_TOTALS_SQL)
            .bind(cart.into_uuid())
            .bind(amount_param("subtotal", totals.subtotal)?)
            .bind(amount_param("tax", totals.tax)?)
            .bind(amount_param("shipping", totals.shipping)?)
            .bind(amount_param("total", totals.total)?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Flip an open cart to `checked_out` if its version is still `version`.
    ///
    /// Returns `false` when another transaction got there first.
    pub(crate) async fn close_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        version: i64,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CLOSE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(version)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = CartStatus::from_str(&status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            status,
            items: Vec::new(),
            subtotal: try_get_amount(row, "subtotal")?,
            tax: try_get_amount(row, "tax")?,
            shipping: try_get_amount(row, "shipping")?,
            total: try_get_amount(row, "total")?,
            version: row.try_get("version")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            closed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("closed_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

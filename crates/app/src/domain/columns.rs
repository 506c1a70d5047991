//! Column conversions between Postgres integer types and domain amounts.

use sqlx::{Row, postgres::PgRow};

/// Read a non-negative `BIGINT` minor-unit amount.
pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount: i64 = row.try_get(col)?;

    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Read a non-negative `INTEGER` count.
pub(crate) fn try_get_count(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let count: i32 = row.try_get(col)?;

    u32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Convert an amount for binding to a `BIGINT` column.
pub(crate) fn amount_param(col: &str, amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(format!("{col}: {e}").into()))
}

/// Convert a count for binding to an `INTEGER` column.
pub(crate) fn count_param(col: &str, count: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(count).map_err(|e| sqlx::Error::Encode(format!("{col}: {e}").into()))
}

//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, postgres::PgPoolOptions, query, query_scalar};

use crate::domain::users::records::UserUuid;

/// SQL used to set the acting user for row-level security.
pub const SET_USER_CONTEXT_SQL: &str = "SELECT set_config('app.current_user_uuid', $1, true)";

const ROLE_BYPASSES_RLS_SQL: &str =
    "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user";

const MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction with no user context (catalog and identity tables).
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction and set the acting user for RLS policies.
    ///
    /// The setting is transaction-local, so it never leaks to the next
    /// borrower of the pooled connection.
    pub async fn begin_user_transaction(
        &self,
        user: UserUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_USER_CONTEXT_SQL)
            .bind(user.to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Whether the connected role is a superuser or holds `BYPASSRLS`.
///
/// Such a role ignores every row-level security policy, which would let one
/// user read another user's carts and orders.
pub async fn role_bypasses_rls(pool: &PgPool) -> Result<bool, sqlx::Error> {
    query_scalar::<Postgres, bool>(ROLE_BYPASSES_RLS_SQL)
        .fetch_one(pool)
        .await
}

//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        catalog::{CatalogReader, PgCatalogService},
        orders::{CheckoutService, OrdersService, PgCheckoutService, PgOrdersService},
        policy::CommercePolicy,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role bypasses row-level security; connect as the application role")]
    RlsBypassRole,
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogReader>,
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    pub async fn from_database_url(
        url: &str,
        policy: CommercePolicy,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if database::role_bypasses_rls(&pool)
            .await
            .map_err(AppInitError::Database)?
        {
            return Err(AppInitError::RlsBypassRole);
        }

        let db = Db::new(pool.clone());
        let catalog: Arc<dyn CatalogReader> = Arc::new(PgCatalogService::new(db.clone()));

        Ok(Self {
            carts: Arc::new(PgCartsService::new(db.clone(), catalog.clone(), policy)),
            checkout: Arc::new(PgCheckoutService::new(db.clone(), catalog.clone(), policy)),
            orders: Arc::new(PgOrdersService::new(db)),
            auth: Arc::new(PgAuthService::new(pool)),
            catalog,
        })
    }
}

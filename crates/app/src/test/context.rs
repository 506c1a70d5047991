//! Test context for service-level integration tests.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        carts::PgCartsService,
        catalog::{
            CatalogService, PgCatalogService,
            data::NewItem,
            records::{ItemRecord, ItemUuid},
        },
        orders::{PgCheckoutService, PgOrdersService},
        policy::CommercePolicy,
        users::{PgUsersService, UsersService, data::NewUser, records::UserUuid},
    },
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub user_uuid: UserUuid,
    pub catalog: PgCatalogService,
    pub carts: PgCartsService,
    pub checkout: PgCheckoutService,
    pub orders: PgOrdersService,
    pub auth: PgAuthService,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_policy(CommercePolicy::default()).await
    }

    pub async fn with_policy(policy: CommercePolicy) -> Self {
        let test_db = TestDb::new().await;

        // Services run as a non-superuser so RLS policies are enforced. The
        // superuser pool is only used for setup and for assertions.
        let app_pool = test_db.app_pool().await;
        let db = Db::new(app_pool.clone());

        let catalog = PgCatalogService::new(db.clone());
        let reader = Arc::new(catalog.clone());

        let user_uuid = create_user(test_db.pool(), "Test User").await;

        Self {
            carts: PgCartsService::new(db.clone(), reader.clone(), policy),
            checkout: PgCheckoutService::new(db.clone(), reader, policy),
            orders: PgOrdersService::new(db),
            auth: PgAuthService::new(app_pool),
            catalog,
            user_uuid,
            db: test_db,
        }
    }

    /// Create an additional user, e.g. for isolation tests.
    pub async fn create_user(&self, name: &str) -> UserUuid {
        create_user(self.db.pool(), name).await
    }

    pub async fn create_item(&self, name: &str, price: u64, available: u32) -> ItemRecord {
        self.catalog
            .create_item(NewItem {
                uuid: ItemUuid::new(),
                name: name.to_string(),
                description: format!("{name} description"),
                price,
                available,
            })
            .await
            .expect("Failed to create test item")
    }
}

async fn create_user(pool: &PgPool, name: &str) -> UserUuid {
    PgUsersService::new(pool.clone())
        .create_user(NewUser {
            uuid: UserUuid::new(),
            name: name.to_string(),
        })
        .await
        .expect("Failed to create test user")
        .uuid
}

//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::catalog::{
        data::{ItemUpdate, NewItem},
        errors::CatalogServiceError,
        records::{ItemRecord, ItemUuid},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogReader for PgCatalogService {
    async fn list_items(&self) -> Result<Vec<ItemRecord>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let items = self.repository.list_items(&mut tx).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn get_item(&self, item: ItemUuid) -> Result<ItemRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_item(&mut tx, item).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn get_items(
        &self,
        items: Vec<ItemUuid>,
    ) -> Result<Vec<ItemRecord>, CatalogServiceError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.db.begin_transaction().await?;

        let records = self.repository.get_items(&mut tx, &items).await?;

        tx.commit().await?;

        Ok(records)
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_item(&self, item: NewItem) -> Result<ItemRecord, CatalogServiceError> {
        if item.name.trim().is_empty() {
            return Err(CatalogServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_item(&mut tx, item).await?;

        tx.commit().await?;

        info!(item_uuid = %created.uuid, price = created.price, "created catalog item");

        Ok(created)
    }

    async fn update_item(
        &self,
        item: ItemUuid,
        update: ItemUpdate,
    ) -> Result<ItemRecord, CatalogServiceError> {
        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(CatalogServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let updated = self.repository.update_item(&mut tx, item, update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_item(&self, item: ItemUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_item(&mut tx, item).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Read-only view of the catalog used when pricing carts and orders.
#[automock]
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Every live item, oldest first.
    async fn list_items(&self) -> Result<Vec<ItemRecord>, CatalogServiceError>;

    /// Retrieve a single live item.
    async fn get_item(&self, item: ItemUuid) -> Result<ItemRecord, CatalogServiceError>;

    /// Retrieve every live item among `items`; missing ones are omitted.
    async fn get_items(&self, items: Vec<ItemUuid>)
    -> Result<Vec<ItemRecord>, CatalogServiceError>;
}

/// Catalog administration.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn create_item(&self, item: NewItem) -> Result<ItemRecord, CatalogServiceError>;

    async fn update_item(
        &self,
        item: ItemUuid,
        update: ItemUpdate,
    ) -> Result<ItemRecord, CatalogServiceError>;

    /// Soft-deletes an item so it no longer resolves.
    async fn delete_item(&self, item: ItemUuid) -> Result<(), CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_item_then_get_item_round_trips() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.create_item("Mug", 8_50, 3).await;
        let fetched = ctx.catalog.get_item(created.uuid).await?;

        assert_eq!(fetched, created);
        assert_eq!(fetched.price, 8_50);
        assert_eq!(fetched.available, 3);

        Ok(())
    }

    #[tokio::test]
    async fn get_item_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_item(ItemUuid::new()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn deleted_item_no_longer_resolves() -> TestResult {
        let ctx = TestContext::new().await;

        let item = ctx.create_item("Lamp", 30_00, 1).await;

        ctx.catalog.delete_item(item.uuid).await?;

        let result = ctx.catalog.get_item(item.uuid).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound after delete, got {result:?}"
        );

        let listed = ctx.catalog.list_items().await?;
        assert!(listed.iter().all(|listed| listed.uuid != item.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn deleting_twice_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let item = ctx.create_item("Lamp", 30_00, 1).await;

        ctx.catalog.delete_item(item.uuid).await?;

        let result = ctx.catalog.delete_item(item.uuid).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_items_omits_missing_and_deleted() -> TestResult {
        let ctx = TestContext::new().await;

        let kept = ctx.create_item("Kept", 1_00, 1).await;
        let deleted = ctx.create_item("Deleted", 2_00, 1).await;

        ctx.catalog.delete_item(deleted.uuid).await?;

        let items = ctx
            .catalog
            .get_items(vec![kept.uuid, deleted.uuid, ItemUuid::new()])
            .await?;

        assert_eq!(items, vec![kept]);

        Ok(())
    }

    #[tokio::test]
    async fn update_item_changes_only_given_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let item = ctx.create_item("Pen", 1_50, 10).await;

        let updated = ctx
            .catalog
            .update_item(
                item.uuid,
                ItemUpdate {
                    price: Some(1_75),
                    ..ItemUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.price, 1_75);
        assert_eq!(updated.available, 10);
        assert_eq!(updated.name, "Pen");

        Ok(())
    }

    #[tokio::test]
    async fn create_item_blank_name_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_item(NewItem {
                uuid: ItemUuid::new(),
                name: String::new(),
                description: String::new(),
                price: 1_00,
                available: 1,
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }
}

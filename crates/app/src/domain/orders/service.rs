//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            records::{OrderRecord, OrderSummaryRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut record = self
            .orders_repository
            .get_order(&mut tx, user, order)
            .await?;

        record.items = self.items_repository.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn list_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderSummaryRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let orders = self.orders_repository.list_orders(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve one of the user's orders with its lines.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderSummaryRecord>, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::{CartsService, data::NewCartItem},
            orders::CheckoutService,
        },
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn get_order_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.orders.get_order(ctx.user_uuid, OrderUuid::new()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn orders_are_not_visible_to_other_users() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_user("Other").await;
        let item = ctx.create_item("Book", 10_00, 5).await;

        ctx.carts
            .add_item(
                ctx.user_uuid,
                NewCartItem {
                    item_uuid: item.uuid,
                    quantity: 1,
                },
            )
            .await?;

        let order = ctx.checkout.checkout(ctx.user_uuid).await?;

        let result = ctx.orders.get_order(other, order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound for another user's order, got {result:?}"
        );

        assert!(ctx.orders.list_orders(other).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_is_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let item = ctx.create_item("Book", 10_00, 5).await;

        let mut placed = Vec::new();

        for quantity in [1, 2] {
            ctx.carts
                .add_item(
                    ctx.user_uuid,
                    NewCartItem {
                        item_uuid: item.uuid,
                        quantity,
                    },
                )
                .await?;

            placed.push(ctx.checkout.checkout(ctx.user_uuid).await?);
        }

        let summaries = ctx.orders.list_orders(ctx.user_uuid).await?;

        let uuids: Vec<OrderUuid> = summaries.iter().map(|summary| summary.uuid).collect();

        assert_eq!(uuids, vec![placed[1].uuid, placed[0].uuid]);
        assert!(summaries.iter().all(|summary| summary.line_count == 1));
        assert_eq!(summaries[0].total, placed[1].total);

        Ok(())
    }
}

//! Checkout: converts the open cart into an order.
//!
//! Validation (cart lookup, catalog re-pricing, stock) happens without
//! holding any lock. The write step then closes the cart with a
//! compare-and-swap on its version and inserts the order, its lines and an
//! outbox event in one transaction. A cart that changed after validation, or
//! that another request already checked out, fails the swap.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{
            records::{CartItemRecord, CartRecord},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        catalog::{CatalogReader, records::ItemRecord},
        orders::{
            data::{NewOrder, NewOrderItem},
            errors::CheckoutError,
            events::{ORDER_PLACED, OrderPlacedEvent},
            records::{OrderRecord, OrderUuid},
            repositories::{PgOrderEventsRepository, PgOrderItemsRepository, PgOrdersRepository},
        },
        policy::CommercePolicy,
        users::records::UserUuid,
    },
};

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    catalog: Arc<dyn CatalogReader>,
    policy: CommercePolicy,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
    orders_repository: PgOrdersRepository,
    order_items_repository: PgOrderItemsRepository,
    events_repository: PgOrderEventsRepository,
}

impl fmt::Debug for PgCheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgCheckoutService")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, catalog: Arc<dyn CatalogReader>, policy: CommercePolicy) -> Self {
        Self {
            db,
            catalog,
            policy,
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            order_items_repository: PgOrderItemsRepository::new(),
            events_repository: PgOrderEventsRepository::new(),
        }
    }

    /// Snapshot of the open cart and its lines.
    async fn load_open_cart(&self, user: UserUuid) -> Result<CartRecord, CheckoutError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut cart = self
            .carts_repository
            .find_open_cart(&mut tx, user)
            .await?
            .ok_or(CheckoutError::NoActiveCart)?;

        cart.items = self
            .cart_items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    /// Re-price every line against the catalog as it is now.
    async fn reprice_lines(
        &self,
        lines: &[CartItemRecord],
    ) -> Result<Vec<NewOrderItem>, CheckoutError> {
        let uuids = lines.iter().map(|line| line.item_uuid).collect();

        let catalog: HashMap<_, ItemRecord> = self
            .catalog
            .get_items(uuids)
            .await?
            .into_iter()
            .map(|item| (item.uuid, item))
            .collect();

        lines
            .iter()
            .map(|line| {
                let item = catalog
                    .get(&line.item_uuid)
                    .ok_or(CheckoutError::ItemUnavailable {
                        item: line.item_uuid,
                    })?;

                if self.policy.enforce_stock && line.quantity > item.available {
                    return Err(CheckoutError::OutOfStock {
                        item: line.item_uuid,
                        requested: line.quantity,
                        available: item.available,
                    });
                }

                Ok(NewOrderItem {
                    item_uuid: item.uuid,
                    name: item.name.clone(),
                    price: item.price,
                    quantity: line.quantity,
                })
            })
            .collect()
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.checkout",
        skip(self),
        fields(
            user_uuid = %user,
            cart_uuid = tracing::field::Empty,
            order_uuid = tracing::field::Empty,
            line_count = tracing::field::Empty
        ),
        err
    )]
    async fn checkout(&self, user: UserUuid) -> Result<OrderRecord, CheckoutError> {
        let span = Span::current();

        let cart = self.load_open_cart(user).await?;

        span.record("cart_uuid", tracing::field::display(cart.uuid));
        span.record("line_count", cart.items.len());

        if cart.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = self.reprice_lines(&cart.items).await?;

        let totals = self
            .policy
            .pricing
            .totals(lines.iter().map(NewOrderItem::priced_line))?;

        if totals != cart.totals() {
            info!(
                cart_total = cart.total,
                order_total = totals.total,
                "catalog changed since items were added; using current prices"
            );
        }

        let new_order = NewOrder {
            uuid: OrderUuid::new(),
            user_uuid: user,
            cart_uuid: cart.uuid,
            status: self.policy.initial_order_status,
            totals,
        };

        let mut tx = self.db.begin_user_transaction(user).await?;

        if !self
            .carts_repository
            .close_cart(&mut tx, cart.uuid, cart.version)
            .await?
        {
            warn!(cart_uuid = %cart.uuid, version = cart.version, "lost checkout race");

            return Err(CheckoutError::ConflictingCheckout);
        }

        let mut order = self
            .orders_repository
            .create_order(&mut tx, &new_order)
            .await?;

        order.items = self
            .order_items_repository
            .create_order_items(&mut tx, order.uuid, &lines)
            .await?;

        let payload = serde_json::to_value(OrderPlacedEvent::from(&order))?;

        self.events_repository
            .create_event(&mut tx, order.uuid, user, ORDER_PLACED, payload)
            .await?;

        tx.commit().await?;

        span.record("order_uuid", tracing::field::display(order.uuid));

        info!(order_uuid = %order.uuid, total = order.total, "checked out cart");

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Convert the user's open cart into an order and close the cart.
    async fn checkout(&self, user: UserUuid) -> Result<OrderRecord, CheckoutError>;
}

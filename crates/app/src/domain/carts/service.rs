//! Carts service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemRecord, CartRecord, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        catalog::{CatalogReader, CatalogServiceError, records::ItemUuid},
        policy::CommercePolicy,
        users::records::UserUuid,
    },
};

/// Attempts at finding or creating the open cart before giving up. A miss
/// only happens when a concurrent checkout closes the cart between the insert
/// and the locking select.
const OPEN_CART_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PgCartsService {
    db: Db,
    catalog: Arc<dyn CatalogReader>,
    policy: CommercePolicy,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl fmt::Debug for PgCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgCartsService")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, catalog: Arc<dyn CatalogReader>, policy: CommercePolicy) -> Self {
        Self {
            db,
            catalog,
            policy,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    /// Lock the user's open cart, creating it first if needed.
    async fn lock_or_create_open_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        for _ in 0..OPEN_CART_ATTEMPTS {
            if self
                .carts_repository
                .create_open_cart(tx, user, CartUuid::new())
                .await?
            {
                debug!(user_uuid = %user, "created open cart");
            }

            if let Some(cart) = self.carts_repository.lock_open_cart(tx, user).await? {
                return Ok(cart);
            }
        }

        Err(CartsServiceError::NoActiveCart)
    }

    /// Reload the lines of a locked cart, recompute its totals and persist them.
    async fn reprice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let items = self.items_repository.get_cart_items(tx, cart).await?;

        let totals = self
            .policy
            .pricing
            .totals(items.iter().map(CartItemRecord::priced_line))?;

        let mut updated = self.carts_repository.update_totals(tx, cart, totals).await?;

        updated.items = items;

        Ok(updated)
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut cart: CartRecord,
    ) -> Result<CartRecord, CartsServiceError> {
        cart.items = self.items_repository.get_cart_items(tx, cart.uuid).await?;

        Ok(cart)
    }

    fn check_stock(
        &self,
        item: ItemUuid,
        requested: u32,
        available: u32,
    ) -> Result<(), CartsServiceError> {
        if self.policy.enforce_stock && requested > available {
            return Err(CartsServiceError::OutOfStock {
                item,
                requested,
                available,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_open_cart",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn get_open_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = match self.carts_repository.find_open_cart(&mut tx, user).await? {
            Some(cart) => cart,
            None => self.lock_or_create_open_cart(&mut tx, user).await?,
        };

        let cart = self.with_items(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            item_uuid = %item.item_uuid,
            quantity = item.quantity
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        let quantity = u32::try_from(item.quantity)
            .ok()
            .filter(|quantity| *quantity >= 1)
            .ok_or(CartsServiceError::InvalidQuantity)?;

        let catalog_item = self.catalog.get_item(item.item_uuid).await?;

        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self.lock_or_create_open_cart(&mut tx, user).await?;

        let existing = self
            .items_repository
            .get_cart_item(&mut tx, cart.uuid, item.item_uuid)
            .await?
            .map_or(0, |line| line.quantity);

        // The merged line must still fit the `INTEGER` quantity column.
        let requested = existing
            .checked_add(quantity)
            .filter(|total| i32::try_from(*total).is_ok())
            .ok_or(CartsServiceError::InvalidQuantity)?;

        self.check_stock(item.item_uuid, requested, catalog_item.available)?;

        self.items_repository
            .upsert_cart_item(
                &mut tx,
                cart.uuid,
                item.item_uuid,
                quantity,
                catalog_item.price,
            )
            .await?;

        let cart = self.reprice(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        info!(cart_uuid = %cart.uuid, line_quantity = requested, "added item to cart");

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.update_item_quantity",
        skip(self),
        fields(user_uuid = %user, item_uuid = %item),
        err
    )]
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: ItemUuid,
        quantity: i32,
    ) -> Result<CartRecord, CartsServiceError> {
        let quantity = u32::try_from(quantity).ok().filter(|quantity| *quantity >= 1);

        // Resolve stock before taking the cart lock. A missing catalog item is
        // only reported once the line is known to exist.
        let available = match quantity {
            Some(_) if self.policy.enforce_stock => match self.catalog.get_item(item).await {
                Ok(record) => Some(record.available),
                Err(CatalogServiceError::NotFound) => None,
                Err(error) => return Err(error.into()),
            },
            _ => None,
        };

        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self
            .carts_repository
            .lock_open_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NoActiveCart)?;

        let Some(quantity) = quantity else {
            let removed = self
                .items_repository
                .delete_cart_item(&mut tx, cart.uuid, item)
                .await?;

            let cart = if removed > 0 {
                self.reprice(&mut tx, cart.uuid).await?
            } else {
                self.with_items(&mut tx, cart).await?
            };

            tx.commit().await?;

            return Ok(cart);
        };

        let updated = self
            .items_repository
            .set_quantity(&mut tx, cart.uuid, item, quantity)
            .await?;

        if updated == 0 {
            return Err(CartsServiceError::NotInCart);
        }

        // Returning early drops the transaction, rolling back the update.
        if self.policy.enforce_stock {
            let available = available.ok_or(CartsServiceError::ItemNotFound)?;

            self.check_stock(item, quantity, available)?;
        }

        let cart = self.reprice(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, item_uuid = %item),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        item: ItemUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self.lock_or_create_open_cart(&mut tx, user).await?;

        let removed = self
            .items_repository
            .delete_cart_item(&mut tx, cart.uuid, item)
            .await?;

        let cart = if removed > 0 {
            self.reprice(&mut tx, cart.uuid).await?
        } else {
            self.with_items(&mut tx, cart).await?
        };

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.clear",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn clear(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let cart = self.lock_or_create_open_cart(&mut tx, user).await?;

        self.items_repository
            .clear_cart_items(&mut tx, cart.uuid)
            .await?;

        let cart = self.reprice(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Return the user's open cart with its lines, creating an empty one if needed.
    async fn get_open_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Add units of a catalog item, merging with an existing line for the same item.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Set a line's quantity. Zero or less removes the line.
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: ItemUuid,
        quantity: i32,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove a line if present.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: ItemUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every line; the cart stays open.
    async fn clear(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;
}

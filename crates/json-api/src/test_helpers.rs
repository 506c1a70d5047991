//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use shopfront_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartStatus, CartUuid},
        },
        catalog::{
            MockCatalogReader,
            records::{ItemRecord, ItemUuid},
        },
        orders::{
            MockCheckoutService, MockOrdersService,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid},
        },
        users::records::UserUuid,
    },
};
use uuid::Uuid;

use crate::extensions::*;

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Mocked services; any call without a matching expectation fails the test.
pub(crate) struct TestServices {
    pub catalog: MockCatalogReader,
    pub carts: MockCartsService,
    pub checkout: MockCheckoutService,
    pub orders: MockOrdersService,
    pub auth: MockAuthService,
}

impl TestServices {
    pub(crate) fn new() -> Self {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        Self {
            catalog: MockCatalogReader::new(),
            carts: MockCartsService::new(),
            checkout: MockCheckoutService::new(),
            orders: MockOrdersService::new(),
            auth,
        }
    }

    pub(crate) fn into_app_context(self) -> AppContext {
        AppContext {
            catalog: Arc::new(self.catalog),
            carts: Arc::new(self.carts),
            checkout: Arc::new(self.checkout),
            orders: Arc::new(self.orders),
            auth: Arc::new(self.auth),
        }
    }

    /// Serve `route` as [`TEST_USER_UUID`].
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_app_context()))
                .hoop(inject_user)
                .push(route),
        )
    }

    /// Serve `route` without an authenticated user.
    pub(crate) fn unauthenticated_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_app_context()))
                .push(route),
        )
    }
}

pub(crate) fn make_item(price: u64, available: u32) -> ItemRecord {
    ItemRecord {
        uuid: ItemUuid::new(),
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        price,
        available,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// An open cart for [`TEST_USER_UUID`] holding `quantity` units of `item` at `price`.
pub(crate) fn make_cart(item: ItemUuid, price: u64, quantity: u32) -> CartRecord {
    let subtotal = price * u64::from(quantity);
    let tax = subtotal / 10;
    let shipping = if subtotal > 50_00 { 0 } else { 4_99 };

    CartRecord {
        uuid: CartUuid::new(),
        user_uuid: TEST_USER_UUID,
        status: CartStatus::Open,
        items: vec![CartItemRecord {
            uuid: CartItemUuid::new(),
            item_uuid: item,
            quantity,
            price,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }],
        subtotal,
        tax,
        shipping,
        total: subtotal + tax + shipping,
        version: 1,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        closed_at: None,
    }
}

pub(crate) fn make_empty_cart() -> CartRecord {
    CartRecord {
        uuid: CartUuid::new(),
        user_uuid: TEST_USER_UUID,
        status: CartStatus::Open,
        items: Vec::new(),
        subtotal: 0,
        tax: 0,
        shipping: 0,
        total: 0,
        version: 0,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        closed_at: None,
    }
}

/// The order checkout would produce from `cart`.
pub(crate) fn make_order(cart: &CartRecord) -> OrderRecord {
    OrderRecord {
        uuid: OrderUuid::new(),
        user_uuid: cart.user_uuid,
        cart_uuid: cart.uuid,
        status: OrderStatus::Pending,
        items: cart
            .items
            .iter()
            .map(|line| OrderItemRecord {
                uuid: OrderItemUuid::new(),
                item_uuid: line.item_uuid,
                name: "Widget".to_string(),
                price: line.price,
                quantity: line.quantity,
            })
            .collect(),
        subtotal: cart.subtotal,
        tax: cart.tax,
        shipping: cart.shipping,
        total: cart.total,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

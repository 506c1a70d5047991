//! Order events written to the `order_events` outbox.
//!
//! Events are inserted in the checkout transaction and left unpublished.
//! Relaying them to the catalog (for stock decrement) happens elsewhere.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::orders::records::OrderRecord;

pub const ORDER_PLACED: &str = "order_placed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPlacedEvent {
    pub order_uuid: Uuid,
    pub user_uuid: Uuid,
    pub lines: Vec<OrderPlacedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPlacedLine {
    pub item_uuid: Uuid,
    pub quantity: u32,
}

impl From<&OrderRecord> for OrderPlacedEvent {
    fn from(order: &OrderRecord) -> Self {
        Self {
            order_uuid: order.uuid.into_uuid(),
            user_uuid: order.user_uuid.into_uuid(),
            lines: order
                .items
                .iter()
                .map(|item| OrderPlacedLine {
                    item_uuid: item.item_uuid.into_uuid(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use serde_json::json;
    use testresult::TestResult;

    use crate::domain::{
        carts::records::CartUuid,
        catalog::records::ItemUuid,
        orders::records::{OrderItemRecord, OrderItemUuid, OrderStatus, OrderUuid},
        users::records::UserUuid,
    };

    use super::*;

    #[test]
    fn payload_lists_items_and_quantities() -> TestResult {
        let item_uuid = ItemUuid::new();
        let now = Timestamp::now();

        let order = OrderRecord {
            uuid: OrderUuid::new(),
            user_uuid: UserUuid::new(),
            cart_uuid: CartUuid::new(),
            status: OrderStatus::Pending,
            items: vec![OrderItemRecord {
                uuid: OrderItemUuid::new(),
                item_uuid,
                name: "Book".to_string(),
                price: 10_00,
                quantity: 2,
            }],
            subtotal: 20_00,
            tax: 2_00,
            shipping: 4_99,
            total: 26_99,
            created_at: now,
            updated_at: now,
        };

        let payload = serde_json::to_value(OrderPlacedEvent::from(&order))?;

        assert_eq!(
            payload,
            json!({
                "order_uuid": order.uuid.into_uuid(),
                "user_uuid": order.user_uuid.into_uuid(),
                "lines": [{ "item_uuid": item_uuid.into_uuid(), "quantity": 2 }],
            })
        );

        Ok(())
    }
}

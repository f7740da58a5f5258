//! Order models.
//!
//! Orders snapshot everything they need at placement time (item names,
//! unit prices, addresses, shipping method) so later catalog edits never
//! rewrite history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use thistle_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// An order row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Absent for guest checkouts.
    pub user_id: Option<UserId>,
    pub order_number: String,
    pub status: OrderStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_postal_code: String,
    pub shipping_country: String,
    pub shipping_method_name: String,
    pub subtotal: Price,
    pub shipping_price: Price,
    pub total: Price,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item belonging to an order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Product name at purchase time.
    pub product_name: String,
    /// Unit price at purchase time.
    pub unit_price: Price,
    pub quantity: i32,
}

impl OrderItem {
    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(u32::try_from(self.quantity).unwrap_or(0))
    }
}

//! Order repository.
//!
//! Order placement is the one multi-statement write in the system and is
//! fully transactional: the order insert, the guarded stock decrements,
//! the item inserts, and the cart clear either all commit or all roll
//! back. No partial order is ever visible to other requests.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use thistle_core::{OrderId, OrderStatus, Price, UserId};

use super::RepositoryError;
use super::cart::{CartLine, subtotal};
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_id, order_number, status, customer_name, customer_email,
     customer_phone, shipping_address, shipping_city, shipping_postal_code, shipping_country,
     shipping_method_name, subtotal, shipping_price, total, notes, created_at, updated_at";

/// Checkout details collected from the customer.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_postal_code: String,
    pub shipping_country: String,
    pub shipping_method_name: String,
    pub shipping_price: Price,
    pub notes: Option<String>,
}

/// Errors specific to placing an order.
#[derive(Debug, thiserror::Error)]
pub enum PlaceOrderError {
    /// The cart had no purchasable lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A product no longer has enough stock.
    #[error("insufficient stock for {0}")]
    InsufficientStock(String),

    /// Underlying database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PlaceOrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Errors specific to order status changes.
#[derive(Debug, thiserror::Error)]
pub enum StatusTransitionError {
    /// The order does not exist.
    #[error("order not found")]
    NotFound,

    /// The requested transition is not allowed by the state machine.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Underlying database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for StatusTransitionError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Generate a human-readable order number.
///
/// Uppercase hex from a fresh UUID, prefixed for support conversations
/// ("order TP-3F29AC81D4").
#[must_use]
pub fn generate_order_number() -> String {
    let hex: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(10)
        .collect::<String>()
        .to_uppercase();
    format!("TP-{hex}")
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the cart identified by `cart_token`.
    ///
    /// Runs entirely inside one transaction:
    ///
    /// 1. load and lock the cart's product rows,
    /// 2. insert the order with price totals computed from current prices,
    /// 3. decrement stock with a guard (`stock_quantity >= wanted`) —
    ///    zero rows affected means another order got there first and the
    ///    whole placement rolls back,
    /// 4. insert the order items with name/price snapshots,
    /// 5. clear the cart.
    ///
    /// # Errors
    ///
    /// Returns `PlaceOrderError::EmptyCart` if the cart has no lines,
    /// `PlaceOrderError::InsufficientStock` naming the first product that
    /// cannot be fulfilled, or `PlaceOrderError::Repository` on database
    /// failure. On any error no rows remain in `orders` or `order_items`.
    pub async fn place_order(
        &self,
        cart_token: Uuid,
        details: &PlaceOrder,
    ) -> Result<Order, PlaceOrderError> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, CartLine>(
            "SELECT ci.product_id,
                    p.name AS product_name,
                    p.slug AS product_slug,
                    p.price AS unit_price,
                    p.image_path,
                    ci.quantity,
                    p.stock_quantity
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_token = $1 AND p.active
             ORDER BY ci.created_at
             FOR UPDATE OF p",
        )
        .bind(cart_token)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(PlaceOrderError::EmptyCart);
        }

        let items_subtotal = subtotal(&lines);
        let total = items_subtotal + details.shipping_price;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders
                 (user_id, order_number, status, customer_name, customer_email, customer_phone,
                  shipping_address, shipping_city, shipping_postal_code, shipping_country,
                  shipping_method_name, subtotal, shipping_price, total, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(details.user_id)
        .bind(generate_order_number())
        .bind(OrderStatus::Pending)
        .bind(&details.customer_name)
        .bind(&details.customer_email)
        .bind(&details.customer_phone)
        .bind(&details.shipping_address)
        .bind(&details.shipping_city)
        .bind(&details.shipping_postal_code)
        .bind(&details.shipping_country)
        .bind(&details.shipping_method_name)
        .bind(items_subtotal)
        .bind(details.shipping_price)
        .bind(total)
        .bind(&details.notes)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            reserve_stock(&mut tx, line).await?;

            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, unit_price, quantity)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.unit_price)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_token = $1")
            .bind(cart_token)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// List a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Load one of a customer's orders with its items.
    ///
    /// The user id is part of the lookup so customers can never read each
    /// other's orders by guessing ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match order {
            Some(order) => {
                let items = self.items(order.id).await?;
                Ok(Some((order, items)))
            }
            None => Ok(None),
        }
    }

    /// Find an order by its public order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_number(&self, number: &str) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(number)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// List orders for the back-office, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE ($1::order_status IS NULL OR status = $1)
             ORDER BY created_at DESC"
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Load any order with its items (back-office).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        match order {
            Some(order) => {
                let items = self.items(order.id).await?;
                Ok(Some((order, items)))
            }
            None => Ok(None),
        }
    }

    /// Move an order to a new status, enforcing the state machine.
    ///
    /// The current status is read under a row lock so two concurrent
    /// transitions cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `StatusTransitionError::NotFound` for an unknown order,
    /// `StatusTransitionError::InvalidTransition` when the move is not
    /// allowed, or `StatusTransitionError::Repository` on database failure.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<(), StatusTransitionError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<OrderStatus> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            return Err(StatusTransitionError::NotFound);
        };

        if !current.can_transition_to(next) {
            return Err(StatusTransitionError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(next)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Order counts per status (for the admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(
        &self,
    ) -> Result<Vec<(OrderStatus, i64)>, RepositoryError> {
        let counts = sqlx::query_as::<_, (OrderStatus, i64)>(
            "SELECT status, COUNT(*) FROM orders GROUP BY status",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(counts)
    }

    async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, product_name, unit_price, quantity
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

/// Decrement stock for one cart line inside the placement transaction.
///
/// The `stock_quantity >= $n` guard makes the decrement atomic with the
/// availability check; losing a race surfaces as `InsufficientStock`.
async fn reserve_stock(
    tx: &mut Transaction<'_, Postgres>,
    line: &CartLine,
) -> Result<(), PlaceOrderError> {
    let result = sqlx::query(
        "UPDATE products SET stock_quantity = stock_quantity - $1
         WHERE id = $2 AND stock_quantity >= $1",
    )
    .bind(line.quantity)
    .bind(line.product_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(PlaceOrderError::InsufficientStock(
            line.product_name.clone(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number();
        assert!(number.starts_with("TP-"));
        assert_eq!(number.len(), 13);
        assert!(
            number
                .trim_start_matches("TP-")
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_order_numbers_are_distinct() {
        assert_ne!(generate_order_number(), generate_order_number());
    }
}

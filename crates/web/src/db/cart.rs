//! Cart repository.
//!
//! Carts are rows in `cart_items` keyed by a session-scoped UUID token;
//! the token lives in the visitor's session and survives login.

use sqlx::PgPool;
use uuid::Uuid;

use thistle_core::{Price, ProductId};

use super::RepositoryError;

/// A cart row joined with its product for display and checkout.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_slug: String,
    pub unit_price: Price,
    pub image_path: Option<String>,
    pub quantity: i32,
    pub stock_quantity: i32,
}

impl CartLine {
    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(u32::try_from(self.quantity).unwrap_or(0))
    }
}

/// Sum of line totals.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the cart's lines, newest first.
    ///
    /// Lines whose product has been deactivated since it was added are
    /// excluded; they silently drop out of the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, token: Uuid) -> Result<Vec<CartLine>, RepositoryError> {
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
             ORDER BY ci.created_at DESC",
        )
        .bind(token)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add a product to the cart, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including
    /// an FK violation for an unknown product).
    pub async fn add(
        &self,
        token: Uuid,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (cart_token, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (cart_token, product_id)
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(token)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        token: Uuid,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if quantity <= 0 {
            return self.remove(token, product_id).await;
        }

        sqlx::query(
            "UPDATE cart_items SET quantity = $1
             WHERE cart_token = $2 AND product_id = $3",
        )
        .bind(quantity)
        .bind(token)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, token: Uuid, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_token = $1 AND product_id = $2")
            .bind(token)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Total number of units in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, token: Uuid) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(ci.quantity), 0)
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_token = $1 AND p.active",
        )
        .bind(token)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(cents: i64, quantity: i32) -> CartLine {
        CartLine {
            product_id: ProductId::new(1),
            product_name: "Oak Candle".to_owned(),
            product_slug: "oak-candle".to_owned(),
            unit_price: Price::from_cents(cents),
            image_path: None,
            quantity,
            stock_quantity: 10,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(1250, 3).line_total().display(), "37.50");
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let lines = vec![line(1000, 2), line(550, 1)];
        assert_eq!(subtotal(&lines).display(), "25.50");
    }

    #[test]
    fn test_subtotal_empty_cart_is_zero() {
        assert_eq!(subtotal(&[]).display(), "0.00");
    }
}

//! Catalog models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use thistle_core::{CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub position: i32,
}

/// A product row, joined with its category name for display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_slug: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub stock_quantity: i32,
    pub image_path: Option<String>,
    pub active: bool,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.active && self.stock_quantity > 0
    }
}

/// Derive a URL slug from a display name.
///
/// Lowercases, maps runs of non-alphanumeric characters to single hyphens,
/// and trims hyphens from both ends.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress leading hyphen

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Juniper Hand Balm"), "juniper-hand-balm");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Oak & Ash -- Candle!"), "oak-ash-candle");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  Wool Throw  "), "wool-throw");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_non_ascii_dropped() {
        assert_eq!(slugify("Café Crème"), "caf-cr-me");
    }
}

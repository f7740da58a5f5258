//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, take_flash};
use crate::i18n::Locale;
use crate::middleware::OptionalAuth;
use crate::models::{Category, CurrentUser, Product};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub active_category: Option<String>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub product: Product,
}

/// Display the product listing, optionally filtered by category slug.
pub async fn index(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> Result<ProductsIndexTemplate> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    let products = ProductRepository::new(state.pool())
        .list_active(query.category.as_deref())
        .await?;

    Ok(ProductsIndexTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        categories,
        products,
        active_category: query.category,
    })
}

/// Display a product's detail page.
pub async fn show(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Path(slug): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = ProductRepository::new(state.pool())
        .find_active_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(ProductShowTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        product,
    })
}

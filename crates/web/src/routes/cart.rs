//! Cart route handlers.
//!
//! The cart lives in `cart_items` rows keyed by a UUID token stored in the
//! session; the token is minted on first cart use and survives login.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use uuid::Uuid;

use thistle_core::{Price, ProductId};

use crate::db::cart::{CartLine, CartRepository, subtotal};
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, set_flash, take_flash};
use crate::i18n::Locale;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart token from the session, if one exists.
pub async fn get_cart_token(session: &Session) -> Option<Uuid> {
    session
        .get::<Uuid>(session_keys::CART_TOKEN)
        .await
        .ok()
        .flatten()
}

/// Get the cart token, minting and storing a new one if absent.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn ensure_cart_token(session: &Session) -> Result<Uuid> {
    if let Some(token) = get_cart_token(session).await {
        return Ok(token);
    }

    let token = Uuid::new_v4();
    session.insert(session_keys::CART_TOKEN, token).await?;
    Ok(token)
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub quantity: Option<i32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub lines: Vec<CartLine>,
    pub cart_subtotal: Price,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
pub async fn show(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<CartShowTemplate> {
    let lines = match get_cart_token(&session).await {
        Some(token) => CartRepository::new(state.pool()).lines(token).await?,
        None => Vec::new(),
    };
    let cart_subtotal = subtotal(&lines);

    Ok(CartShowTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        lines,
        cart_subtotal,
    })
}

/// Add a product to the cart and bounce back to its page.
pub async fn add(
    State(state): State<AppState>,
    locale: Locale,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = form.quantity.unwrap_or(1).max(1);

    // Only active, in-stock products can be added
    let product = ProductRepository::new(state.pool())
        .find_by_id(form.product_id)
        .await?
        .filter(|p| p.is_purchasable())
        .ok_or_else(|| AppError::BadRequest("product is not available".to_owned()))?;

    let token = ensure_cart_token(&session).await?;
    CartRepository::new(state.pool())
        .add(token, product.id, quantity)
        .await?;

    set_flash(&session, Flash::success(locale.t("flash.cart_added"))).await?;
    Ok(Redirect::to(&format!("/products/{}", product.slug)).into_response())
}

/// Update a line's quantity.
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    if let Some(token) = get_cart_token(&session).await {
        CartRepository::new(state.pool())
            .set_quantity(token, form.product_id, form.quantity)
            .await?;
    }

    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    if let Some(token) = get_cart_token(&session).await {
        CartRepository::new(state.pool())
            .remove(token, form.product_id)
            .await?;
    }

    Ok(Redirect::to("/cart"))
}

/// Cart badge count as JSON (polled by the header).
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Response> {
    let count = match get_cart_token(&session).await {
        Some(token) => CartRepository::new(state.pool()).count(token).await?,
        None => 0,
    };

    Ok(Json(json!({ "success": true, "count": count })).into_response())
}

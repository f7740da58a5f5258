//! JSON API endpoints.
//!
//! Every response body carries a boolean `success` field; failures add an
//! `error` string, successes add their payload. Auth failures are handled
//! by the extractors in [`crate::middleware::auth`], which return the same
//! envelope for `/api/` paths.

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use thistle_core::ProductId;

use crate::db::cart::{CartLine, CartRepository, subtotal};
use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::error::{Result, json_error};
use crate::routes::cart::{ensure_cart_token, get_cart_token};
use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products_index))
        .route("/products/{slug}", get(products_show))
        .route("/categories", get(categories_index))
        .route("/cart", get(cart_show))
        .route("/cart/add", post(cart_add))
        .route("/cart/remove", post(cart_remove))
}

/// Wrap a payload in the success envelope.
fn ok(payload: Value) -> Response {
    let mut envelope = serde_json::Map::new();
    envelope.insert("success".to_owned(), Value::Bool(true));
    if let Value::Object(extra) = payload {
        envelope.extend(extra);
    }
    Json(Value::Object(envelope)).into_response()
}

/// Query parameters for the product list.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
}

/// Cart mutation form/JSON data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub quantity: Option<i32>,
}

fn cart_payload(lines: &[CartLine]) -> Value {
    let items: Vec<Value> = lines
        .iter()
        .map(|line| {
            json!({
                "product_id": line.product_id,
                "name": line.product_name,
                "slug": line.product_slug,
                "unit_price": line.unit_price,
                "quantity": line.quantity,
                "line_total": line.line_total(),
            })
        })
        .collect();

    json!({ "items": items, "subtotal": subtotal(lines) })
}

/// List active products.
pub async fn products_index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Response> {
    let products = ProductRepository::new(state.pool())
        .list_active(query.category.as_deref())
        .await?;

    Ok(ok(json!({ "products": products })))
}

/// One active product by slug.
pub async fn products_show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let product = ProductRepository::new(state.pool())
        .find_active_by_slug(&slug)
        .await?;

    match product {
        Some(product) => Ok(ok(json!({ "product": product }))),
        None => Ok(json_error(StatusCode::NOT_FOUND, "product not found")),
    }
}

/// List categories.
pub async fn categories_index(State(state): State<AppState>) -> Result<Response> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(ok(json!({ "categories": categories })))
}

/// Current cart contents.
pub async fn cart_show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let lines = match get_cart_token(&session).await {
        Some(token) => CartRepository::new(state.pool()).lines(token).await?,
        None => Vec::new(),
    };

    Ok(ok(cart_payload(&lines)))
}

/// Add a product to the cart.
pub async fn cart_add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let quantity = form.quantity.unwrap_or(1).max(1);

    let product = ProductRepository::new(state.pool())
        .find_by_id(form.product_id)
        .await?
        .filter(crate::models::Product::is_purchasable);

    let Some(product) = product else {
        return Ok(json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "product is not available",
        ));
    };

    let token = ensure_cart_token(&session).await?;
    let cart = CartRepository::new(state.pool());
    cart.add(token, product.id, quantity).await?;
    let lines = cart.lines(token).await?;

    Ok(ok(cart_payload(&lines)))
}

/// Remove a product from the cart.
pub async fn cart_remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let cart = CartRepository::new(state.pool());

    let lines = match get_cart_token(&session).await {
        Some(token) => {
            cart.remove(token, form.product_id).await?;
            cart.lines(token).await?
        }
        None => Vec::new(),
    };

    Ok(ok(cart_payload(&lines)))
}

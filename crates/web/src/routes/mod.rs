//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the database)
//!
//! # Catalog
//! GET  /products               - Product listing (?category= filter)
//! GET  /products/{slug}        - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart
//! POST /cart/update            - Update line quantity
//! POST /cart/remove            - Remove line
//! GET  /cart/count             - Cart badge count (JSON)
//!
//! # Checkout
//! GET  /checkout               - Checkout form
//! POST /checkout               - Place order (transactional)
//! GET  /checkout/complete/{number} - Order confirmation
//!
//! # Content
//! GET  /blog                   - Blog listing (?category= filter)
//! GET  /blog/{slug}            - Blog post
//! GET  /gallery                - Gallery page
//! GET  /certificates           - Certificates page
//! GET  /lang/{code}            - Switch UI language
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /register               - Register page
//! POST /register               - Register action
//! POST /logout                 - Logout action
//!
//! # Customer dashboard (requires auth)
//! GET  /dashboard              - Overview
//! GET  /dashboard/orders       - Order history
//! GET  /dashboard/orders/{id}  - Order detail (own orders only)
//! GET  /dashboard/profile      - Profile form
//! POST /dashboard/profile      - Update profile
//!
//! # JSON API (success envelope)
//! GET  /api/products           - Product list
//! GET  /api/products/{slug}    - Product detail
//! GET  /api/categories         - Category list
//! GET  /api/cart               - Cart contents
//! POST /api/cart/add           - Add to cart
//! POST /api/cart/remove        - Remove from cart
//!
//! # Admin back-office (requires admin; blog/gallery allow content managers)
//! GET  /admin                  - Dashboard
//! /admin/products/**           - Product CRUD
//! /admin/categories/**         - Category CRUD (AJAX delete)
//! /admin/orders/**             - Orders and status transitions
//! /admin/shipping/**           - Shipping zones and methods
//! /admin/blog/**               - Blog posts and categories
//! /admin/gallery/**            - Gallery items
//! /admin/certificates/**       - Certificates
//! ```

pub mod account;
pub mod admin;
pub mod api;
pub mod auth;
pub mod blog;
pub mod cart;
pub mod checkout;
pub mod content_pages;
pub mod home;
pub mod lang;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::{StatusCode, Uri},
    routing::{get, post},
};

use crate::error::json_error;
use crate::i18n::Locale;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/complete/{number}", get(checkout::complete))
}

/// Create the customer dashboard router (auth enforced per handler).
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order_detail))
        .route(
            "/profile",
            get(account::profile).post(account::update_profile),
        )
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/products", product_routes())
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
        // Blog & content pages
        .route("/blog", get(blog::index))
        .route("/blog/{slug}", get(blog::show))
        .route("/gallery", get(content_pages::gallery))
        .route("/certificates", get(content_pages::certificates))
        // Language switch
        .route("/lang/{code}", get(lang::switch))
        // Auth
        .merge(auth_routes())
        // Customer dashboard
        .nest("/dashboard", dashboard_routes())
        // JSON API
        .nest("/api", api::routes())
        // Admin back-office
        .nest("/admin", admin::routes())
        // 404 for everything else
        .fallback(not_found)
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub locale: Locale,
    pub user: Option<crate::models::CurrentUser>,
    pub flash: Option<crate::flash::Flash>,
}

/// Fallback handler for unmatched routes.
///
/// API paths get the JSON envelope; everything else gets the 404 page.
pub async fn not_found(
    uri: Uri,
    locale: Locale,
    crate::middleware::OptionalAuth(user): crate::middleware::OptionalAuth,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    if uri.path().starts_with("/api/") {
        return json_error(StatusCode::NOT_FOUND, "not found");
    }

    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            locale,
            user,
            flash: None,
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::net::IpAddr;
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::extract::Path;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use thistle_core::ProductId;

    use crate::config::{AppConfig, DatabaseConfig};
    use crate::db;
    use crate::i18n::{Language, Translator};
    use crate::state::AppState;

    use super::routes;

    /// Build the real route table over a lazily-connected pool and an
    /// in-memory session store. Routes exercised here must reject or
    /// answer before any repository call.
    fn test_app() -> axum::Router {
        let config = AppConfig {
            database: DatabaseConfig {
                host: "127.0.0.1".to_owned(),
                port: 5432,
                name: "thistle_test".to_owned(),
                user: "thistle".to_owned(),
                password: SecretString::from("unused"),
            },
            host: "127.0.0.1".parse::<IpAddr>().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_owned(),
            debug: false,
            default_language: "en".to_owned(),
            locales_dir: PathBuf::from("locales"),
            sentry_dsn: None,
        };

        let pool = db::lazy_pool(&config.database);
        let translator = Translator::from_tables(HashMap::new(), Language::En);
        let state = AppState::new(config, pool, translator);

        let session_layer = SessionManagerLayer::new(MemoryStore::default());

        routes().layer(session_layer).with_state(state)
    }

    async fn get(path: &str) -> axum::response::Response {
        test_app()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unmatched_route_renders_404_page() {
        let response = get("/definitely/not/a/route").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<html"));
    }

    #[tokio::test]
    async fn test_unmatched_api_route_gets_json_envelope() {
        let response = get("/api/definitely-missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], serde_json::Value::Bool(false));
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_admin_rejected_before_handler_without_session() {
        // The lazy pool cannot connect to anything; the request only
        // succeeds in redirecting because the guard fires first.
        let response = get("/admin").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[tokio::test]
    async fn test_admin_edit_route_rejected_without_session() {
        let response = get("/admin/products/42/edit").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[tokio::test]
    async fn test_dashboard_rejected_without_session() {
        let response = get("/dashboard/orders").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[tokio::test]
    async fn test_login_page_renders() {
        let response = get("/login").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("form"));
    }

    #[tokio::test]
    async fn test_language_switch_redirects_back() {
        let response = get("/lang/es").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_unknown_language_is_404() {
        let response = get("/lang/xx").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_placeholder_segment_binds_path_parameter() {
        // Same pattern shape the admin table registers; the stub handler
        // echoes the bound id so the binding itself is observable.
        let app = axum::Router::new().route(
            "/admin/products/{id}/edit",
            axum::routing::get(|Path(id): Path<ProductId>| async move { id.to_string() }),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/products/42/edit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"42");
    }
}

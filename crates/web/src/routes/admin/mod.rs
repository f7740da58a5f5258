//! Admin back-office route handlers.
//!
//! Every handler is gated by [`crate::middleware::RequireAdmin`], except
//! the blog and gallery sections which accept content managers via
//! [`crate::middleware::RequireContentManager`]. The guards run before
//! the handlers; an unauthenticated browser is redirected to `/login`,
//! an authenticated non-staff user gets a 403.
//!
//! # Route Structure
//!
//! ```text
//! GET  /admin                          - Dashboard
//!
//! # Products
//! GET  /admin/products                 - Listing
//! GET  /admin/products/new             - Create form
//! POST /admin/products                 - Create
//! GET  /admin/products/{id}/edit       - Edit form
//! POST /admin/products/{id}            - Update
//! POST /admin/products/{id}/delete     - Delete
//!
//! # Categories
//! GET  /admin/categories               - Listing with inline create form
//! POST /admin/categories               - Create
//! POST /admin/categories/{id}          - Update
//! POST /admin/categories/{id}/delete   - Delete (AJAX, JSON response)
//!
//! # Orders
//! GET  /admin/orders                   - Listing (?status= filter)
//! GET  /admin/orders/{id}              - Detail
//! POST /admin/orders/{id}/status       - Status transition
//!
//! # Shipping
//! GET  /admin/shipping                 - Zones and methods
//! POST /admin/shipping/zones           - Create zone
//! POST /admin/shipping/zones/{id}      - Update zone
//! POST /admin/shipping/zones/{id}/delete - Delete zone (methods cascade)
//! POST /admin/shipping/methods         - Create method
//! POST /admin/shipping/methods/{id}    - Update method
//! POST /admin/shipping/methods/{id}/delete - Delete method
//!
//! # Blog (content managers allowed)
//! GET  /admin/blog                     - Post listing
//! GET  /admin/blog/new                 - Create form
//! POST /admin/blog                     - Create
//! GET  /admin/blog/{id}/edit           - Edit form
//! POST /admin/blog/{id}                - Update
//! POST /admin/blog/{id}/delete         - Delete
//! POST /admin/blog/categories          - Create category
//! POST /admin/blog/categories/{id}/delete - Delete category
//!
//! # Gallery (content managers allowed)
//! GET  /admin/gallery                  - Listing with create form
//! POST /admin/gallery                  - Create
//! POST /admin/gallery/{id}/delete      - Delete
//!
//! # Certificates
//! GET  /admin/certificates             - Listing with create form
//! POST /admin/certificates             - Create
//! POST /admin/certificates/{id}/delete - Delete
//! ```

pub mod blog;
pub mod categories;
pub mod certificates;
pub mod dashboard;
pub mod gallery;
pub mod orders;
pub mod products;
pub mod shipping;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        // Products
        .route("/products", get(products::index).post(products::create))
        .route("/products/new", get(products::new))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit))
        .route("/products/{id}/delete", post(products::delete))
        // Categories
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route("/categories/{id}", post(categories::update))
        .route("/categories/{id}/delete", post(categories::delete))
        // Orders
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
        // Shipping
        .route("/shipping", get(shipping::index))
        .route("/shipping/zones", post(shipping::create_zone))
        .route("/shipping/zones/{id}", post(shipping::update_zone))
        .route("/shipping/zones/{id}/delete", post(shipping::delete_zone))
        .route("/shipping/methods", post(shipping::create_method))
        .route("/shipping/methods/{id}", post(shipping::update_method))
        .route(
            "/shipping/methods/{id}/delete",
            post(shipping::delete_method),
        )
        // Blog
        .route("/blog", get(blog::index).post(blog::create))
        .route("/blog/new", get(blog::new))
        .route("/blog/{id}", post(blog::update))
        .route("/blog/{id}/edit", get(blog::edit))
        .route("/blog/{id}/delete", post(blog::delete))
        .route("/blog/categories", post(blog::create_category))
        .route("/blog/categories/{id}/delete", post(blog::delete_category))
        // Gallery
        .route("/gallery", get(gallery::index).post(gallery::create))
        .route("/gallery/{id}/delete", post(gallery::delete))
        // Certificates
        .route(
            "/certificates",
            get(certificates::index).post(certificates::create),
        )
        .route("/certificates/{id}/delete", post(certificates::delete))
}

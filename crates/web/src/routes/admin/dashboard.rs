//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;

use thistle_core::OrderStatus;

use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::Result;
use crate::flash::{Flash, take_flash};
use crate::middleware::RequireAdmin;
use crate::models::CurrentUser;
use crate::state::AppState;

/// One row of the orders-by-status table.
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub order_counts: Vec<StatusCount>,
    pub product_count: i64,
    pub customer_count: i64,
}

/// Overview counts for the back-office landing page.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<DashboardTemplate> {
    let raw_counts = OrderRepository::new(state.pool()).count_by_status().await?;

    // Show every status, zero-filled, in lifecycle order
    let order_counts = OrderStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: raw_counts
                .iter()
                .find(|(s, _)| *s == status)
                .map_or(0, |(_, c)| *c),
        })
        .collect();

    let product_count = ProductRepository::new(state.pool()).count().await?;
    let customer_count = UserRepository::new(state.pool()).count_customers().await?;

    Ok(DashboardTemplate {
        admin,
        flash: take_flash(&session).await,
        order_counts,
        product_count,
        customer_count,
    })
}

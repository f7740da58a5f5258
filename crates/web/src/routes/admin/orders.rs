//! Admin order management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::{OrderId, OrderStatus};

use crate::db::orders::{OrderRepository, StatusTransitionError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, set_flash, take_flash};
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, Order, OrderItem};
use crate::state::AppState;

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub status: Option<OrderStatus>,
}

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// Order listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/index.html")]
pub struct OrdersIndexTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub orders: Vec<Order>,
    pub statuses: Vec<OrderStatus>,
    pub active_status: Option<OrderStatus>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/show.html")]
pub struct OrderShowTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub next_statuses: Vec<OrderStatus>,
}

/// Order listing with optional status filter.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> Result<OrdersIndexTemplate> {
    let orders = OrderRepository::new(state.pool())
        .list(query.status)
        .await?;

    Ok(OrdersIndexTemplate {
        admin,
        flash: take_flash(&session).await,
        orders,
        statuses: OrderStatus::ALL.to_vec(),
        active_status: query.status,
    })
}

/// Order detail with the legal next statuses for the action buttons.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<OrderId>,
) -> Result<OrderShowTemplate> {
    let (order, items) = OrderRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let next_statuses = order.status.next_statuses();

    Ok(OrderShowTemplate {
        admin,
        flash: take_flash(&session).await,
        order,
        items,
        next_statuses,
    })
}

/// Apply a status transition; illegal moves are rejected with a flash.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    match OrderRepository::new(state.pool())
        .update_status(id, form.status)
        .await
    {
        Ok(()) => {
            tracing::info!(order_id = %id, status = %form.status, "order status changed");
            set_flash(&session, Flash::success("Order status updated")).await?;
        }
        Err(StatusTransitionError::NotFound) => {
            return Err(AppError::NotFound(format!("order {id}")));
        }
        Err(StatusTransitionError::InvalidTransition { from, to }) => {
            set_flash(
                &session,
                Flash::error(format!("Cannot move order from {from} to {to}")),
            )
            .await?;
        }
        Err(StatusTransitionError::Repository(e)) => return Err(e.into()),
    }

    Ok(Redirect::to(&format!("/admin/orders/{id}")))
}

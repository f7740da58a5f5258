//! Customer dashboard route handlers.
//!
//! Every handler takes [`RequireAuth`], so unauthenticated requests are
//! redirected to `/login` before any of this code runs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::OrderId;

use crate::db::orders::OrderRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, set_flash, take_flash};
use crate::i18n::Locale;
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::{CurrentUser, Order, OrderItem};
use crate::state::AppState;

/// Profile update form data.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
}

/// Dashboard overview template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub recent_orders: Vec<Order>,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/orders.html")]
pub struct OrdersTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub orders: Vec<Order>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/order_detail.html")]
pub struct OrderDetailTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Profile template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/profile.html")]
pub struct ProfileTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub error: Option<String>,
}

/// Dashboard overview with the three most recent orders.
pub async fn index(
    State(state): State<AppState>,
    locale: Locale,
    RequireAuth(current): RequireAuth,
    session: Session,
) -> Result<DashboardTemplate> {
    let mut recent_orders = OrderRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;
    recent_orders.truncate(3);

    Ok(DashboardTemplate {
        locale,
        user: Some(current),
        flash: take_flash(&session).await,
        recent_orders,
    })
}

/// Full order history.
pub async fn orders(
    State(state): State<AppState>,
    locale: Locale,
    RequireAuth(current): RequireAuth,
    session: Session,
) -> Result<OrdersTemplate> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;

    Ok(OrdersTemplate {
        locale,
        user: Some(current),
        flash: take_flash(&session).await,
        orders,
    })
}

/// One order with its items; scoped to the logged-in customer.
pub async fn order_detail(
    State(state): State<AppState>,
    locale: Locale,
    RequireAuth(current): RequireAuth,
    session: Session,
    Path(id): Path<OrderId>,
) -> Result<OrderDetailTemplate> {
    let (order, items) = OrderRepository::new(state.pool())
        .find_for_user(current.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(OrderDetailTemplate {
        locale,
        user: Some(current),
        flash: take_flash(&session).await,
        order,
        items,
    })
}

/// Profile form.
pub async fn profile(
    locale: Locale,
    RequireAuth(current): RequireAuth,
    session: Session,
) -> ProfileTemplate {
    ProfileTemplate {
        locale,
        user: Some(current),
        flash: take_flash(&session).await,
        error: None,
    }
}

/// Update the display name.
pub async fn update_profile(
    State(state): State<AppState>,
    locale: Locale,
    RequireAuth(current): RequireAuth,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let name = form.name.trim();
    if name.is_empty() {
        let error = Some(locale.t("auth.errors.name_required"));
        return Ok(ProfileTemplate {
            locale,
            user: Some(current),
            flash: None,
            error,
        }
        .into_response());
    }

    UserRepository::new(state.pool())
        .update_name(current.id, name)
        .await?;

    // Refresh the session snapshot so the new name shows immediately
    let updated = CurrentUser {
        name: name.to_owned(),
        ..current
    };
    set_current_user(&session, &updated).await?;

    set_flash(&session, Flash::success(locale.t("flash.profile_updated"))).await?;
    Ok(Redirect::to("/dashboard/profile").into_response())
}

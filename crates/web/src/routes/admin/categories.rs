//! Admin category CRUD.
//!
//! Deletion is called from the listing page via AJAX and answers in the
//! JSON envelope; a category that still has products reports
//! `success:false` instead of cascading.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use thistle_core::CategoryId;

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::error::Result;
use crate::flash::{Flash, set_flash, take_flash};
use crate::middleware::RequireAdmin;
use crate::models::{Category, CurrentUser, slugify};
use crate::state::AppState;

/// Category form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub position: Option<i32>,
}

/// Category listing template (with inline create form).
#[derive(Template, WebTemplate)]
#[template(path = "admin/categories/index.html")]
pub struct CategoriesTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub categories: Vec<Category>,
}

/// Listing page.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<CategoriesTemplate> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(CategoriesTemplate {
        admin,
        flash: take_flash(&session).await,
        categories,
    })
}

fn resolve_slug(form: &CategoryForm) -> String {
    if form.slug.trim().is_empty() {
        slugify(&form.name)
    } else {
        slugify(&form.slug)
    }
}

/// Create a category.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    if form.name.trim().is_empty() {
        set_flash(&session, Flash::error("Category name is required")).await?;
        return Ok(Redirect::to("/admin/categories"));
    }

    let slug = resolve_slug(&form);
    match CategoryRepository::new(state.pool())
        .create(form.name.trim(), &slug, form.position.unwrap_or(0))
        .await
    {
        Ok(_) => set_flash(&session, Flash::success("Category created")).await?,
        Err(RepositoryError::Conflict(msg)) => set_flash(&session, Flash::error(msg)).await?,
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/categories"))
}

/// Update a category.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    if form.name.trim().is_empty() {
        set_flash(&session, Flash::error("Category name is required")).await?;
        return Ok(Redirect::to("/admin/categories"));
    }

    let slug = resolve_slug(&form);
    match CategoryRepository::new(state.pool())
        .update(id, form.name.trim(), &slug, form.position.unwrap_or(0))
        .await
    {
        Ok(()) => set_flash(&session, Flash::success("Category updated")).await?,
        Err(RepositoryError::NotFound) => {
            set_flash(&session, Flash::error("Category not found")).await?;
        }
        Err(RepositoryError::Conflict(msg)) => set_flash(&session, Flash::error(msg)).await?,
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/categories"))
}

/// Delete a category (AJAX; responds with the JSON envelope).
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Response> {
    match CategoryRepository::new(state.pool()).delete(id).await {
        Ok(true) => Ok(Json(json!({ "success": true })).into_response()),
        Ok(false) => Ok(Json(json!({ "success": false, "error": "category not found" }))
            .into_response()),
        Err(RepositoryError::Conflict(msg)) => {
            Ok(Json(json!({ "success": false, "error": msg })).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

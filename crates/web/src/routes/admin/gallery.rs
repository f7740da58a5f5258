//! Admin gallery management.
//!
//! Gated by [`RequireContentManager`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::GalleryItemId;

use crate::db::content::ContentRepository;
use crate::error::Result;
use crate::flash::{Flash, set_flash, take_flash};
use crate::middleware::RequireContentManager;
use crate::models::{CurrentUser, GalleryItem};
use crate::state::AppState;

/// Gallery item form data.
#[derive(Debug, Deserialize)]
pub struct GalleryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_path: String,
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub position: Option<i32>,
}

/// Gallery listing template (with inline create form).
#[derive(Template, WebTemplate)]
#[template(path = "admin/gallery/index.html")]
pub struct GalleryAdminTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub items: Vec<GalleryItem>,
}

/// Listing page.
pub async fn index(
    State(state): State<AppState>,
    RequireContentManager(admin): RequireContentManager,
    session: Session,
) -> Result<GalleryAdminTemplate> {
    let items = ContentRepository::new(state.pool()).list_gallery().await?;

    Ok(GalleryAdminTemplate {
        admin,
        flash: take_flash(&session).await,
        items,
    })
}

/// Create a gallery item.
pub async fn create(
    State(state): State<AppState>,
    RequireContentManager(_admin): RequireContentManager,
    session: Session,
    Form(form): Form<GalleryForm>,
) -> Result<Redirect> {
    if form.title.trim().is_empty() || form.image_path.trim().is_empty() {
        set_flash(&session, Flash::error("Title and image path are required")).await?;
        return Ok(Redirect::to("/admin/gallery"));
    }

    ContentRepository::new(state.pool())
        .create_gallery_item(
            form.title.trim(),
            form.image_path.trim(),
            form.position.unwrap_or(0),
        )
        .await?;

    set_flash(&session, Flash::success("Gallery item added")).await?;
    Ok(Redirect::to("/admin/gallery"))
}

/// Delete a gallery item.
pub async fn delete(
    State(state): State<AppState>,
    RequireContentManager(_admin): RequireContentManager,
    session: Session,
    Path(id): Path<GalleryItemId>,
) -> Result<Redirect> {
    if ContentRepository::new(state.pool())
        .delete_gallery_item(id)
        .await?
    {
        set_flash(&session, Flash::success("Gallery item deleted")).await?;
    } else {
        set_flash(&session, Flash::error("Gallery item not found")).await?;
    }

    Ok(Redirect::to("/admin/gallery"))
}

//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::content::{reading_time_minutes, render_markdown};
use crate::db::blog::BlogRepository;
use crate::error::{AppError, Result};
use crate::flash::{Flash, take_flash};
use crate::i18n::Locale;
use crate::middleware::OptionalAuth;
use crate::models::{BlogCategory, BlogPost, CurrentUser};
use crate::state::AppState;

/// Query parameters for the blog listing.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
}

/// Blog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub categories: Vec<BlogCategory>,
    pub posts: Vec<BlogPost>,
    pub active_category: Option<String>,
}

/// Blog post template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub post: BlogPost,
    pub body_html: String,
    pub reading_minutes: u32,
}

/// Published posts, optionally filtered by category slug.
pub async fn index(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> Result<BlogIndexTemplate> {
    let repo = BlogRepository::new(state.pool());
    let categories = repo.list_categories().await?;
    let posts = repo.list_published(query.category.as_deref()).await?;

    Ok(BlogIndexTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        categories,
        posts,
        active_category: query.category,
    })
}

/// A published post, with its Markdown body rendered to HTML.
pub async fn show(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Path(slug): Path<String>,
) -> Result<BlogShowTemplate> {
    let post = BlogRepository::new(state.pool())
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("blog post {slug}")))?;

    let body_html = render_markdown(&post.body);
    let reading_minutes = reading_time_minutes(&post.body);

    Ok(BlogShowTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        post,
        body_html,
        reading_minutes,
    })
}

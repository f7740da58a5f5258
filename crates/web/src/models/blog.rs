//! Blog content models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use thistle_core::{BlogCategoryId, BlogPostId, UserId};

/// A blog category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BlogCategory {
    pub id: BlogCategoryId,
    pub name: String,
    pub slug: String,
}

/// A blog post row, joined with its category and author names.
///
/// `body` is Markdown as authored; rendering to HTML happens at display
/// time via [`crate::content::render_markdown`].
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BlogPost {
    pub id: BlogPostId,
    pub category_id: BlogCategoryId,
    pub category_name: String,
    pub author_id: UserId,
    pub author_name: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

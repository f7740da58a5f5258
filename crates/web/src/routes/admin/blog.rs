//! Admin blog management.
//!
//! Gated by [`RequireContentManager`]: content managers and admins both
//! edit here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::{BlogCategoryId, BlogPostId};

use crate::db::RepositoryError;
use crate::db::blog::{BlogPostInput, BlogRepository};
use crate::error::{AppError, Result};
use crate::flash::{Flash, set_flash, take_flash};
use crate::middleware::RequireContentManager;
use crate::models::{BlogCategory, BlogPost, CurrentUser, slugify};
use crate::state::AppState;

/// Blog post form data; redisplayed on validation failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostForm {
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub category_id: Option<BlogCategoryId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub body: String,
    pub published: Option<String>,
}

impl PostForm {
    fn from_post(post: &BlogPost) -> Self {
        Self {
            category_id: Some(post.category_id),
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            body: post.body.clone(),
            published: post.published.then(|| "on".to_owned()),
        }
    }

    fn validate(&self, author: &CurrentUser) -> std::result::Result<BlogPostInput, Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title is required".to_owned());
        }
        if self.body.trim().is_empty() {
            errors.push("Body is required".to_owned());
        }
        let Some(category_id) = self.category_id else {
            errors.push("Category is required".to_owned());
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        let slug = if self.slug.trim().is_empty() {
            slugify(&self.title)
        } else {
            slugify(&self.slug)
        };

        Ok(BlogPostInput {
            category_id,
            author_id: author.id,
            title: self.title.trim().to_owned(),
            slug,
            excerpt: self.excerpt.trim().to_owned(),
            body: self.body.clone(),
            published: self.published.is_some(),
        })
    }
}

/// Blog category form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

/// Post listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/blog/index.html")]
pub struct BlogIndexTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub posts: Vec<BlogPost>,
    pub categories: Vec<BlogCategory>,
}

/// Post create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/blog/form.html")]
pub struct BlogFormTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub categories: Vec<BlogCategory>,
    pub form: PostForm,
    pub errors: Vec<String>,
    pub editing: Option<BlogPostId>,
}

/// Post and category listing.
pub async fn index(
    State(state): State<AppState>,
    RequireContentManager(admin): RequireContentManager,
    session: Session,
) -> Result<BlogIndexTemplate> {
    let repo = BlogRepository::new(state.pool());
    let posts = repo.list_all().await?;
    let categories = repo.list_categories().await?;

    Ok(BlogIndexTemplate {
        admin,
        flash: take_flash(&session).await,
        posts,
        categories,
    })
}

/// Empty create form.
pub async fn new(
    State(state): State<AppState>,
    RequireContentManager(admin): RequireContentManager,
) -> Result<BlogFormTemplate> {
    let categories = BlogRepository::new(state.pool()).list_categories().await?;

    Ok(BlogFormTemplate {
        admin,
        flash: None,
        categories,
        form: PostForm::default(),
        errors: Vec::new(),
        editing: None,
    })
}

/// Create a post.
pub async fn create(
    State(state): State<AppState>,
    RequireContentManager(admin): RequireContentManager,
    session: Session,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    let repo = BlogRepository::new(state.pool());

    let input = match form.validate(&admin) {
        Ok(input) => input,
        Err(errors) => {
            let categories = repo.list_categories().await?;
            return Ok(BlogFormTemplate {
                admin,
                flash: None,
                categories,
                form,
                errors,
                editing: None,
            }
            .into_response());
        }
    };

    match repo.create(&input).await {
        Ok(id) => {
            tracing::info!(post_id = %id, "blog post created");
            set_flash(&session, Flash::success("Post created")).await?;
            Ok(Redirect::to("/admin/blog").into_response())
        }
        Err(RepositoryError::Conflict(msg)) => {
            let categories = repo.list_categories().await?;
            Ok(BlogFormTemplate {
                admin,
                flash: None,
                categories,
                form,
                errors: vec![msg],
                editing: None,
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit form, pre-filled from the stored post.
pub async fn edit(
    State(state): State<AppState>,
    RequireContentManager(admin): RequireContentManager,
    Path(id): Path<BlogPostId>,
) -> Result<BlogFormTemplate> {
    let repo = BlogRepository::new(state.pool());
    let post = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("blog post {id}")))?;
    let categories = repo.list_categories().await?;

    Ok(BlogFormTemplate {
        admin,
        flash: None,
        categories,
        form: PostForm::from_post(&post),
        errors: Vec::new(),
        editing: Some(id),
    })
}

/// Update a post.
pub async fn update(
    State(state): State<AppState>,
    RequireContentManager(admin): RequireContentManager,
    session: Session,
    Path(id): Path<BlogPostId>,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    let repo = BlogRepository::new(state.pool());

    let input = match form.validate(&admin) {
        Ok(input) => input,
        Err(errors) => {
            let categories = repo.list_categories().await?;
            return Ok(BlogFormTemplate {
                admin,
                flash: None,
                categories,
                form,
                errors,
                editing: Some(id),
            }
            .into_response());
        }
    };

    match repo.update(id, &input).await {
        Ok(()) => {
            set_flash(&session, Flash::success("Post updated")).await?;
            Ok(Redirect::to("/admin/blog").into_response())
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("blog post {id}"))),
        Err(RepositoryError::Conflict(msg)) => {
            let categories = repo.list_categories().await?;
            Ok(BlogFormTemplate {
                admin,
                flash: None,
                categories,
                form,
                errors: vec![msg],
                editing: Some(id),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a post.
pub async fn delete(
    State(state): State<AppState>,
    RequireContentManager(_admin): RequireContentManager,
    session: Session,
    Path(id): Path<BlogPostId>,
) -> Result<Redirect> {
    if BlogRepository::new(state.pool()).delete(id).await? {
        set_flash(&session, Flash::success("Post deleted")).await?;
    } else {
        set_flash(&session, Flash::error("Post not found")).await?;
    }

    Ok(Redirect::to("/admin/blog"))
}

/// Create a blog category.
pub async fn create_category(
    State(state): State<AppState>,
    RequireContentManager(_admin): RequireContentManager,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    if form.name.trim().is_empty() {
        set_flash(&session, Flash::error("Category name is required")).await?;
        return Ok(Redirect::to("/admin/blog"));
    }

    let slug = slugify(&form.name);
    match BlogRepository::new(state.pool())
        .create_category(form.name.trim(), &slug)
        .await
    {
        Ok(_) => set_flash(&session, Flash::success("Category created")).await?,
        Err(RepositoryError::Conflict(msg)) => set_flash(&session, Flash::error(msg)).await?,
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/blog"))
}

/// Delete a blog category; one that still has posts is refused.
pub async fn delete_category(
    State(state): State<AppState>,
    RequireContentManager(_admin): RequireContentManager,
    session: Session,
    Path(id): Path<BlogCategoryId>,
) -> Result<Redirect> {
    match BlogRepository::new(state.pool()).delete_category(id).await {
        Ok(true) => set_flash(&session, Flash::success("Category deleted")).await?,
        Ok(false) => set_flash(&session, Flash::error("Category not found")).await?,
        Err(RepositoryError::Conflict(msg)) => set_flash(&session, Flash::error(msg)).await?,
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/blog"))
}

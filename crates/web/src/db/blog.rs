//! Blog repository.

use sqlx::PgPool;

use thistle_core::{BlogCategoryId, BlogPostId, UserId};

use super::RepositoryError;
use crate::models::{BlogCategory, BlogPost};

const POST_COLUMNS: &str = "bp.id, bp.category_id, bc.name AS category_name, bp.author_id,
     u.name AS author_name, bp.title, bp.slug, bp.excerpt, bp.body, bp.published,
     bp.published_at, bp.created_at, bp.updated_at";

/// Fields for creating or updating a blog post.
#[derive(Debug, Clone)]
pub struct BlogPostInput {
    pub category_id: BlogCategoryId,
    pub author_id: UserId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub published: bool,
}

/// Repository for blog database operations.
pub struct BlogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BlogRepository<'a> {
    /// Create a new blog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Published posts for the storefront, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<BlogPost>, RepositoryError> {
        let posts = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS}
             FROM blog_posts bp
             JOIN blog_categories bc ON bc.id = bp.category_id
             JOIN users u ON u.id = bp.author_id
             WHERE bp.published AND ($1::text IS NULL OR bc.slug = $1)
             ORDER BY bp.published_at DESC NULLS LAST"
        ))
        .bind(category_slug)
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Find a published post by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<BlogPost>, RepositoryError> {
        let post = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS}
             FROM blog_posts bp
             JOIN blog_categories bc ON bc.id = bp.category_id
             JOIN users u ON u.id = bp.author_id
             WHERE bp.published AND bp.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Every post for the back-office, drafts included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<BlogPost>, RepositoryError> {
        let posts = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS}
             FROM blog_posts bp
             JOIN blog_categories bc ON bc.id = bp.category_id
             JOIN users u ON u.id = bp.author_id
             ORDER BY bp.created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Find any post by id, drafts included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: BlogPostId) -> Result<Option<BlogPost>, RepositoryError> {
        let post = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS}
             FROM blog_posts bp
             JOIN blog_categories bc ON bc.id = bp.category_id
             JOIN users u ON u.id = bp.author_id
             WHERE bp.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Create a post. `published_at` is stamped when `published` is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &BlogPostInput) -> Result<BlogPostId, RepositoryError> {
        let id: BlogPostId = sqlx::query_scalar(
            "INSERT INTO blog_posts
                 (category_id, author_id, title, slug, excerpt, body, published, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, CASE WHEN $7 THEN NOW() END)
             RETURNING id",
        )
        .bind(input.category_id)
        .bind(input.author_id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.excerpt)
        .bind(&input.body)
        .bind(input.published)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "post slug"))?;

        Ok(id)
    }

    /// Update a post. First publication stamps `published_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: BlogPostId,
        input: &BlogPostInput,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE blog_posts SET
                 category_id = $1, title = $2, slug = $3, excerpt = $4, body = $5,
                 published = $6,
                 published_at = CASE WHEN $6 THEN COALESCE(published_at, NOW()) END,
                 updated_at = NOW()
             WHERE id = $7",
        )
        .bind(input.category_id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.excerpt)
        .bind(&input.body)
        .bind(input.published)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "post slug"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: BlogPostId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List blog categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<BlogCategory>, RepositoryError> {
        let categories = sqlx::query_as::<_, BlogCategory>(
            "SELECT id, name, slug FROM blog_categories ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Create a blog category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_category(
        &self,
        name: &str,
        slug: &str,
    ) -> Result<BlogCategory, RepositoryError> {
        let category = sqlx::query_as::<_, BlogCategory>(
            "INSERT INTO blog_categories (name, slug)
             VALUES ($1, $2)
             RETURNING id, name, slug",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "blog category slug"))?;

        Ok(category)
    }

    /// Delete a blog category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if posts still reference it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_category(&self, id: BlogCategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM blog_categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict("category still has posts".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

//! Certificate and gallery repository.

use chrono::NaiveDate;
use sqlx::PgPool;

use thistle_core::{CertificateId, GalleryItemId};

use super::RepositoryError;
use crate::models::{Certificate, GalleryItem};

/// Repository for certificate and gallery operations.
pub struct ContentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContentRepository<'a> {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List certificates in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_certificates(&self) -> Result<Vec<Certificate>, RepositoryError> {
        let certificates = sqlx::query_as::<_, Certificate>(
            "SELECT id, title, issuer, issued_on, document_path, position
             FROM certificates ORDER BY position, issued_on DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(certificates)
    }

    /// Create a certificate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_certificate(
        &self,
        title: &str,
        issuer: &str,
        issued_on: NaiveDate,
        document_path: &str,
        position: i32,
    ) -> Result<CertificateId, RepositoryError> {
        let id: CertificateId = sqlx::query_scalar(
            "INSERT INTO certificates (title, issuer, issued_on, document_path, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(title)
        .bind(issuer)
        .bind(issued_on)
        .bind(document_path)
        .bind(position)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Delete a certificate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_certificate(&self, id: CertificateId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM certificates WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List gallery items in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_gallery(&self) -> Result<Vec<GalleryItem>, RepositoryError> {
        let items = sqlx::query_as::<_, GalleryItem>(
            "SELECT id, title, image_path, position FROM gallery_items ORDER BY position, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Create a gallery item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_gallery_item(
        &self,
        title: &str,
        image_path: &str,
        position: i32,
    ) -> Result<GalleryItemId, RepositoryError> {
        let id: GalleryItemId = sqlx::query_scalar(
            "INSERT INTO gallery_items (title, image_path, position)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(title)
        .bind(image_path)
        .bind(position)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Delete a gallery item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_gallery_item(&self, id: GalleryItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

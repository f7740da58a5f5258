//! Content page models (certificates, gallery).

use chrono::NaiveDate;
use serde::Serialize;

use thistle_core::{CertificateId, GalleryItemId};

/// A quality or authenticity certificate shown on the certificates page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Certificate {
    pub id: CertificateId,
    pub title: String,
    pub issuer: String,
    pub issued_on: NaiveDate,
    pub document_path: String,
    pub position: i32,
}

/// A gallery image.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct GalleryItem {
    pub id: GalleryItemId,
    pub title: String,
    pub image_path: String,
    pub position: i32,
}

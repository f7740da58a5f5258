//! Admin certificate management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::CertificateId;

use crate::db::content::ContentRepository;
use crate::error::Result;
use crate::flash::{Flash, set_flash, take_flash};
use crate::middleware::RequireAdmin;
use crate::models::{Certificate, CurrentUser};
use crate::state::AppState;

/// Certificate form data.
#[derive(Debug, Deserialize)]
pub struct CertificateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub issuer: String,
    /// `YYYY-MM-DD` from the date input.
    #[serde(default)]
    pub issued_on: String,
    #[serde(default)]
    pub document_path: String,
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub position: Option<i32>,
}

/// Certificates listing template (with inline create form).
#[derive(Template, WebTemplate)]
#[template(path = "admin/certificates/index.html")]
pub struct CertificatesAdminTemplate {
    pub admin: CurrentUser,
    pub flash: Option<Flash>,
    pub certificates: Vec<Certificate>,
}

/// Listing page.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<CertificatesAdminTemplate> {
    let certificates = ContentRepository::new(state.pool())
        .list_certificates()
        .await?;

    Ok(CertificatesAdminTemplate {
        admin,
        flash: take_flash(&session).await,
        certificates,
    })
}

/// Create a certificate.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Form(form): Form<CertificateForm>,
) -> Result<Redirect> {
    let issued_on = form.issued_on.parse::<NaiveDate>().ok();

    if form.title.trim().is_empty() || form.document_path.trim().is_empty() {
        set_flash(&session, Flash::error("Title and document path are required")).await?;
        return Ok(Redirect::to("/admin/certificates"));
    }

    let Some(issued_on) = issued_on else {
        set_flash(&session, Flash::error("Issue date must be YYYY-MM-DD")).await?;
        return Ok(Redirect::to("/admin/certificates"));
    };

    ContentRepository::new(state.pool())
        .create_certificate(
            form.title.trim(),
            form.issuer.trim(),
            issued_on,
            form.document_path.trim(),
            form.position.unwrap_or(0),
        )
        .await?;

    set_flash(&session, Flash::success("Certificate added")).await?;
    Ok(Redirect::to("/admin/certificates"))
}

/// Delete a certificate.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Path(id): Path<CertificateId>,
) -> Result<Redirect> {
    if ContentRepository::new(state.pool())
        .delete_certificate(id)
        .await?
    {
        set_flash(&session, Flash::success("Certificate deleted")).await?;
    } else {
        set_flash(&session, Flash::error("Certificate not found")).await?;
    }

    Ok(Redirect::to("/admin/certificates"))
}

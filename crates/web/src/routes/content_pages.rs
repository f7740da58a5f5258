//! Gallery and certificates page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;

use crate::db::content::ContentRepository;
use crate::error::Result;
use crate::flash::{Flash, take_flash};
use crate::i18n::Locale;
use crate::middleware::OptionalAuth;
use crate::models::{Certificate, CurrentUser, GalleryItem};
use crate::state::AppState;

/// Gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub items: Vec<GalleryItem>,
}

/// Certificates page template.
#[derive(Template, WebTemplate)]
#[template(path = "certificates.html")]
pub struct CertificatesTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub certificates: Vec<Certificate>,
}

/// Display the gallery.
pub async fn gallery(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<GalleryTemplate> {
    let items = ContentRepository::new(state.pool()).list_gallery().await?;

    Ok(GalleryTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        items,
    })
}

/// Display the certificates page.
pub async fn certificates(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<CertificatesTemplate> {
    let certificates = ContentRepository::new(state.pool())
        .list_certificates()
        .await?;

    Ok(CertificatesTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        certificates,
    })
}

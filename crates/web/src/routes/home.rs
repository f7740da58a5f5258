//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;

use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, take_flash};
use crate::i18n::Locale;
use crate::middleware::OptionalAuth;
use crate::models::{Category, CurrentUser, Product};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub categories: Vec<Category>,
    pub featured: Vec<Product>,
}

/// Display the home page with the newest products.
pub async fn home(
    State(state): State<AppState>,
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<HomeTemplate> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    let mut featured = ProductRepository::new(state.pool()).list_active(None).await?;
    featured.truncate(6);

    Ok(HomeTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        categories,
        featured,
    })
}

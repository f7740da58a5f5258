//! Language switch handler.

use axum::extract::Path;
use axum::http::HeaderMap;
use axum::response::Redirect;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::i18n::Language;
use crate::models::session_keys;

/// Switch the UI language and bounce back to the referring page.
///
/// Unknown codes 404 rather than silently falling back, so typos in
/// links are visible.
pub async fn switch(
    session: Session,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Redirect> {
    let language = Language::from_code(&code)
        .ok_or_else(|| AppError::NotFound(format!("language {code}")))?;

    session
        .insert(session_keys::LANGUAGE, language.code())
        .await?;

    // Only same-site referers are followed back
    let back = headers
        .get(axum::http::header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|r| r.starts_with('/'))
        .unwrap_or("/");

    Ok(Redirect::to(back))
}

//! Authentication and role-check extractors.
//!
//! These are the per-route middleware guards: each either yields the
//! current user or short-circuits the request with its own response
//! before the handler runs. Browser routes redirect to `/login`; `/api/`
//! paths get a JSON error in the standard envelope instead.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::json_error;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a logged-in user with the admin role.
pub struct RequireAdmin(pub CurrentUser);

/// Extractor that requires a content manager or admin.
///
/// Gates the blog/gallery sections of the back-office, which content
/// managers may edit without full admin rights.
pub struct RequireContentManager(pub CurrentUser);

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects the request.
pub struct OptionalAuth(pub Option<CurrentUser>);

/// Response produced when a guard short-circuits the request.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// 401 JSON body (for API requests).
    UnauthorizedJson,
    /// 403 for an authenticated user without the required role.
    Forbidden,
    /// 403 JSON body (for API requests).
    ForbiddenJson,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::UnauthorizedJson => {
                json_error(StatusCode::UNAUTHORIZED, "authentication required")
            }
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have access to this page",
            )
                .into_response(),
            Self::ForbiddenJson => json_error(StatusCode::FORBIDDEN, "insufficient role"),
        }
    }
}

fn is_api_request(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}

/// Read the current user out of the session, if any.
async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await {
            Some(user) => Ok(Self(user)),
            None if is_api_request(parts) => Err(AuthRejection::UnauthorizedJson),
            None => Err(AuthRejection::RedirectToLogin),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(user) = current_user(parts).await else {
            return Err(if is_api_request(parts) {
                AuthRejection::UnauthorizedJson
            } else {
                AuthRejection::RedirectToLogin
            });
        };

        if user.role != thistle_core::UserRole::Admin {
            return Err(if is_api_request(parts) {
                AuthRejection::ForbiddenJson
            } else {
                AuthRejection::Forbidden
            });
        }

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for RequireContentManager
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(user) = current_user(parts).await else {
            return Err(if is_api_request(parts) {
                AuthRejection::UnauthorizedJson
            } else {
                AuthRejection::RedirectToLogin
            });
        };

        if !user.role.can_manage_content() {
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await))
    }
}

/// Helper to set the current user in the session.
///
/// Cycles the session id to prevent fixation across login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

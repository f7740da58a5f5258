//! Authentication route handlers.
//!
//! Login, registration, and logout against the local `users` table.
//! Failed submissions re-render the form with the submitted values and
//! the collected errors.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use thistle_core::{Email, UserRole};

use crate::db::users::UserRepository;
use crate::error::Result;
use crate::flash::{Flash, set_flash, take_flash};
use crate::i18n::Locale;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{
    AuthError, authenticate, check_password_policy, hash_password,
};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub error: Option<String>,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub locale: Locale,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub errors: Vec<String>,
    pub form: RegisterForm,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> LoginTemplate {
    LoginTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        error: None,
        email: String::new(),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    locale: Locale,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let users = UserRepository::new(state.pool());

    let outcome = match Email::parse(&form.email) {
        Ok(email) => authenticate(&users, &email, &form.password).await,
        Err(_) => Err(AuthError::InvalidCredentials),
    };

    match outcome {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            set_current_user(&session, &current).await?;
            tracing::info!(user_id = %user.id, "login");

            // Staff land in the back-office, customers on their dashboard
            let destination = if current.role.is_staff() {
                "/admin"
            } else {
                "/dashboard"
            };
            Ok(Redirect::to(destination).into_response())
        }
        Err(AuthError::Repository(e)) => Err(e.into()),
        Err(e) => Ok(LoginTemplate {
            locale,
            user: None,
            flash: None,
            error: Some(e.client_message()),
            email: form.email,
        }
        .into_response()),
    }
}

/// Display the registration page.
pub async fn register_page(
    locale: Locale,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> RegisterTemplate {
    RegisterTemplate {
        locale,
        user,
        flash: take_flash(&session).await,
        errors: Vec::new(),
        form: RegisterForm::default(),
    }
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    locale: Locale,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(locale.t("auth.errors.name_required"));
    }

    let email = match Email::parse(&form.email) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push(locale.t("auth.errors.invalid_email"));
            None
        }
    };

    if let Err(e) = check_password_policy(&form.password) {
        errors.push(e.client_message());
    }

    if form.password != form.password_confirm {
        errors.push(locale.t("auth.errors.password_mismatch"));
    }

    let email = match (email, errors.is_empty()) {
        (Some(email), true) => email,
        _ => {
            return Ok(RegisterTemplate {
                locale,
                user: None,
                flash: None,
                errors,
                form: RegisterForm {
                    password: String::new(),
                    password_confirm: String::new(),
                    ..form
                },
            }
            .into_response());
        }
    };

    let password_hash = hash_password(&form.password)?;
    let users = UserRepository::new(state.pool());

    match users
        .create(&email, &password_hash, form.name.trim(), UserRole::Customer)
        .await
    {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_flash(&session, Flash::success(locale.t("flash.welcome"))).await?;
            tracing::info!(user_id = %user.id, "registration");
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(crate::db::RepositoryError::Conflict(_)) => {
            let errors = vec![locale.t("auth.errors.email_taken")];
            Ok(RegisterTemplate {
                locale,
                user: None,
                flash: None,
                errors,
                form: RegisterForm {
                    password: String::new(),
                    password_confirm: String::new(),
                    ..form
                },
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout.
///
/// Only the identity is dropped; the cart and language choice stay with
/// the session.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    Ok(Redirect::to("/"))
}

//! Staff account management commands.
//!
//! Passwords are generated here, printed once, and stored only hashed.
//! There is intentionally no bulk reset: `set-password` acts on exactly
//! one account.

use thiserror::Error;

use thistle_core::{Email, UserRole};
use thistle_web::db::RepositoryError;
use thistle_web::db::users::UserRepository;
use thistle_web::services::auth::{generate_password, hash_password};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, content_manager")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// User already exists.
    #[error("A user already exists with email: {0}")]
    UserExists(String),

    /// No such user.
    #[error("No user found with email: {0}")]
    UserNotFound(String),
}

/// Create a new staff user.
///
/// # Arguments
///
/// * `email` - Email address
/// * `name` - Display name
/// * `role` - Role (`admin` or `content_manager`)
///
/// # Errors
///
/// Returns an error on invalid input, a duplicate email, or database
/// failure.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let role: UserRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    if role == UserRole::Customer {
        return Err(AdminError::InvalidRole("customer".to_owned()).into());
    }

    let email =
        Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;

    let pool = super::connect().await?;

    tracing::info!("Creating staff user: {} ({})", email, role);

    let password = generate_password();
    let password_hash = hash_password(&password)?;

    let users = UserRepository::new(&pool);
    let user = match users.create(&email, &password_hash, name, role).await {
        Ok(user) => user,
        Err(RepositoryError::Conflict(_)) => {
            return Err(AdminError::UserExists(email.into_inner()).into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Staff user created! ID: {}, Email: {}, Role: {}", user.id, email, role);
    tracing::info!("Generated password (shown once, store it now): {password}");

    Ok(())
}

/// Reset one account's password to a freshly generated value.
///
/// # Errors
///
/// Returns an error if the account does not exist or the database fails.
pub async fn set_password(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let email =
        Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;

    let pool = super::connect().await?;

    let users = UserRepository::new(&pool);
    let user = users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AdminError::UserNotFound(email.as_str().to_owned()))?;

    let password = generate_password();
    let password_hash = hash_password(&password)?;
    users.update_password(user.id, &password_hash).await?;

    tracing::info!("Password reset for {} (ID: {})", email, user.id);
    tracing::info!("Generated password (shown once, store it now): {password}");

    Ok(())
}

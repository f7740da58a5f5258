//! Password hashing and credential verification.
//!
//! Passwords are hashed with Argon2id. Login failures for unknown email
//! and wrong password are indistinguishable to the caller.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;

use thistle_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum accepted password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of generated passwords (CLI account creation and resets).
const GENERATED_PASSWORD_LENGTH: usize = 24;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match an active account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but is deactivated.
    #[error("account disabled")]
    AccountDisabled,

    /// Password failed the registration policy.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Hashing backend failure.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Database failure during authentication.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Message safe to show the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid email or password".to_owned(),
            Self::AccountDisabled => "This account has been disabled".to_owned(),
            Self::WeakPassword(msg) => msg.clone(),
            Self::Hash(_) | Self::Repository(_) => "Authentication error".to_owned(),
        }
    }
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::Hash` if the hashing backend fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored Argon2 hash.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Check the registration password policy.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn check_password_policy(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Generate a random alphanumeric password.
///
/// Used by the CLI when creating staff accounts and resetting a single
/// account's password; the value is printed once and stored only hashed.
#[must_use]
pub fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Authenticate an email/password pair against the users table.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` when the account is unknown or
/// the password does not match, `AuthError::AccountDisabled` for inactive
/// accounts, and `AuthError::Repository` on database failure.
pub async fn authenticate(
    users: &UserRepository<'_>,
    email: &Email,
    password: &str,
) -> Result<User, AuthError> {
    let Some((user, hash)) = users.get_password_hash(email).await? else {
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &hash) {
        return Err(AuthError::InvalidCredentials);
    }

    if !user.active {
        return Err(AuthError::AccountDisabled);
    }

    Ok(user)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_password_policy() {
        assert!(check_password_policy("short").is_err());
        assert!(check_password_policy("long enough").is_ok());
    }

    #[test]
    fn test_generated_passwords_are_distinct() {
        let a = generate_password();
        let b = generate_password();
        assert_eq!(a.len(), GENERATED_PASSWORD_LENGTH);
        assert_ne!(a, b);
    }
}

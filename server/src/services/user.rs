//! Account service: signup validation, user creation, credential checks.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::password;
use super::session::SessionUser;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("name is required")]
    MissingName,
    #[error("name too long")]
    NameTooLong,
    #[error("invalid email")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("password is required")]
    MissingPassword,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    Hashing(#[from] tokio::task::JoinError),
}

/// Validated signup input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || normalized.len() > MAX_EMAIL_LEN {
        return None;
    }
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || normalized.contains(char::is_whitespace) {
        return None;
    }
    Some(normalized)
}

/// Validate raw signup fields into a [`NewUser`].
///
/// # Errors
///
/// Returns the first failing field check.
pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<NewUser, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::MissingName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AuthError::NameTooLong);
    }
    let email = normalize_email(email).ok_or(AuthError::InvalidEmail)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(NewUser { name: name.to_owned(), email, password: password.to_owned() })
}

/// Shape-check login fields before any throttling or lookup.
///
/// # Errors
///
/// Returns [`AuthError::InvalidEmail`] or [`AuthError::MissingPassword`].
pub fn validate_login(email: &str, password: &str) -> Result<String, AuthError> {
    let email = normalize_email(email).ok_or(AuthError::InvalidEmail)?;
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(email)
}

/// Insert a new user with a hashed password.
///
/// # Errors
///
/// Returns [`AuthError::EmailTaken`] when the email is already registered.
pub async fn create_user(pool: &PgPool, new_user: &NewUser) -> Result<SessionUser, AuthError> {
    let id = Uuid::new_v4();
    let hash = password::hash_in_background(new_user.password.clone()).await?;

    let result = sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(hash)
        .execute(pool)
        .await;

    match result {
        Ok(_) => Ok(SessionUser { id, name: new_user.name.clone(), email: new_user.email.clone() }),
        Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => Err(AuthError::EmailTaken),
        Err(e) => Err(AuthError::Db(e)),
    }
}

/// Check an email/password pair. Unknown emails and wrong passwords are
/// indistinguishable to the caller.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] on any mismatch.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<SessionUser, AuthError> {
    let email = normalize_email(email).ok_or(AuthError::InvalidCredentials)?;

    let row = sqlx::query("SELECT id, name, email, password_hash FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        // Burn comparable CPU so response timing does not reveal unknown emails.
        let _ = password::verify_in_background(password.to_owned(), DUMMY_HASH.to_owned()).await?;
        return Err(AuthError::InvalidCredentials);
    };

    let stored: String = row.get("password_hash");
    if !password::verify_in_background(password.to_owned(), stored).await? {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(SessionUser { id: row.get("id"), name: row.get("name"), email: row.get("email") })
}

const DUMMY_HASH: &str = concat!(
    "pbkdf2-sha256$100000$",
    "00000000000000000000000000000000$",
    "0000000000000000000000000000000000000000000000000000000000000000"
);

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;

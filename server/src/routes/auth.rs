//! Auth routes: signup, password login, logout and current user.

use axum::extract::{FromRef, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

use super::{ApiJson, error_response};
use crate::rate_limit::RateLimitError;
use crate::services::session::{self, SessionUser};
use crate::services::user::{self, AuthError};
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";
pub(crate) const TOKEN_TYPE: &str = "bearer";

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie or bearer header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: SessionUser,
    pub token: String,
}

/// Pull the session token from `Authorization: Bearer …`, falling back to the cookie.
pub(crate) fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let (scheme, token) = v.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case(TOKEN_TYPE).then(|| token.trim().to_owned())
        })
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    let jar = CookieJar::from_headers(headers);
    jar.get(COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .filter(|t| !t.is_empty())
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let unauthorized = || error_response(StatusCode::UNAUTHORIZED, "not authenticated");

        let token = extract_token(&parts.headers).ok_or_else(unauthorized)?;
        if !session::is_well_formed_token(&token) {
            return Err(unauthorized());
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, &token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            })?
            .ok_or_else(unauthorized)?;

        Ok(Self { user, token })
    }
}

// =============================================================================
// BODIES
// =============================================================================

#[derive(Deserialize)]
pub struct SignupBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<SessionUser> for UserResponse {
    fn from(user: SessionUser) -> Self {
        Self { id: user.id, name: user.name, email: user.email }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

pub(crate) fn auth_error_to_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::MissingName
        | AuthError::NameTooLong
        | AuthError::InvalidEmail
        | AuthError::WeakPassword
        | AuthError::MissingPassword => StatusCode::BAD_REQUEST,
        AuthError::EmailTaken => StatusCode::CONFLICT,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Db(_) | AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn auth_error_response(err: &AuthError) -> Response {
    let status = auth_error_to_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "auth request failed");
        return error_response(status, "internal error");
    }
    error_response(status, &err.to_string())
}

fn session_cookie(token: String, secure: bool, ttl_hours: u32) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::hours(i64::from(ttl_hours)))
        .build()
}

fn cleared_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/signup`: create an account.
pub async fn signup(State(state): State<AppState>, ApiJson(body): ApiJson<SignupBody>) -> Response {
    let new_user = match user::validate_signup(&body.name, &body.email, &body.password) {
        Ok(u) => u,
        Err(e) => return auth_error_response(&e),
    };

    match user::create_user(&state.pool, &new_user).await {
        Ok(created) => {
            tracing::info!(user_id = %created.id, "user signed up");
            (StatusCode::CREATED, Json(UserResponse::from(created))).into_response()
        }
        Err(e) => auth_error_response(&e),
    }
}

/// `POST /api/auth/login`: verify credentials, create session, set cookie.
pub async fn login(State(state): State<AppState>, jar: CookieJar, ApiJson(body): ApiJson<LoginBody>) -> Response {
    let email = match user::validate_login(&body.email, &body.password) {
        Ok(email) => email,
        Err(e) => return auth_error_response(&e),
    };
    if let Err(RateLimitError::TooManyAttempts { retry_after_secs, .. }) = state.login_limiter.acquire(&email) {
        tracing::warn!(retry_after_secs, "login throttled");
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            &format!("too many failed attempts, retry in {retry_after_secs}s"),
        );
    }

    let authed = match user::authenticate(&state.pool, &email, &body.password).await {
        Ok(u) => u,
        Err(e) => {
            // Only a credential mismatch keeps the reserved attempt.
            if !matches!(e, AuthError::InvalidCredentials) {
                state.login_limiter.release(&email);
            }
            return auth_error_response(&e);
        }
    };
    state.login_limiter.reset(&email);

    let token = match session::create_session(&state.pool, authed.id, state.auth.session_ttl_hours).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "session creation failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };
    tracing::info!(user_id = %authed.id, "user logged in");

    let jar = jar.add(session_cookie(token.clone(), state.auth.cookie_secure, state.auth.session_ttl_hours));
    (jar, Json(TokenResponse { access_token: token, token_type: TOKEN_TYPE })).into_response()
}

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(auth.user))
}

/// `POST /api/auth/logout`: delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, user_id = %auth.user.id, "session delete failed");
    }

    let jar = CookieJar::new().add(cleared_cookie(state.auth.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `None`/error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Option`/`Result` outputs instead of panics so auth/expense
//! failures degrade UI behavior without crashing hydration. Server error
//! bodies (`{"error": "..."}`) are surfaced verbatim when present.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{ApiError, Expense, ExpenseDraft, User};

#[cfg(any(test, feature = "hydrate"))]
fn expense_endpoint(id: &str) -> String {
    format!("/api/expenses/{id}")
}

/// Build the user-facing message for a failed request.
///
/// Prefers the server's `error` field; falls back to `"<action> failed: <status>"`.
#[cfg(any(test, feature = "hydrate"))]
fn failure_message(action: &str, status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) if !err.error.trim().is_empty() => err.error,
        _ => format!("{action} failed: {status}"),
    }
}

#[cfg(feature = "hydrate")]
async fn read_failure(action: &str, resp: gloo_net::http::Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    failure_message(action, status, &body)
}

/// Fetch the currently authenticated user from `/api/auth/me`.
/// Returns `None` if not authenticated or on the server.
pub async fn fetch_current_user() -> Option<User> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/me")
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<User>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Create an account via `POST /api/auth/signup`.
///
/// # Errors
///
/// Returns the server's message (e.g. email already registered) or a status string.
pub async fn signup(name: &str, email: &str, password: &str) -> Result<User, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "name": name, "email": email, "password": password });
        let resp = gloo_net::http::Request::post("/api/auth/signup")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("signup", resp).await);
        }
        resp.json::<User>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (name, email, password);
        Err("not available on server".to_owned())
    }
}

/// Log in via `POST /api/auth/login`. The server sets the session cookie.
///
/// # Errors
///
/// Returns the server's message (bad credentials, throttled) or a status string.
pub async fn login(email: &str, password: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "email": email, "password": password });
        let resp = gloo_net::http::Request::post("/api/auth/login")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("login", resp).await);
        }
        resp.json::<super::types::TokenResponse>()
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password);
        Err("not available on server".to_owned())
    }
}

/// Log out the current user by calling `POST /api/auth/logout`.
pub async fn logout() {
    #[cfg(feature = "hydrate")]
    {
        let _ = gloo_net::http::Request::post("/api/auth/logout")
            .send()
            .await;
    }
}

/// List the current user's expenses, newest first.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn list_expenses() -> Result<Vec<Expense>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/expenses")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("load expenses", resp).await);
        }
        resp.json::<Vec<Expense>>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Record a new expense.
///
/// # Errors
///
/// Returns the server's validation message or a status string.
pub async fn create_expense(draft: &ExpenseDraft) -> Result<Expense, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/expenses")
            .json(draft)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("add expense", resp).await);
        }
        resp.json::<Expense>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = draft;
        Err("not available on server".to_owned())
    }
}

/// Delete an expense by id.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn delete_expense(id: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::delete(&expense_endpoint(id))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("delete expense", resp).await);
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = id;
        Err("not available on server".to_owned())
    }
}

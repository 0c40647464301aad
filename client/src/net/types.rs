//! Shared wire DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! These types mirror the server's JSON responses. Ids stay as strings on
//! the client; nothing here needs to interpret them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// The authenticated user, as returned by `/api/auth/me` and signup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Successful login response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// One recorded expense.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub note: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Body for `POST /api/expenses`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Per-category roll-up computed from the loaded list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Error body shape used by every API failure: `{"error": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    pub error: String,
}

//! Expense routes: per-user CRUD, filtering, and summary.

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::AuthUser;
use super::{ApiJson, error_response};
use crate::services::expense::{self, ExpenseError, ExpenseFilter, ExpenseRow, ExpenseSummary};
use crate::state::AppState;

#[derive(Debug, Serialize, PartialEq)]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub note: Option<String>,
    pub created_at: String,
}

impl From<ExpenseRow> for ExpenseResponse {
    fn from(row: ExpenseRow) -> Self {
        let created_at = row.created_at_rfc3339();
        Self {
            id: row.id,
            title: row.title,
            amount: row.amount,
            category: row.category,
            date: row.date.to_string(),
            note: row.note,
            created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateExpenseBody {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateExpenseBody {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Expense id from the path. Malformed ids are a `400` in the API error shape.
pub struct ExpenseId(pub Uuid);

impl<S> FromRequestParts<S> for ExpenseId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.body_text()))?;
        Uuid::parse_str(&raw)
            .map(Self)
            .map_err(|_| error_response(StatusCode::BAD_REQUEST, "invalid expense id"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ExpenseQuery {
    /// Convert raw query params into a typed filter. Blank values are ignored.
    pub(crate) fn into_filter(self) -> Result<ExpenseFilter, ExpenseError> {
        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        Ok(ExpenseFilter {
            category: non_blank(self.category),
            from: non_blank(self.from).as_deref().map(expense::parse_date).transpose()?,
            to: non_blank(self.to).as_deref().map(expense::parse_date).transpose()?,
        })
    }
}

pub(crate) fn expense_error_to_status(err: &ExpenseError) -> StatusCode {
    match err {
        ExpenseError::NotFound(_) => StatusCode::NOT_FOUND,
        ExpenseError::Invalid { .. } => StatusCode::BAD_REQUEST,
        ExpenseError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn expense_error_response(err: &ExpenseError) -> Response {
    let status = expense_error_to_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "expense request failed");
        return error_response(status, "internal error");
    }
    error_response(status, &err.to_string())
}

fn today_utc() -> time::Date {
    time::OffsetDateTime::now_utc().date()
}

/// `GET /api/expenses`: list the caller's expenses, newest first.
pub async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<Vec<ExpenseResponse>>, Response> {
    let filter = query.into_filter().map_err(|e| expense_error_response(&e))?;
    let rows = expense::list_expenses(&state.pool, auth.user.id, &filter)
        .await
        .map_err(|e| expense_error_response(&e))?;
    Ok(Json(rows.into_iter().map(ExpenseResponse::from).collect()))
}

/// `POST /api/expenses`: record a new expense.
pub async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<CreateExpenseBody>,
) -> Result<(StatusCode, Json<ExpenseResponse>), Response> {
    let new = expense::validate_new(
        &body.title,
        &body.category,
        body.amount,
        body.date.as_deref(),
        body.note.as_deref(),
        today_utc(),
    )
    .map_err(|e| expense_error_response(&e))?;

    let row = expense::create_expense(&state.pool, auth.user.id, &new)
        .await
        .map_err(|e| expense_error_response(&e))?;
    tracing::debug!(user_id = %auth.user.id, expense_id = %row.id, "expense created");
    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(row))))
}

/// `GET /api/expenses/:id`: fetch one expense.
pub async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ExpenseId(id): ExpenseId,
) -> Result<Json<ExpenseResponse>, Response> {
    let row = expense::get_expense(&state.pool, auth.user.id, id)
        .await
        .map_err(|e| expense_error_response(&e))?;
    Ok(Json(ExpenseResponse::from(row)))
}

/// `PATCH /api/expenses/:id`: partial update.
pub async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    ExpenseId(id): ExpenseId,
    ApiJson(body): ApiJson<UpdateExpenseBody>,
) -> Result<Json<ExpenseResponse>, Response> {
    let patch = expense::validate_update(
        body.title.as_deref(),
        body.category.as_deref(),
        body.amount,
        body.date.as_deref(),
        body.note.as_deref(),
    )
    .map_err(|e| expense_error_response(&e))?;

    let row = expense::update_expense(&state.pool, auth.user.id, id, &patch)
        .await
        .map_err(|e| expense_error_response(&e))?;
    Ok(Json(ExpenseResponse::from(row)))
}

/// `DELETE /api/expenses/:id`: remove an expense.
pub async fn delete_expense(State(state): State<AppState>, auth: AuthUser, ExpenseId(id): ExpenseId) -> Response {
    match expense::delete_expense(&state.pool, auth.user.id, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => expense_error_response(&e),
    }
}

/// `GET /api/expenses/summary`: totals overall and per category.
pub async fn expense_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<ExpenseSummary>, Response> {
    let filter = query.into_filter().map_err(|e| expense_error_response(&e))?;
    let summary = expense::summary(&state.pool, auth.user.id, &filter)
        .await
        .map_err(|e| expense_error_response(&e))?;
    Ok(Json(summary))
}

#[cfg(test)]
#[path = "expenses_test.rs"]
mod tests;

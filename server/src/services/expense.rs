//! Expense service: validation, per-user CRUD and summaries.
//!
//! DESIGN
//! ======
//! Every query is scoped by `user_id`, so an expense owned by someone else
//! is indistinguishable from a missing one (`NotFound`). Amounts are stored
//! rounded to cents.

use serde::Serialize;
use sqlx::{PgPool, Row};
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MAX_NOTE_LEN: usize = 255;
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    #[error("expense not found: {0}")]
    NotFound(Uuid),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ExpenseError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

/// Row returned from expense queries.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub category: String,
    pub amount: f64,
    pub date: Date,
    pub note: Option<String>,
    pub created_at: OffsetDateTime,
}

impl ExpenseRow {
    fn from_row(r: &sqlx::postgres::PgRow) -> Self {
        Self {
            id: r.get("id"),
            user_id: r.get("user_id"),
            title: r.get("title"),
            category: r.get("category"),
            amount: r.get("amount"),
            date: r.get("date"),
            note: r.get("note"),
            created_at: r.get("created_at"),
        }
    }

    /// RFC 3339 in UTC with a fixed six-digit fraction, so timestamps order
    /// correctly as plain strings.
    #[must_use]
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at
            .to_offset(UtcOffset::UTC)
            .format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
            ))
            .unwrap_or_default()
    }
}

/// Validated input for a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub category: String,
    pub amount: f64,
    pub date: Date,
    pub note: Option<String>,
}

/// Validated partial update. `None` leaves a column unchanged; for `note`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<Date>,
    pub note: Option<Option<String>>,
}

impl ExpensePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }
}

/// Optional list filters. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total: f64,
    pub count: usize,
    pub by_category: Vec<CategoryTotal>,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`ExpenseError::Invalid`] for any other shape or an impossible date.
pub fn parse_date(raw: &str) -> Result<Date, ExpenseError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ExpenseError::invalid("date", "expected YYYY-MM-DD"))
}

#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn validate_text(raw: &str, field: &'static str, max: usize) -> Result<String, ExpenseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ExpenseError::invalid(field, "must not be empty"));
    }
    if value.chars().count() > max {
        return Err(ExpenseError::invalid(field, "too long"));
    }
    Ok(value.to_owned())
}

fn validate_amount(amount: f64) -> Result<f64, ExpenseError> {
    if !amount.is_finite() || amount > MAX_AMOUNT {
        return Err(ExpenseError::invalid("amount", "out of range"));
    }
    let rounded = round_cents(amount);
    if rounded <= 0.0 {
        return Err(ExpenseError::invalid("amount", "must be positive"));
    }
    Ok(rounded)
}

fn validate_note(raw: Option<&str>) -> Result<Option<String>, ExpenseError> {
    let Some(note) = raw.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if note.chars().count() > MAX_NOTE_LEN {
        return Err(ExpenseError::invalid("note", "too long"));
    }
    Ok(Some(note.to_owned()))
}

/// Validate raw create input. A missing date defaults to `today`.
///
/// # Errors
///
/// Returns the first failing field check.
pub fn validate_new(
    title: &str,
    category: &str,
    amount: f64,
    date: Option<&str>,
    note: Option<&str>,
    today: Date,
) -> Result<NewExpense, ExpenseError> {
    Ok(NewExpense {
        title: validate_text(title, "title", MAX_TITLE_LEN)?,
        category: validate_text(category, "category", MAX_CATEGORY_LEN)?,
        amount: validate_amount(amount)?,
        date: date.map(parse_date).transpose()?.unwrap_or(today),
        note: validate_note(note)?,
    })
}

/// Validate raw update input. An empty `note` string clears the note.
///
/// # Errors
///
/// Returns the first failing field check, or `Invalid` if nothing would change.
pub fn validate_update(
    title: Option<&str>,
    category: Option<&str>,
    amount: Option<f64>,
    date: Option<&str>,
    note: Option<&str>,
) -> Result<ExpensePatch, ExpenseError> {
    let patch = ExpensePatch {
        title: title.map(|t| validate_text(t, "title", MAX_TITLE_LEN)).transpose()?,
        category: category.map(|c| validate_text(c, "category", MAX_CATEGORY_LEN)).transpose()?,
        amount: amount.map(validate_amount).transpose()?,
        date: date.map(parse_date).transpose()?,
        note: note.map(|n| validate_note(Some(n))).transpose()?,
    };
    if patch.is_empty() {
        return Err(ExpenseError::invalid("body", "no fields to update"));
    }
    Ok(patch)
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Aggregate expenses overall and per category. Categories are ordered by
/// descending total, ties broken by name.
#[must_use]
pub fn summarize(items: &[ExpenseRow]) -> ExpenseSummary {
    let mut by_category: Vec<CategoryTotal> = Vec::new();
    for item in items {
        match by_category.iter_mut().find(|c| c.category == item.category) {
            Some(entry) => {
                entry.total += item.amount;
                entry.count += 1;
            }
            None => by_category.push(CategoryTotal { category: item.category.clone(), total: item.amount, count: 1 }),
        }
    }
    for entry in &mut by_category {
        entry.total = round_cents(entry.total);
    }
    by_category.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

    ExpenseSummary {
        total: round_cents(items.iter().map(|i| i.amount).sum()),
        count: items.len(),
        by_category,
    }
}

// =============================================================================
// CRUD
// =============================================================================

const COLUMNS: &str = "id, user_id, title, category, amount, date, note, created_at";

/// Insert a new expense for `user_id`.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_expense(pool: &PgPool, user_id: Uuid, new: &NewExpense) -> Result<ExpenseRow, ExpenseError> {
    let row = sqlx::query(&format!(
        "INSERT INTO expenses (id, user_id, title, category, amount, date, note)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&new.title)
    .bind(&new.category)
    .bind(new.amount)
    .bind(new.date)
    .bind(&new.note)
    .fetch_one(pool)
    .await?;
    Ok(ExpenseRow::from_row(&row))
}

/// List a user's expenses, newest date first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_expenses(
    pool: &PgPool,
    user_id: Uuid,
    filter: &ExpenseFilter,
) -> Result<Vec<ExpenseRow>, ExpenseError> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS}
         FROM expenses
         WHERE user_id = $1
           AND ($2::text IS NULL OR category = $2)
           AND ($3::date IS NULL OR date >= $3)
           AND ($4::date IS NULL OR date <= $4)
         ORDER BY date DESC, created_at DESC"
    ))
    .bind(user_id)
    .bind(&filter.category)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(ExpenseRow::from_row).collect())
}

/// Fetch one expense owned by `user_id`.
///
/// # Errors
///
/// Returns [`ExpenseError::NotFound`] if missing or owned by someone else.
pub async fn get_expense(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<ExpenseRow, ExpenseError> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM expenses WHERE id = $1 AND user_id = $2"))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ExpenseError::NotFound(id))?;
    Ok(ExpenseRow::from_row(&row))
}

/// Apply a partial update.
///
/// # Errors
///
/// Returns [`ExpenseError::NotFound`] if missing or owned by someone else.
pub async fn update_expense(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    patch: &ExpensePatch,
) -> Result<ExpenseRow, ExpenseError> {
    let row = sqlx::query(&format!(
        "UPDATE expenses SET
             title = COALESCE($3, title),
             category = COALESCE($4, category),
             amount = COALESCE($5, amount),
             date = COALESCE($6, date),
             note = CASE WHEN $7 THEN $8 ELSE note END
         WHERE id = $1 AND user_id = $2
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(user_id)
    .bind(&patch.title)
    .bind(&patch.category)
    .bind(patch.amount)
    .bind(patch.date)
    .bind(patch.note.is_some())
    .bind(patch.note.clone().flatten())
    .fetch_optional(pool)
    .await?
    .ok_or(ExpenseError::NotFound(id))?;
    Ok(ExpenseRow::from_row(&row))
}

/// Delete an expense.
///
/// # Errors
///
/// Returns [`ExpenseError::NotFound`] if nothing was deleted.
pub async fn delete_expense(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ExpenseError> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ExpenseError::NotFound(id));
    }
    Ok(())
}

/// Summary over the same rows [`list_expenses`] would return.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn summary(pool: &PgPool, user_id: Uuid, filter: &ExpenseFilter) -> Result<ExpenseSummary, ExpenseError> {
    let rows = list_expenses(pool, user_id, filter).await?;
    Ok(summarize(&rows))
}

#[cfg(test)]
#[path = "expense_test.rs"]
mod tests;

use super::*;
use time::macros::{date, datetime};

#[test]
fn expense_error_to_status_maps_variants() {
    assert_eq!(expense_error_to_status(&ExpenseError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(
        expense_error_to_status(&ExpenseError::Invalid { field: "amount", reason: "must be positive" }),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        expense_error_to_status(&ExpenseError::Database(sqlx::Error::PoolTimedOut)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn query_into_filter_parses_dates_and_ignores_blanks() {
    let query = ExpenseQuery {
        category: Some("  ".into()),
        from: Some("2024-01-01".into()),
        to: Some("".into()),
    };
    let filter = query.into_filter().unwrap();
    assert_eq!(filter, ExpenseFilter { category: None, from: Some(date!(2024 - 01 - 01)), to: None });
}

#[test]
fn query_into_filter_keeps_category() {
    let query = ExpenseQuery { category: Some(" Food ".into()), ..ExpenseQuery::default() };
    assert_eq!(query.into_filter().unwrap().category.as_deref(), Some("Food"));
}

#[test]
fn query_into_filter_rejects_bad_date() {
    let query = ExpenseQuery { to: Some("last week".into()), ..ExpenseQuery::default() };
    assert!(matches!(query.into_filter(), Err(ExpenseError::Invalid { field: "date", .. })));
}

#[test]
fn expense_response_formats_dates() {
    let id = Uuid::new_v4();
    let row = ExpenseRow {
        id,
        user_id: Uuid::new_v4(),
        title: "Coffee".into(),
        category: "Food".into(),
        amount: 3.5,
        date: date!(2024 - 07 - 04),
        note: Some("oat milk".into()),
        created_at: datetime!(2024-07-04 08:30:15 UTC),
    };
    let resp = ExpenseResponse::from(row);
    assert_eq!(resp.id, id);
    assert_eq!(resp.date, "2024-07-04");
    assert_eq!(resp.created_at, "2024-07-04T08:30:15Z");

    let json = serde_json::to_value(&resp).unwrap();
    assert!(json.get("user_id").is_none(), "owner id is not exposed");
    assert_eq!(json["note"], "oat milk");
}

#[test]
fn create_body_accepts_minimal_payload() {
    let body: CreateExpenseBody =
        serde_json::from_str(r#"{"title":"Bus","amount":2.75,"category":"Transport"}"#).unwrap();
    assert_eq!(body.title, "Bus");
    assert!(body.date.is_none());
    assert!(body.note.is_none());
}

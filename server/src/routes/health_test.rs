use super::*;

#[tokio::test]
async fn root_reports_backend_running() {
    let Json(body) = root().await;
    assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!({ "message": "Backend is running!" }));
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[test]
fn db_status_success_omits_error() {
    let status = DbStatus::from_ping(Ok(()));
    assert_eq!(
        serde_json::to_value(status).unwrap(),
        serde_json::json!({ "status": "Database connected successfully!" })
    );
}

#[test]
fn db_status_failure_includes_error() {
    let status = DbStatus::from_ping(Err(sqlx::Error::PoolTimedOut));
    assert_eq!(status.status, "Failed to connect");
    assert!(status.error.as_deref().is_some_and(|e| !e.is_empty()));
}

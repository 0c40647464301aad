use super::*;
use crate::config;

#[tokio::test]
async fn app_state_copies_auth_settings_from_config() {
    let state = test_helpers::test_app_state();
    assert_eq!(
        state.auth,
        AuthSettings { session_ttl_hours: config::DEFAULT_SESSION_TTL_HOURS, cookie_secure: false }
    );
}

#[tokio::test]
async fn app_state_limiter_uses_configured_limit() {
    let mut cfg = test_helpers::test_config();
    cfg.login_rate_limit = 1;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(test_helpers::TEST_DATABASE_URL)
        .unwrap();
    let state = AppState::new(pool, &cfg);

    assert!(state.login_limiter.acquire("x@example.com").is_ok());
    assert!(state.login_limiter.acquire("x@example.com").is_err());
}

#[tokio::test]
async fn cloned_state_shares_limiter() {
    let state = test_helpers::test_app_state();
    let cloned = state.clone();
    for _ in 0..config::DEFAULT_LOGIN_RATE_LIMIT {
        cloned.login_limiter.acquire("y@example.com").unwrap();
    }
    assert!(state.login_limiter.acquire("y@example.com").is_err());
}

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn missing_database_url_is_an_error() {
    let err = ServerConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
}

#[test]
fn blank_database_url_is_an_error() {
    let err = ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", "   ")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
}

#[test]
fn defaults_apply_when_optional_vars_absent() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/budget")])).unwrap();
    assert_eq!(cfg.database_url, "postgres://localhost/budget");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.session_ttl_hours, DEFAULT_SESSION_TTL_HOURS);
    assert!(!cfg.cookie_secure);
    assert_eq!(cfg.login_rate_limit, DEFAULT_LOGIN_RATE_LIMIT);
    assert_eq!(cfg.login_rate_window, Duration::from_secs(DEFAULT_LOGIN_RATE_WINDOW_SECS));
}

#[test]
fn overrides_are_parsed() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[
        ("DATABASE_URL", "postgres://db/budget"),
        ("PORT", "8080"),
        ("DB_MAX_CONNECTIONS", "12"),
        ("SESSION_TTL_HOURS", " 24 "),
        ("COOKIE_SECURE", "yes"),
        ("LOGIN_RATE_LIMIT", "3"),
        ("LOGIN_RATE_WINDOW_SECS", "60"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.db_max_connections, 12);
    assert_eq!(cfg.session_ttl_hours, 24);
    assert!(cfg.cookie_secure);
    assert_eq!(cfg.login_rate_limit, 3);
    assert_eq!(cfg.login_rate_window, Duration::from_secs(60));
}

#[test]
fn invalid_port_reports_key_and_value() {
    let err = ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db"), ("PORT", "http")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "PORT", value: "http".to_owned() });
}

#[test]
fn invalid_cookie_secure_is_rejected() {
    let err = ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db"), ("COOKIE_SECURE", "maybe")]))
        .unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "COOKIE_SECURE", value: "maybe".to_owned() });
}

#[test]
fn parse_bool_variants() {
    for val in ["1", "true", "YES", " On "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
    for val in ["0", "false", "No", "off"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
    assert_eq!(parse_bool(""), None);
    assert_eq!(parse_bool("maybe"), None);
}

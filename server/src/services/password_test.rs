use super::*;

// Low iteration count keeps the suite fast; the format is identical.
const TEST_ITERATIONS: u32 = 1_000;

#[test]
fn hash_has_expected_shape() {
    let hash = hash_password_with("hunter22", TEST_ITERATIONS);
    let parts: Vec<&str> = hash.split('$').collect();
    assert_eq!(parts.len(), 4);
    assert_eq!(parts[0], "pbkdf2-sha256");
    assert_eq!(parts[1], "1000");
    assert_eq!(parts[2].len(), 32);
    assert_eq!(parts[3].len(), 64);
}

#[test]
fn default_hash_records_default_iterations() {
    let hash = hash_password("correct horse");
    assert!(hash.starts_with(&format!("pbkdf2-sha256${DEFAULT_ITERATIONS}$")));
    assert!(verify_password("correct horse", &hash));
}

#[test]
fn verify_accepts_original_password() {
    let hash = hash_password_with("s3cret-pass", TEST_ITERATIONS);
    assert!(verify_password("s3cret-pass", &hash));
}

#[test]
fn verify_rejects_wrong_password() {
    let hash = hash_password_with("s3cret-pass", TEST_ITERATIONS);
    assert!(!verify_password("s3cret-pasS", &hash));
    assert!(!verify_password("", &hash));
}

#[test]
fn same_password_hashes_differ_by_salt() {
    let a = hash_password_with("repeatable", TEST_ITERATIONS);
    let b = hash_password_with("repeatable", TEST_ITERATIONS);
    assert_ne!(a, b);
    assert!(verify_password("repeatable", &a));
    assert!(verify_password("repeatable", &b));
}

#[test]
fn malformed_hashes_never_verify() {
    let good = hash_password_with("pw", TEST_ITERATIONS);
    let parts: Vec<&str> = good.split('$').collect();

    let cases = [
        String::new(),
        "plaintext".to_owned(),
        format!("bcrypt${}${}${}", parts[1], parts[2], parts[3]),
        format!("pbkdf2-sha256$0${}${}", parts[2], parts[3]),
        format!("pbkdf2-sha256$abc${}${}", parts[2], parts[3]),
        format!("pbkdf2-sha256${}$zz${}", parts[1], parts[3]),
        format!("pbkdf2-sha256${}${}$abcd", parts[1], parts[2]),
        format!("{good}$extra"),
    ];
    for stored in cases {
        assert!(!verify_password("pw", &stored), "expected {stored:?} to be rejected");
    }
}

#[test]
fn truncated_or_padded_hash_never_verifies() {
    let good = hash_password_with("pw", TEST_ITERATIONS);
    let (prefix, hash_hex) = good.rsplit_once('$').expect("four fields");
    let short = format!("{prefix}${}", &hash_hex[..62]);
    let long = format!("{prefix}${hash_hex}00");
    assert!(!verify_password("pw", &short));
    assert!(!verify_password("pw", &long));
    assert!(verify_password("pw", &good));
}

#[tokio::test]
async fn background_helpers_agree_with_inline_versions() {
    let stored = hash_password_with("offload-me", TEST_ITERATIONS);
    assert!(verify_in_background("offload-me".into(), stored.clone()).await.unwrap());
    assert!(!verify_in_background("wrong".into(), stored).await.unwrap());

    let hashed = hash_in_background("offload-me".into()).await.unwrap();
    assert!(verify_password("offload-me", &hashed));
}

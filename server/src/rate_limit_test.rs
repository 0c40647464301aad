use super::*;

const LIMIT: usize = 3;
const WINDOW: Duration = Duration::from_secs(60);

fn limiter() -> LoginLimiter {
    LoginLimiter::new(LIMIT, WINDOW)
}

#[test]
fn fresh_limiter_tracks_nothing() {
    let rl = limiter();
    assert_eq!(rl.tracked_keys(), 0);
    assert!(rl.acquire("a@example.com").is_ok());
    assert_eq!(rl.tracked_keys(), 1);
}

#[test]
fn rejects_attempt_after_limit() {
    let rl = limiter();
    let now = Instant::now();

    for i in 0..LIMIT {
        assert!(rl.acquire_at("a@example.com", now).is_ok(), "attempt {i} should be allowed");
    }
    assert!(matches!(
        rl.acquire_at("a@example.com", now),
        Err(RateLimitError::TooManyAttempts { limit: LIMIT, window_secs: 60, .. })
    ));
}

#[test]
fn rejected_attempts_do_not_extend_the_window() {
    let rl = limiter();
    let start = Instant::now();
    for _ in 0..LIMIT {
        rl.acquire_at("a@example.com", start).unwrap();
    }
    for s in 1..10 {
        assert!(rl.acquire_at("a@example.com", start + Duration::from_secs(s)).is_err());
    }
    assert!(rl.acquire_at("a@example.com", start + WINDOW + Duration::from_secs(1)).is_ok());
}

#[test]
fn concurrent_attempts_never_exceed_limit() {
    let rl = limiter();
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let rl = rl.clone();
            std::thread::spawn(move || rl.acquire("b@example.com").is_ok())
        })
        .collect();
    let granted = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
    assert_eq!(granted, LIMIT);
}

#[test]
fn keys_are_independent() {
    let rl = limiter();
    let now = Instant::now();
    for _ in 0..LIMIT {
        rl.acquire_at("a@example.com", now).unwrap();
    }
    assert!(rl.acquire_at("a@example.com", now).is_err());
    assert!(rl.acquire_at("b@example.com", now).is_ok());
}

#[test]
fn sliding_window_releases_oldest_first() {
    let rl = limiter();
    let start = Instant::now();
    rl.acquire_at("a@example.com", start).unwrap();
    rl.acquire_at("a@example.com", start + Duration::from_secs(30)).unwrap();
    rl.acquire_at("a@example.com", start + Duration::from_secs(40)).unwrap();

    assert!(rl.acquire_at("a@example.com", start + Duration::from_secs(50)).is_err());
    assert!(rl.acquire_at("a@example.com", start + Duration::from_secs(61)).is_ok());
}

#[test]
fn retry_after_reflects_oldest_attempt() {
    let rl = limiter();
    let start = Instant::now();
    for _ in 0..LIMIT {
        rl.acquire_at("a@example.com", start).unwrap();
    }
    let err = rl.acquire_at("a@example.com", start + Duration::from_secs(20)).unwrap_err();
    assert_eq!(err, RateLimitError::TooManyAttempts { limit: LIMIT, window_secs: 60, retry_after_secs: 40 });
}

#[test]
fn expired_keys_are_swept_on_acquire() {
    let rl = limiter();
    let start = Instant::now();
    for i in 0..50 {
        rl.acquire_at(&format!("user{i}@example.com"), start).unwrap();
    }
    assert_eq!(rl.tracked_keys(), 50);

    rl.acquire_at("late@example.com", start + WINDOW + Duration::from_secs(1)).unwrap();
    assert_eq!(rl.tracked_keys(), 1);
}

#[test]
fn release_returns_one_reservation() {
    let rl = limiter();
    let now = Instant::now();
    for _ in 0..LIMIT {
        rl.acquire_at("a@example.com", now).unwrap();
    }
    rl.release("a@example.com");
    assert!(rl.acquire_at("a@example.com", now).is_ok());
    assert!(rl.acquire_at("a@example.com", now).is_err());
}

#[test]
fn release_of_last_reservation_drops_key() {
    let rl = limiter();
    rl.acquire("a@example.com").unwrap();
    rl.release("a@example.com");
    rl.release("unknown@example.com");
    assert_eq!(rl.tracked_keys(), 0);
}

#[test]
fn reset_clears_failures() {
    let rl = limiter();
    let now = Instant::now();
    for _ in 0..LIMIT {
        rl.acquire_at("a@example.com", now).unwrap();
    }
    rl.reset("a@example.com");
    assert!(rl.acquire_at("a@example.com", now).is_ok());
}

#[test]
fn clones_share_state() {
    let rl = limiter();
    let other = rl.clone();
    let now = Instant::now();
    for _ in 0..LIMIT {
        other.acquire_at("a@example.com", now).unwrap();
    }
    assert!(rl.acquire_at("a@example.com", now).is_err());
}

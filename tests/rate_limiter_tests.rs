use std::time::Duration;

use resume_render_api::limiter::rate_limiter::RateLimiterStore;

#[tokio::test]
async fn allows_up_to_the_limit_then_rejects() {
    let store = RateLimiterStore::new(3, Duration::from_secs(60));

    for i in 0..3 {
        let decision = store.check("10.0.0.1");
        assert!(decision.allowed, "request {i} should pass");
    }

    let rejected = store.check("10.0.0.1");
    assert!(!rejected.allowed);
    assert!(rejected.retry_after_secs >= 1);
}

#[tokio::test]
async fn remaining_counts_down() {
    let store = RateLimiterStore::new(2, Duration::from_secs(60));

    assert_eq!(store.check("caller").remaining, 1);
    assert_eq!(store.check("caller").remaining, 0);
}

#[tokio::test]
async fn keys_are_independent() {
    let store = RateLimiterStore::new(1, Duration::from_secs(60));

    assert!(store.check("10.0.0.1").allowed);
    assert!(!store.check("10.0.0.1").allowed);
    assert!(store.check("10.0.0.2").allowed);
}

#[tokio::test]
async fn window_resets_after_elapse() {
    let store = RateLimiterStore::new(1, Duration::from_millis(50));

    assert!(store.check("caller").allowed);
    assert!(!store.check("caller").allowed);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(store.check("caller").allowed);
}

#[tokio::test]
async fn constant_key_acts_as_global_ceiling() {
    let store = RateLimiterStore::new(2, Duration::from_secs(3600));

    assert!(store.check("global").allowed);
    assert!(store.check("global").allowed);
    // Third request trips the ceiling no matter which caller triggered it.
    assert!(!store.check("global").allowed);
}

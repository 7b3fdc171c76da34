#![cfg(feature = "std")]

use kodct::cache::{
    cached_plan_count, clear_plan_cache, plan_cache_capacity, set_plan_cache_capacity,
    MAX_CACHE_ENTRIES,
};
use kodct::{forward, Normalization};

/// Capacity overrides evict oldest plans first and `0` restores the default.
///
/// Kept as a single test so nothing else in this binary touches the cache.
#[test]
fn capacity_override_and_eviction() {
    if std::env::var(kodct::cache::CAPACITY_ENV).is_err() {
        assert_eq!(plan_cache_capacity(), MAX_CACHE_ENTRIES);
    }
    clear_plan_cache();
    assert_eq!(cached_plan_count(), 0);

    for n in 1..=5usize {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        forward(&x, Normalization::None).unwrap();
    }
    assert_eq!(cached_plan_count(), 5);

    // Same length again is a hit, f32 gets its own entry.
    forward(&[1.0f64, 2.0], Normalization::None).unwrap();
    assert_eq!(cached_plan_count(), 5);
    forward(&[1.0f32, 2.0], Normalization::None).unwrap();
    assert_eq!(cached_plan_count(), 6);

    set_plan_cache_capacity(3);
    assert_eq!(plan_cache_capacity(), 3);
    assert_eq!(cached_plan_count(), 3);

    for n in 10..20usize {
        let x = vec![1.0f64; n];
        let y = forward(&x, Normalization::Ortho).unwrap();
        assert!((y[0] - (n as f64).sqrt()).abs() < 1e-9);
        assert!(cached_plan_count() <= 3);
    }

    set_plan_cache_capacity(0);
    assert!(plan_cache_capacity() >= 1);
    clear_plan_cache();
    assert_eq!(cached_plan_count(), 0);
}

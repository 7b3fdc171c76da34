//! Process-wide cache of [`DctPlan`]s backing the free functions
//! [`crate::forward`] and [`crate::inverse`].
//!
//! Plans are keyed by scalar type and length. The cache holds at most
//! [`plan_cache_capacity`] plans and evicts the oldest insertion first.
//! Capacity comes from, in order: [`set_plan_cache_capacity`], the
//! `KODCT_PLAN_CACHE_ENTRIES` environment variable (read once), and
//! [`MAX_CACHE_ENTRIES`].

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::sync::atomic::{AtomicUsize, Ordering};
use hashbrown::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::dct::{DctError, DctPlan};
use crate::num::Float;

/// Default number of cached plans.
pub const MAX_CACHE_ENTRIES: usize = 64;

/// Environment variable overriding [`MAX_CACHE_ENTRIES`].
pub const CAPACITY_ENV: &str = "KODCT_PLAN_CACHE_ENTRIES";

/// `0` means no override.
static CAPACITY_OVERRIDE: AtomicUsize = AtomicUsize::new(0);
static ENV_CAPACITY: OnceLock<usize> = OnceLock::new();
static CACHE: OnceLock<Mutex<PlanCache>> = OnceLock::new();

type Key = (TypeId, usize);

#[derive(Default)]
struct PlanCache {
    plans: HashMap<Key, Arc<dyn Any + Send + Sync>>,
    order: VecDeque<Key>,
}

impl PlanCache {
    fn evict_to(&mut self, capacity: usize) {
        while self.order.len() > capacity {
            if let Some(key) = self.order.pop_front() {
                self.plans.remove(&key);
                debug_log!("dct plan evicted: n={} capacity={}", key.1, capacity);
            }
        }
    }
}

fn cache() -> MutexGuard<'static, PlanCache> {
    CACHE
        .get_or_init(|| Mutex::new(PlanCache::default()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn parse_capacity(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|&v| v > 0)
}

fn env_capacity() -> usize {
    *ENV_CAPACITY.get_or_init(|| {
        std::env::var(CAPACITY_ENV)
            .ok()
            .and_then(|raw| parse_capacity(&raw))
            .unwrap_or(MAX_CACHE_ENTRIES)
    })
}

/// Current maximum number of cached plans.
pub fn plan_cache_capacity() -> usize {
    match CAPACITY_OVERRIDE.load(Ordering::Relaxed) {
        0 => env_capacity(),
        n => n,
    }
}

/// Override the cache capacity at runtime, evicting immediately if needed.
///
/// Passing `0` reverts to the environment variable or the default.
pub fn set_plan_cache_capacity(entries: usize) {
    CAPACITY_OVERRIDE.store(entries, Ordering::Relaxed);
    cache().evict_to(plan_cache_capacity());
}

/// Drop every cached plan.
pub fn clear_plan_cache() {
    let mut guard = cache();
    guard.plans.clear();
    guard.order.clear();
}

/// Number of plans currently cached, across all scalar types.
pub fn cached_plan_count() -> usize {
    cache().order.len()
}

/// Shared plan for `n` samples of `T`, building it outside the lock on a miss.
pub(crate) fn shared_plan<T: Float>(n: usize) -> Result<Arc<DctPlan<T>>, DctError> {
    let key = (TypeId::of::<T>(), n);
    let hit = cache().plans.get(&key).cloned();
    if let Some(entry) = hit {
        if let Ok(plan) = entry.downcast::<DctPlan<T>>() {
            trace_log!("dct plan cache hit: n={}", n);
            return Ok(plan);
        }
    }
    let plan = Arc::new(DctPlan::<T>::new(n)?);
    debug_log!("dct plan built: n={}", n);
    let mut guard = cache();
    if let Some(entry) = guard.plans.get(&key).cloned() {
        // Another thread won the race; keep a single plan per key.
        if let Ok(existing) = entry.downcast::<DctPlan<T>>() {
            return Ok(existing);
        }
    }
    let erased: Arc<dyn Any + Send + Sync> = plan.clone();
    guard.plans.insert(key, erased);
    guard.order.push_back(key);
    guard.evict_to(plan_cache_capacity());
    Ok(plan)
}

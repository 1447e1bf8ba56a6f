//! Single-slot, time-bounded cache for loaded point sets.

use std::time::{Duration, Instant};

/// Default lifetime of a cached source: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// Holds at most one value, valid for `ttl` after it was stored.
#[derive(Debug)]
pub struct Cached<T> {
    ttl: Duration,
    entry: Option<Entry<T>>,
}

impl<T> Cached<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// The cached value if it is still fresh at `now`.
    #[must_use]
    pub fn get_at(&self, now: Instant) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| &entry.value)
    }

    /// Replace the cached value, stamped at `now`.
    pub fn store_at(&mut self, value: T, now: Instant) -> &T {
        let entry = self.entry.insert(Entry {
            value,
            stored_at: now,
        });
        &entry.value
    }

    /// Drop the cached value so the next read misses.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_misses() {
        let cache: Cached<u32> = Cached::default();
        assert!(cache.get_at(Instant::now()).is_none());
    }

    #[test]
    fn value_is_fresh_until_ttl_elapses() {
        let start = Instant::now();
        let mut cache = Cached::new(Duration::from_secs(60));
        cache.store_at(7_u32, start);

        assert_eq!(cache.get_at(start), Some(&7));
        assert_eq!(cache.get_at(start + Duration::from_secs(59)), Some(&7));
        assert!(cache.get_at(start + Duration::from_secs(60)).is_none());
    }

    #[test]
    fn clear_forces_a_miss() {
        let now = Instant::now();
        let mut cache = Cached::default();
        cache.store_at(vec![1, 2, 3], now);
        cache.clear();
        assert!(cache.get_at(now).is_none());
    }

    #[test]
    fn store_replaces_previous_value_and_timestamp() {
        let start = Instant::now();
        let mut cache = Cached::new(Duration::from_secs(10));
        cache.store_at("old", start);
        cache.store_at("new", start + Duration::from_secs(8));

        assert_eq!(cache.get_at(start + Duration::from_secs(15)), Some(&"new"));
    }

    #[test]
    fn zero_ttl_never_hits() {
        let start = Instant::now();
        let mut cache = Cached::new(Duration::ZERO);
        cache.store_at(1_u8, start);
        assert!(cache.get_at(start).is_none());
    }
}

//! In-flight request deduplication with a bounded TTL.
//!
//! Keyed by a caller-supplied request signature. Each entry carries an
//! explicit expiry timestamp; stale entries are dropped lazily on access
//! and by [`PendingDedup::sweep`]. No timers and no background task.

use std::collections::HashMap;

use crate::types::Timestamp;

/// Tracks requests that are currently in flight so identical submissions
/// within the TTL window collapse into one.
#[derive(Debug)]
pub struct PendingDedup {
    ttl: chrono::Duration,
    entries: HashMap<String, Timestamp>,
}

impl PendingDedup {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Try to admit a request with the given signature.
    ///
    /// Returns `true` if the key was admitted (no live entry existed) and
    /// records it with a fresh expiry. Returns `false` if an identical
    /// request is already in flight.
    pub fn begin(&mut self, signature: &str, now: Timestamp) -> bool {
        match self.entries.get(signature) {
            Some(expires_at) if *expires_at > now => false,
            _ => {
                self.entries
                    .insert(signature.to_string(), now + self.ttl);
                true
            }
        }
    }

    /// Mark a request as finished, freeing its signature immediately.
    pub fn finish(&mut self, signature: &str) {
        self.entries.remove(signature);
    }

    /// Drop every expired entry. Returns the number removed.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before - self.entries.len()
    }

    /// Number of live (possibly stale) entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn duplicate_within_ttl_is_rejected() {
        let mut dedup = PendingDedup::new(Duration::seconds(5));
        let now = Utc::now();
        assert!(dedup.begin("POST /quotes {a}", now));
        assert!(!dedup.begin("POST /quotes {a}", now));
        assert!(!dedup.begin("POST /quotes {a}", now + Duration::seconds(4)));
    }

    #[test]
    fn different_signatures_do_not_collide() {
        let mut dedup = PendingDedup::new(Duration::seconds(5));
        let now = Utc::now();
        assert!(dedup.begin("sig-a", now));
        assert!(dedup.begin("sig-b", now));
    }

    #[test]
    fn entry_expires_after_ttl() {
        let mut dedup = PendingDedup::new(Duration::seconds(5));
        let now = Utc::now();
        assert!(dedup.begin("sig", now));
        assert!(dedup.begin("sig", now + Duration::seconds(6)));
    }

    #[test]
    fn finish_frees_the_signature_immediately() {
        let mut dedup = PendingDedup::new(Duration::seconds(60));
        let now = Utc::now();
        assert!(dedup.begin("sig", now));
        dedup.finish("sig");
        assert!(dedup.begin("sig", now));
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let mut dedup = PendingDedup::new(Duration::seconds(5));
        let now = Utc::now();
        dedup.begin("old", now);
        dedup.begin("fresh", now + Duration::seconds(4));
        let removed = dedup.sweep(now + Duration::seconds(6));
        assert_eq!(removed, 1);
        assert_eq!(dedup.len(), 1);
        assert!(!dedup.begin("fresh", now + Duration::seconds(6)));
    }
}

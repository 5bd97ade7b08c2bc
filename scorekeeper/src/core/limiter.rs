//! Per-client rate limiting on top of token buckets
//!
//! The limiter keeps one [`TokenBucket`] per client identifier
//! (typically the caller's network address), created lazily on first
//! sight. The map is never pruned: stale identifiers cost one bucket
//! each for the process lifetime, a known tradeoff for this core.

use super::bucket::TokenBucket;
use std::collections::HashMap;
use std::time::SystemTime;

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Seconds to wait before the same request would be admitted
    /// (0.0 when allowed)
    pub retry_after: f64,
    /// Seconds until this identifier's bucket is back at full capacity
    pub reset_after: f64,
    /// Whole tokens left for this identifier after the check
    pub remaining: i64,
    /// Bucket capacity, for reporting alongside `remaining`
    pub limit: u32,
}

/// Rate limiter holding one bucket per client identifier
///
/// # Example
///
/// ```
/// use scorekeeper::RateLimiter;
/// use std::time::SystemTime;
///
/// let mut limiter = RateLimiter::new(30, 0.5);
/// let decision = limiter.admit("203.0.113.9", 1, SystemTime::now());
/// assert!(decision.allowed);
/// ```
pub struct RateLimiter {
    max_tokens: u32,
    refill_rate: f64,
    buckets: HashMap<String, TokenBucket>,
}

impl RateLimiter {
    /// Create a limiter where every new identifier gets a bucket with
    /// the given capacity and refill rate (tokens per second).
    pub fn new(max_tokens: u32, refill_rate: f64) -> Self {
        RateLimiter {
            max_tokens,
            refill_rate,
            buckets: HashMap::new(),
        }
    }

    /// Check whether `id` may spend `cost` tokens now.
    ///
    /// Consumes the tokens when admitted; otherwise reports the
    /// minimum wait before retrying, with no token state change.
    pub fn admit(&mut self, id: &str, cost: u32, now: SystemTime) -> Decision {
        let bucket = self
            .buckets
            .entry(id.to_string())
            .or_insert_with(|| TokenBucket::new(self.max_tokens, self.refill_rate, now));

        let allowed = bucket.try_consume(cost, now);
        let retry_after = if allowed { 0.0 } else { bucket.wait_time(cost, now) };

        Decision {
            allowed,
            retry_after,
            reset_after: bucket.time_to_full(now),
            remaining: bucket.remaining(now),
            limit: self.max_tokens,
        }
    }

    /// Whole tokens currently available for `id`, without consuming.
    /// Unseen identifiers report full capacity.
    pub fn remaining(&mut self, id: &str, now: SystemTime) -> i64 {
        match self.buckets.get_mut(id) {
            Some(bucket) => bucket.remaining(now),
            None => self.max_tokens as i64,
        }
    }

    /// Configured bucket capacity.
    pub fn limit(&self) -> u32 {
        self.max_tokens
    }

    /// Number of identifiers seen so far.
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn admits_burst_then_rejects_with_retry_after() {
        let mut limiter = RateLimiter::new(30, 0.5);
        let now = SystemTime::now();

        for i in 0..30 {
            let d = limiter.admit("client", 1, now);
            assert!(d.allowed, "request {} should be admitted", i + 1);
        }

        let denied = limiter.admit("client", 1, now);
        assert!(!denied.allowed);
        assert!((denied.retry_after - 2.0).abs() < 1e-9);
        assert_eq!(denied.remaining, 0);
        // Empty bucket refilling at 0.5 tokens/sec resets in 60s
        assert!((denied.reset_after - 60.0).abs() < 1e-9);

        // After the reported wait the request goes through
        let later = now + Duration::from_secs_f64(denied.retry_after);
        assert!(limiter.admit("client", 1, later).allowed);
    }

    #[test]
    fn identifiers_are_independent() {
        let mut limiter = RateLimiter::new(1, 0.1);
        let now = SystemTime::now();

        assert!(limiter.admit("a", 1, now).allowed);
        assert!(!limiter.admit("a", 1, now).allowed);
        assert!(limiter.admit("b", 1, now).allowed);
    }

    #[test]
    fn unseen_identifier_reports_full_capacity() {
        let mut limiter = RateLimiter::new(30, 0.5);
        assert_eq!(limiter.remaining("never-seen", SystemTime::now()), 30);
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn remaining_does_not_consume() {
        let mut limiter = RateLimiter::new(5, 1.0);
        let now = SystemTime::now();

        limiter.admit("c", 2, now);
        assert_eq!(limiter.remaining("c", now), 3);
        assert_eq!(limiter.remaining("c", now), 3);
    }

    #[test]
    fn denial_leaves_tokens_untouched() {
        let mut limiter = RateLimiter::new(3, 0.5);
        let now = SystemTime::now();

        assert!(limiter.admit("d", 3, now).allowed);
        assert!(!limiter.admit("d", 2, now).allowed);
        // A unit-cost check a little later still finds the refilled token
        let later = now + Duration::from_secs(2);
        assert!(limiter.admit("d", 1, later).allowed);
    }
}

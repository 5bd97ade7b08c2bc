//! Token bucket accounting with time-based refill
//!
//! The bucket holds fractional tokens internally and refills as a pure
//! function of elapsed wall-clock time. Every operation takes an
//! explicit `now`, so callers (and tests) control the clock.

use std::time::SystemTime;

/// A single token bucket
///
/// Starts full. Tokens accrue at `refill_rate` per second up to
/// `max_tokens`; consuming `n` tokens succeeds only when at least `n`
/// are available.
///
/// # Example
///
/// ```
/// use scorekeeper::TokenBucket;
/// use std::time::{Duration, SystemTime};
///
/// let now = SystemTime::now();
/// let mut bucket = TokenBucket::new(2, 1.0, now);
///
/// assert!(bucket.try_consume(2, now));
/// assert!(!bucket.try_consume(1, now));
///
/// // One second later a token has refilled
/// assert!(bucket.try_consume(1, now + Duration::from_secs(1)));
/// ```
#[derive(Debug, Clone)]
pub struct TokenBucket {
    max_tokens: u32,
    refill_rate: f64,
    tokens: f64,
    last_refill: SystemTime,
}

impl TokenBucket {
    /// Create a bucket, full, with the given capacity and refill rate
    /// (tokens per second). Both must be positive.
    pub fn new(max_tokens: u32, refill_rate: f64, now: SystemTime) -> Self {
        debug_assert!(max_tokens > 0);
        debug_assert!(refill_rate > 0.0);
        TokenBucket {
            max_tokens,
            refill_rate,
            tokens: max_tokens as f64,
            last_refill: now,
        }
    }

    /// Advance the token count by the elapsed time since the last
    /// refill, capped at capacity.
    ///
    /// A clock that moved backwards refills nothing; the refill marker
    /// still advances to `now` so the bucket recovers once the clock
    /// does.
    fn refill(&mut self, now: SystemTime) {
        if let Ok(elapsed) = now.duration_since(self.last_refill) {
            let replenished = self.tokens + elapsed.as_secs_f64() * self.refill_rate;
            self.tokens = replenished.min(self.max_tokens as f64);
        }
        self.last_refill = now;
    }

    /// Try to consume `n` tokens. Returns true when they were
    /// consumed; on false the token count is unchanged.
    pub fn try_consume(&mut self, n: u32, now: SystemTime) -> bool {
        self.refill(now);
        if self.tokens >= n as f64 {
            self.tokens -= n as f64;
            true
        } else {
            false
        }
    }

    /// Seconds until `n` tokens would be available (0.0 if they
    /// already are).
    pub fn wait_time(&mut self, n: u32, now: SystemTime) -> f64 {
        self.refill(now);
        if self.tokens >= n as f64 {
            0.0
        } else {
            (n as f64 - self.tokens) / self.refill_rate
        }
    }

    /// Whole tokens currently available, floored.
    pub fn remaining(&mut self, now: SystemTime) -> i64 {
        self.refill(now);
        self.tokens.floor() as i64
    }

    /// Seconds until the bucket is back at full capacity (0.0 when it
    /// already is).
    pub fn time_to_full(&mut self, now: SystemTime) -> f64 {
        self.refill(now);
        (self.max_tokens as f64 - self.tokens) / self.refill_rate
    }

    /// Bucket capacity.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

//! Core components of the scorekeeper leaderboard library
//!
//! This module contains the fundamental building blocks:
//! - [`bucket`]: token bucket accounting with time-based refill
//! - [`limiter`]: per-client rate limiting on top of token buckets
//! - [`record`]: the score data model and retention policy
//! - [`validate`]: per-item business-rule validation
//! - [`store`]: storage contract and the in-memory backend
//! - [`coordinator`]: single and bulk submission orchestration

pub mod bucket;
pub mod coordinator;
pub mod limiter;
pub mod record;
pub mod store;
pub mod validate;

#[cfg(test)]
mod tests;

pub use bucket::TokenBucket;
pub use coordinator::{BatchError, BatchOutcome, SubmissionCoordinator};
pub use limiter::{Decision, RateLimiter};
pub use record::{ClientInfo, RetentionPolicy, ScoreRecord, ScoreSubmission};
pub use store::{MemoryStore, QueryPage, ScoreStore};
pub use validate::RejectReason;

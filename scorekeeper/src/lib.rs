//! # Scorekeeper
//!
//! Core library for a small leaderboard service: clients submit gameplay
//! results (single or batched) and query a ranked, paginated,
//! time-filterable view of recent high scores.
//!
//! ## Overview
//!
//! The library is pure and synchronous: no I/O, no async, no global
//! state. Every component is constructed explicitly and timestamps are
//! injected by the caller, which keeps the whole core deterministic
//! under test. The server crate wires these pieces behind a network
//! transport.
//!
//! Three pieces carry the actual logic:
//!
//! - **Rate limiting**: [`TokenBucket`] tracks fractional tokens with
//!   time-based refill; [`RateLimiter`] owns one bucket per client
//!   identifier and answers admit/remaining/retry-after.
//! - **Score storage**: [`ScoreStore`] is the storage contract
//!   (insert, ranked + paginated query, count, retention eviction) and
//!   [`MemoryStore`] is its in-memory implementation.
//! - **Submission**: [`validate`](core::validate::validate) applies the
//!   business rules per item and [`SubmissionCoordinator`] orchestrates
//!   single and bulk submission with partial acceptance.
//!
//! ## Quick Start
//!
//! ```
//! use scorekeeper::{MemoryStore, ScoreSubmission, SubmissionCoordinator};
//! use chrono::Utc;
//!
//! let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());
//!
//! let submission = ScoreSubmission {
//!     nickname: "player_one".into(),
//!     points: 12_400,
//!     ..Default::default()
//! };
//!
//! let record = coordinator.submit_one(submission, Utc::now()).unwrap();
//! assert_eq!(record.points, 12_400);
//! ```
//!
//! ## Thread Safety
//!
//! Neither the store nor the rate limiter is thread-safe on its own.
//! Serialize access externally; the server crate does this with a
//! single actor task that owns both.

pub mod core;

pub use core::{
    BatchError, BatchOutcome, Decision, MemoryStore, QueryPage, RateLimiter, RejectReason,
    RetentionPolicy, ScoreRecord, ScoreStore, ScoreSubmission, SubmissionCoordinator, TokenBucket,
};

// Re-export the store module so downstream crates can name backends directly
pub use crate::core::store;

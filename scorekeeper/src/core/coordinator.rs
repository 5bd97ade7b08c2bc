//! Submission orchestration
//!
//! The coordinator ties validation to storage. Single submissions turn
//! a validation failure into a caller-visible error; bulk submissions
//! validate every item independently and report accepted and rejected
//! items side by side, so one broken item never affects its siblings.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;

use super::record::{ScoreRecord, ScoreSubmission};
use super::store::ScoreStore;
use super::validate::{self, RejectReason};

/// Upper bound on items per bulk submission.
pub const MAX_BATCH_SIZE: usize = 50;

/// Result of a bulk submission: partial success is the normal case
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub accepted: Vec<ScoreRecord>,
    /// Rejected items paired with the reason, in input order
    pub rejected: Vec<(RejectReason, ScoreSubmission)>,
}

/// Whole-batch failures, raised before any item is processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The batch exceeds [`MAX_BATCH_SIZE`]; nothing was stored
    TooLarge { len: usize, max: usize },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::TooLarge { len, max } => {
                write!(f, "batch of {len} items exceeds the maximum of {max}")
            }
        }
    }
}

impl Error for BatchError {}

/// Orchestrates single and bulk submission over a [`ScoreStore`]
///
/// Owns the store; all writes flow through here so every stored record
/// is known to satisfy the validation rules.
pub struct SubmissionCoordinator<S: ScoreStore> {
    store: S,
}

impl<S: ScoreStore> SubmissionCoordinator<S> {
    pub fn new(store: S) -> Self {
        SubmissionCoordinator { store }
    }

    /// Validate and store one submission.
    ///
    /// The suspect heuristics run on accepted submissions and their
    /// verdict is persisted on the record; they never cause rejection.
    pub fn submit_one(
        &mut self,
        submission: ScoreSubmission,
        now: DateTime<Utc>,
    ) -> Result<ScoreRecord, RejectReason> {
        validate::validate(&submission)?;
        let suspect = validate::is_suspect(&submission);
        Ok(self.store.insert(submission, suspect, now))
    }

    /// Validate and store a batch of submissions.
    ///
    /// Batches above [`MAX_BATCH_SIZE`] are refused wholesale before
    /// any item is touched. Otherwise each item goes through the same
    /// path as [`submit_one`](Self::submit_one) and failures are
    /// aggregated, never propagated.
    pub fn submit_batch(
        &mut self,
        submissions: Vec<ScoreSubmission>,
        now: DateTime<Utc>,
    ) -> Result<BatchOutcome, BatchError> {
        if submissions.len() > MAX_BATCH_SIZE {
            return Err(BatchError::TooLarge {
                len: submissions.len(),
                max: MAX_BATCH_SIZE,
            });
        }

        let mut outcome = BatchOutcome::default();
        for submission in submissions {
            match self.submit_one(submission.clone(), now) {
                Ok(record) => outcome.accepted.push(record),
                Err(reason) => outcome.rejected.push((reason, submission)),
            }
        }
        Ok(outcome)
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for maintenance operations (eviction).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

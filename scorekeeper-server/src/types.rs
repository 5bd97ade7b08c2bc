//! Wire types shared by the transport layer
//!
//! The core's [`ScoreSubmission`] and
//! [`ScoreRecord`](scorekeeper::ScoreRecord) already carry the public
//! camelCase JSON shape, so the transport reuses them directly. This
//! module adds the envelopes around them: batch input, the ranked score
//! window, and per-item rejection entries.

use chrono::{DateTime, Utc};
use scorekeeper::{BatchOutcome, RejectReason, RetentionPolicy, ScoreRecord, ScoreSubmission};
use serde::{Deserialize, Serialize};

/// Body of `POST /scores/bulk`
///
/// `client_time` is the submitter's wall clock at upload; offline-first
/// clients send it with queued batches. It is logged and otherwise
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBatchInput {
    #[serde(default)]
    pub client_time: Option<DateTime<Utc>>,
    pub items: Vec<ScoreSubmission>,
}

/// One rejected batch item: the reason plus the original payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRejection {
    pub reason: RejectReason,
    pub payload: ScoreSubmission,
}

/// Body of the `207` bulk response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBatchResult {
    pub accepted: Vec<ScoreRecord>,
    pub rejected: Vec<ScoreRejection>,
}

impl From<BatchOutcome> for ScoreBatchResult {
    fn from(outcome: BatchOutcome) -> Self {
        ScoreBatchResult {
            accepted: outcome.accepted,
            rejected: outcome
                .rejected
                .into_iter()
                .map(|(reason, payload)| ScoreRejection { reason, payload })
                .collect(),
        }
    }
}

/// Body of the `GET /scores` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWindow {
    /// Server time when this page was produced
    pub generated_at: DateTime<Utc>,
    /// Retention policy in force, echoed for client display
    pub retention: RetentionPolicy,
    /// Cursor resuming after this page, null on the last page
    pub next_cursor: Option<String>,
    pub items: Vec<ScoreRecord>,
}

/// Stable-code error body: `{"detail": "<CODE or message>"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

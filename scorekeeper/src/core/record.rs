//! Score data model
//!
//! Wire names are camelCase to match the public JSON contract, so the
//! same structs serve both the core and the transport layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum nickname length in characters.
pub const NICKNAME_MAX_LEN: usize = 16;
/// Maximum number of tags per record.
pub const TAGS_MAX: usize = 5;
/// Maximum length of a single tag in characters.
pub const TAG_MAX_LEN: usize = 24;
/// Maximum length of the normalised user-agent string.
pub const CLIENT_UA_MAX_LEN: usize = 128;

/// Optional client metadata attached to a submission
///
/// Opaque to the core: stored and echoed back, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Short client build identifier
    #[serde(default)]
    pub version: Option<String>,
    /// Client platform (e.g. "web", "desktop")
    #[serde(default)]
    pub platform: Option<String>,
    /// Normalised user-agent or device info, at most
    /// [`CLIENT_UA_MAX_LEN`] characters
    #[serde(default)]
    pub ua: Option<String>,
}

/// A score submission candidate, before validation and storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub nickname: String,
    pub points: i64,
    /// Lines cleared; defaults to 0 at insertion when absent
    #[serde(default)]
    pub lines: Option<i64>,
    /// Highest level reached; defaults to 0 at insertion when absent
    #[serde(default)]
    pub level_reached: Option<i64>,
    /// Game duration in seconds; defaults to 0 at insertion when absent
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    /// Opaque game seed
    #[serde(default)]
    pub seed: Option<String>,
    /// Up to [`TAGS_MAX`] tags of at most [`TAG_MAX_LEN`] characters each
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub client: Option<ClientInfo>,
}

/// A stored score entry with server-assigned metadata
///
/// Immutable once created: `id` is unique for the store's lifetime and
/// `created_at` is fixed at insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Server-generated identifier
    pub id: String,
    pub nickname: String,
    pub points: i64,
    pub lines: i64,
    pub level_reached: i64,
    pub duration_seconds: i64,
    pub seed: Option<String>,
    /// Assigned by the store at insertion, UTC
    pub created_at: DateTime<Utc>,
    /// Heuristic implausibility flag; set at insertion, never filters
    /// ranking
    pub suspect: bool,
    pub client: Option<ClientInfo>,
    pub tags: Vec<String>,
}

/// Retention policy governing eviction
///
/// A record survives eviction if it is among the `max_records` most
/// recently created, or if its age is within `days`. Read-only at
/// request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicy {
    /// Age ceiling in days, at least 1
    pub days: u32,
    /// Recency-rank ceiling, at least 1
    pub max_records: usize,
}

impl RetentionPolicy {
    pub fn new(days: u32, max_records: usize) -> Self {
        RetentionPolicy { days, max_records }
    }
}

//! Storage contract and backends for score records
//!
//! [`ScoreStore`] is the repository interface: insert, ranked +
//! paginated query, count, and retention-based eviction. The in-memory
//! [`MemoryStore`] is the only backend in this crate; persistent
//! backends would implement the same trait.

use chrono::{DateTime, Utc};

use super::record::{RetentionPolicy, ScoreRecord, ScoreSubmission};

mod memory;

pub use memory::MemoryStore;

/// One page of ranked query results
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    /// Records ordered by `(points DESC, created_at DESC)`
    pub items: Vec<ScoreRecord>,
    /// Offset token resuming after this page, when more records remain
    pub next_cursor: Option<String>,
}

/// Repository interface for score storage
///
/// Implementations own their records exclusively; mutation happens only
/// through `insert` and `evict`.
pub trait ScoreStore {
    /// Store a pre-validated submission: assign a fresh id, stamp
    /// `created_at = now`, default absent numeric fields to 0, and
    /// record the caller's suspect verdict. Infallible for a candidate
    /// that passed validation.
    fn insert(
        &mut self,
        submission: ScoreSubmission,
        suspect: bool,
        now: DateTime<Utc>,
    ) -> ScoreRecord;

    /// Ranked, paginated read.
    ///
    /// Filters to `created_at >= since` when given, sorts by
    /// `(points DESC, created_at DESC)` with a stable sort, then
    /// returns up to `limit` records starting at the cursor offset.
    /// An unparseable cursor reads from the start rather than erroring.
    fn query(
        &self,
        limit: usize,
        cursor: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> QueryPage;

    /// Total stored records.
    fn count(&self) -> usize;

    /// Apply the retention policy: a record is kept when it is among
    /// the `policy.max_records` most recently created OR younger than
    /// `policy.days`. Returns the number of records removed.
    fn evict(&mut self, policy: RetentionPolicy, now: DateTime<Utc>) -> usize;
}

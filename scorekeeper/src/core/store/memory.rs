//! In-memory score storage
//!
//! Records live in a `Vec` in insertion order; ranking happens at read
//! time over a snapshot of the matching records. The cursor is a plain
//! offset index rendered as a string, parsed leniently: anything that
//! is not a number means "start from the beginning".

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{QueryPage, ScoreStore};
use crate::core::record::{RetentionPolicy, ScoreRecord, ScoreSubmission};

/// Vec-backed store, the sole concrete [`ScoreStore`] in this crate
///
/// # Example
///
/// ```
/// use scorekeeper::{MemoryStore, ScoreStore, ScoreSubmission};
/// use chrono::Utc;
///
/// let mut store = MemoryStore::new();
/// let record = store.insert(
///     ScoreSubmission { nickname: "ada".into(), points: 900, ..Default::default() },
///     false,
///     Utc::now(),
/// );
/// assert_eq!(store.count(), 1);
/// assert_eq!(record.lines, 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<ScoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            records: Vec::new(),
        }
    }
}

fn parse_cursor(cursor: Option<&str>) -> usize {
    cursor.and_then(|c| c.parse().ok()).unwrap_or(0)
}

impl ScoreStore for MemoryStore {
    fn insert(
        &mut self,
        submission: ScoreSubmission,
        suspect: bool,
        now: DateTime<Utc>,
    ) -> ScoreRecord {
        let record = ScoreRecord {
            id: Uuid::new_v4().to_string(),
            nickname: submission.nickname,
            points: submission.points,
            lines: submission.lines.unwrap_or(0),
            level_reached: submission.level_reached.unwrap_or(0),
            duration_seconds: submission.duration_seconds.unwrap_or(0),
            seed: submission.seed,
            created_at: now,
            suspect,
            client: submission.client,
            tags: submission.tags.unwrap_or_default(),
        };
        self.records.push(record.clone());
        record
    }

    fn query(
        &self,
        limit: usize,
        cursor: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> QueryPage {
        let mut ranked: Vec<&ScoreRecord> = self
            .records
            .iter()
            .filter(|r| since.is_none_or(|s| r.created_at >= s))
            .collect();

        // Stable sort: records tying on both keys keep insertion order
        ranked.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.created_at.cmp(&a.created_at))
        });

        let start = parse_cursor(cursor).min(ranked.len());
        let end = start.saturating_add(limit).min(ranked.len());

        let items: Vec<ScoreRecord> = ranked[start..end].iter().map(|r| (*r).clone()).collect();
        let next_cursor = (end < ranked.len()).then(|| end.to_string());

        QueryPage { items, next_cursor }
    }

    fn count(&self) -> usize {
        self.records.len()
    }

    fn evict(&mut self, policy: RetentionPolicy, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(policy.days as i64);

        // Rank indices by recency to find the max_records most recent
        let mut by_recency: Vec<usize> = (0..self.records.len()).collect();
        by_recency.sort_by(|&a, &b| self.records[b].created_at.cmp(&self.records[a].created_at));

        let mut keep = vec![false; self.records.len()];
        for &idx in by_recency.iter().take(policy.max_records) {
            keep[idx] = true;
        }
        for (idx, record) in self.records.iter().enumerate() {
            if record.created_at >= cutoff {
                keep[idx] = true;
            }
        }

        let before = self.records.len();
        let mut kept = keep.iter();
        self.records.retain(|_| *kept.next().unwrap());
        before - self.records.len()
    }
}

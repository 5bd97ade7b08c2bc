//! Leaderboard actor: single owner of all mutable service state
//!
//! One task owns the rate limiter map and the score store, so bucket
//! creation, inserts, queries and eviction are serialized without
//! locks. Transports hold a cloneable [`LeaderboardHandle`] and talk to
//! the actor over an mpsc channel with oneshot replies.

use anyhow::Result;
use chrono::{DateTime, Utc};
use scorekeeper::{
    BatchError, BatchOutcome, Decision, MemoryStore, QueryPage, RateLimiter, RejectReason,
    RetentionPolicy, ScoreRecord, ScoreSubmission, SubmissionCoordinator,
};
use std::time::SystemTime;
use tokio::sync::{mpsc, oneshot};

use crate::config::LimiterConfig;

/// Message types for the leaderboard actor
pub enum LeaderboardMessage {
    /// Rate-limit admission check for one client identifier
    Throttle {
        client_id: String,
        cost: u32,
        now: SystemTime,
        response_tx: oneshot::Sender<Decision>,
    },
    /// Validate and store a single submission
    Submit {
        submission: ScoreSubmission,
        response_tx: oneshot::Sender<Result<ScoreRecord, RejectReason>>,
    },
    /// Validate and store a batch, aggregating per-item outcomes
    SubmitBatch {
        submissions: Vec<ScoreSubmission>,
        response_tx: oneshot::Sender<Result<BatchOutcome, BatchError>>,
    },
    /// Ranked, paginated read
    Query {
        limit: usize,
        cursor: Option<String>,
        since: Option<DateTime<Utc>>,
        response_tx: oneshot::Sender<QueryPage>,
    },
    /// Total stored records
    Count { response_tx: oneshot::Sender<usize> },
    /// Apply the retention policy; replies with the removed count
    Cleanup { response_tx: oneshot::Sender<usize> },
}

/// Handle to communicate with the leaderboard actor
#[derive(Clone)]
pub struct LeaderboardHandle {
    tx: mpsc::Sender<LeaderboardMessage>,
}

impl LeaderboardHandle {
    async fn send<T>(
        &self,
        msg: LeaderboardMessage,
        response_rx: oneshot::Receiver<T>,
    ) -> Result<T> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| anyhow::anyhow!("Leaderboard actor has shut down"))?;

        response_rx
            .await
            .map_err(|_| anyhow::anyhow!("Leaderboard actor dropped response channel"))
    }

    /// Check whether `client_id` may spend `cost` tokens now.
    pub async fn throttle(&self, client_id: String, cost: u32) -> Result<Decision> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(
            LeaderboardMessage::Throttle {
                client_id,
                cost,
                now: SystemTime::now(),
                response_tx,
            },
            response_rx,
        )
        .await
    }

    /// Submit one score.
    pub async fn submit(
        &self,
        submission: ScoreSubmission,
    ) -> Result<Result<ScoreRecord, RejectReason>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(
            LeaderboardMessage::Submit {
                submission,
                response_tx,
            },
            response_rx,
        )
        .await
    }

    /// Submit a batch of scores.
    pub async fn submit_batch(
        &self,
        submissions: Vec<ScoreSubmission>,
    ) -> Result<Result<BatchOutcome, BatchError>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(
            LeaderboardMessage::SubmitBatch {
                submissions,
                response_tx,
            },
            response_rx,
        )
        .await
    }

    /// Ranked page of scores.
    pub async fn query(
        &self,
        limit: usize,
        cursor: Option<String>,
        since: Option<DateTime<Utc>>,
    ) -> Result<QueryPage> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(
            LeaderboardMessage::Query {
                limit,
                cursor,
                since,
                response_tx,
            },
            response_rx,
        )
        .await
    }

    /// Total stored records.
    pub async fn count(&self) -> Result<usize> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(LeaderboardMessage::Count { response_tx }, response_rx)
            .await
    }

    /// Run retention eviction now. Returns the removed count.
    pub async fn cleanup(&self) -> Result<usize> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(LeaderboardMessage::Cleanup { response_tx }, response_rx)
            .await
    }
}

/// The leaderboard actor
pub struct LeaderboardActor;

impl LeaderboardActor {
    /// Spawn the actor task and return a handle to it.
    pub fn spawn(
        buffer_size: usize,
        limiter_config: LimiterConfig,
        retention: RetentionPolicy,
    ) -> LeaderboardHandle {
        let (tx, rx) = mpsc::channel(buffer_size);

        tokio::spawn(async move {
            let state = ActorState {
                coordinator: SubmissionCoordinator::new(MemoryStore::new()),
                limiter: RateLimiter::new(limiter_config.burst, limiter_config.refill_rate),
                retention,
            };
            run_actor(rx, state).await;
        });

        LeaderboardHandle { tx }
    }
}

struct ActorState {
    coordinator: SubmissionCoordinator<MemoryStore>,
    limiter: RateLimiter,
    retention: RetentionPolicy,
}

async fn run_actor(mut rx: mpsc::Receiver<LeaderboardMessage>, mut state: ActorState) {
    use scorekeeper::ScoreStore;

    while let Some(msg) = rx.recv().await {
        // Replies may fail if the requester timed out; that is fine
        match msg {
            LeaderboardMessage::Throttle {
                client_id,
                cost,
                now,
                response_tx,
            } => {
                let decision = state.limiter.admit(&client_id, cost, now);
                if !decision.allowed {
                    tracing::debug!(
                        client_id = %client_id,
                        retry_after = decision.retry_after,
                        "rate limited"
                    );
                }
                let _ = response_tx.send(decision);
            }
            LeaderboardMessage::Submit {
                submission,
                response_tx,
            } => {
                let result = state.coordinator.submit_one(submission, Utc::now());
                let _ = response_tx.send(result);
            }
            LeaderboardMessage::SubmitBatch {
                submissions,
                response_tx,
            } => {
                let result = state.coordinator.submit_batch(submissions, Utc::now());
                let _ = response_tx.send(result);
            }
            LeaderboardMessage::Query {
                limit,
                cursor,
                since,
                response_tx,
            } => {
                let page = state.coordinator.store().query(limit, cursor.as_deref(), since);
                let _ = response_tx.send(page);
            }
            LeaderboardMessage::Count { response_tx } => {
                let _ = response_tx.send(state.coordinator.store().count());
            }
            LeaderboardMessage::Cleanup { response_tx } => {
                let removed = state
                    .coordinator
                    .store_mut()
                    .evict(state.retention, Utc::now());
                if removed > 0 {
                    tracing::info!(removed, "retention cleanup evicted records");
                }
                let _ = response_tx.send(removed);
            }
        }
    }

    tracing::info!("Leaderboard actor shutting down");
}

//! HTTP/JSON transport
//!
//! # API Endpoints
//!
//! ## GET /scores
//!
//! Ranked page of scores, ordered by points descending then creation
//! time descending. Query parameters:
//!
//! - `limit`: page size, 1..=100 (default 10); out of range is a 422
//! - `cursor`: opaque resume token from a previous page
//! - `since`: ISO8601 timestamp; only records created at or after it
//!
//! ## POST /scores
//!
//! Submit one score. Returns `201` with the stored record, or `400`
//! with `{"detail": "<REASON_CODE>"}` on a business-rule rejection.
//!
//! ```json
//! {
//!   "nickname": "player_one",
//!   "points": 12400,
//!   "lines": 37,
//!   "durationSeconds": 412,
//!   "tags": ["sprint"]
//! }
//! ```
//!
//! ## POST /scores/bulk
//!
//! Submit up to 50 queued scores in one request. Items are validated
//! independently; the `207` response lists accepted records and
//! rejected items side by side. More than 50 items is a `413` and
//! nothing is stored.
//!
//! ## Rate limiting
//!
//! The three score routes share one token bucket per client address.
//! Exhausting it yields `429` with `Retry-After` (integer seconds,
//! rounded up) plus `X-RateLimit-Limit` / `X-RateLimit-Remaining`;
//! the same pair rides on successful responses.
//!
//! ## GET /healthz, GET /metrics
//!
//! Liveness ("OK") and Prometheus text metrics. Not rate limited.

use super::Transport;
use crate::actor::LeaderboardHandle;
use crate::error::{ApiError, int_header};
use crate::metrics::Metrics;
use crate::types::{ScoreBatchInput, ScoreBatchResult, ScoreWindow};
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use scorekeeper::{BatchError, Decision, RetentionPolicy, ScoreSubmission};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

const DEFAULT_PAGE_LIMIT: usize = 10;
const MAX_PAGE_LIMIT: usize = 100;

/// HTTP transport implementation
pub struct HttpTransport {
    addr: SocketAddr,
    retention: RetentionPolicy,
}

impl HttpTransport {
    pub fn new(host: &str, port: u16, retention: RetentionPolicy) -> Result<Self> {
        let addr = format!("{host}:{port}")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid HTTP bind address {host}:{port}: {e}"))?;
        Ok(Self { addr, retention })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn start(self, leaderboard: LeaderboardHandle, metrics: Arc<Metrics>) -> Result<()> {
        let app = router(leaderboard, metrics, self.retention);

        tracing::info!("HTTP server listening on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}

/// Build the service router. Split out from [`Transport::start`] so
/// tests can drive it without binding a socket.
pub fn router(
    leaderboard: LeaderboardHandle,
    metrics: Arc<Metrics>,
    retention: RetentionPolicy,
) -> Router {
    let state = Arc::new(AppState {
        leaderboard,
        metrics,
        retention,
    });

    Router::new()
        .route("/scores", get(list_scores).post(submit_score))
        .route("/scores/bulk", axum::routing::post(submit_scores_bulk))
        .route("/healthz", get(|| async { "OK" }))
        .route("/metrics", get(export_metrics))
        .with_state(state)
}

struct AppState {
    leaderboard: LeaderboardHandle,
    metrics: Arc<Metrics>,
    retention: RetentionPolicy,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<usize>,
    cursor: Option<String>,
    since: Option<DateTime<Utc>>,
}

/// Admit or reject the request against the caller's bucket. Must run
/// before any other work so denied requests cause no mutation.
async fn check_rate_limit(state: &AppState, addr: &SocketAddr) -> Result<Decision, ApiError> {
    let decision = state
        .leaderboard
        .throttle(addr.ip().to_string(), 1)
        .await
        .map_err(|e| {
            state.metrics.record_error();
            ApiError::Internal(e)
        })?;

    state.metrics.record_request(decision.allowed);
    if decision.allowed {
        Ok(decision)
    } else {
        Err(ApiError::RateLimited(decision))
    }
}

/// Attach the informational rate-limit headers to a response.
fn with_rate_headers(mut response: Response, decision: &Decision) -> Response {
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", int_header(decision.limit as u64));
    headers.insert(
        "x-ratelimit-remaining",
        int_header(decision.remaining.max(0) as u64),
    );
    headers.insert(
        "x-ratelimit-reset",
        int_header(decision.reset_after.ceil() as u64),
    );
    response
}

async fn list_scores(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let decision = check_rate_limit(&state, &addr).await?;

    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit < 1 || limit > MAX_PAGE_LIMIT {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }

    let page = state
        .leaderboard
        .query(limit, params.cursor, params.since)
        .await?;

    let window = ScoreWindow {
        generated_at: Utc::now(),
        retention: state.retention,
        next_cursor: page.next_cursor,
        items: page.items,
    };

    Ok(with_rate_headers(Json(window).into_response(), &decision))
}

async fn submit_score(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(submission): Json<ScoreSubmission>,
) -> Result<Response, ApiError> {
    let decision = check_rate_limit(&state, &addr).await?;

    match state.leaderboard.submit(submission).await? {
        Ok(record) => {
            state.metrics.record_submissions(1, 0);
            if let Ok(count) = state.leaderboard.count().await {
                state.metrics.update_stored_records(count);
            }
            let response = (StatusCode::CREATED, Json(record)).into_response();
            Ok(with_rate_headers(response, &decision))
        }
        Err(reason) => {
            state.metrics.record_submissions(0, 1);
            Err(ApiError::Rejected(reason))
        }
    }
}

async fn submit_scores_bulk(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(batch): Json<ScoreBatchInput>,
) -> Result<Response, ApiError> {
    let decision = check_rate_limit(&state, &addr).await?;

    if let Some(client_time) = batch.client_time {
        tracing::debug!(%client_time, items = batch.items.len(), "bulk upload");
    }

    match state.leaderboard.submit_batch(batch.items).await? {
        Ok(outcome) => {
            let result = ScoreBatchResult::from(outcome);
            state
                .metrics
                .record_submissions(result.accepted.len() as u64, result.rejected.len() as u64);
            if let Ok(count) = state.leaderboard.count().await {
                state.metrics.update_stored_records(count);
            }
            let response = (StatusCode::MULTI_STATUS, Json(result)).into_response();
            Ok(with_rate_headers(response, &decision))
        }
        Err(BatchError::TooLarge { .. }) => Err(ApiError::BatchTooLarge),
    }
}

async fn export_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.export_prometheus()
}

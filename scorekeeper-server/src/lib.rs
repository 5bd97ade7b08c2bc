//! # Scorekeeper Server
//!
//! A small leaderboard HTTP service. Clients submit gameplay results
//! (single or batched) and query a ranked, paginated, time-filterable
//! view of recent high scores. A per-client token bucket rate limiter
//! guards both paths.
//!
//! ## Quick Start
//!
//! ```bash
//! # Listen on the default 127.0.0.1:8080
//! scorekeeper
//!
//! # Custom bind address and a stricter rate limit
//! scorekeeper --http-host 0.0.0.0 --http-port 9090 --rate-limit-burst 10
//!
//! # List all environment variables
//! scorekeeper --list-env-vars
//! ```
//!
//! ## Configuration
//!
//! Every flag can also be set through a `SCOREKEEPER_`-prefixed
//! environment variable; CLI arguments take precedence:
//!
//! ```bash
//! export SCOREKEEPER_HTTP_PORT=9090
//! export SCOREKEEPER_RETENTION_DAYS=7
//! scorekeeper
//! ```
//!
//! ## API
//!
//! - `GET /scores?limit=&cursor=&since=`: ranked page of scores,
//!   ordered by points descending then creation time descending
//! - `POST /scores`: submit one score, `201` with the stored record
//! - `POST /scores/bulk`: submit up to 50 scores, `207` with accepted
//!   and rejected items side by side
//! - `GET /healthz`: liveness
//! - `GET /metrics`: Prometheus text metrics
//!
//! The three score routes share one token bucket per client address;
//! an exhausted bucket yields `429` with a `Retry-After` header.
//!
//! ## Architecture
//!
//! A single actor task owns all mutable state (the score store and the
//! rate limiter map); transports talk to it over a channel:
//!
//! ```text
//! ┌─────────────┐
//! │    HTTP     │
//! │  Transport  │
//! └──────┬──────┘
//!        │
//!  ┌─────▼──────┐      ┌──────────────┐
//!  │   Actor    │─────▶│ RateLimiter  │
//!  │ (owns all  │      ├──────────────┤
//!  │   state)   │─────▶│ MemoryStore  │
//!  └────────────┘      └──────────────┘
//! ```
//!
//! A timer task sends the actor a cleanup message at the configured
//! interval, evicting records that fall outside the retention policy.

pub mod actor;
pub mod config;
pub mod error;
pub mod metrics;
pub mod transport;
pub mod types;

//! Transport layer for the leaderboard service
//!
//! Transports accept client connections, parse protocol-specific
//! requests, forward them to the leaderboard actor, and send responses
//! back. HTTP/JSON is the only transport in this crate; all transports
//! would share the same actor state through [`LeaderboardHandle`].

pub mod http;


use crate::actor::LeaderboardHandle;
use crate::metrics::Metrics;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for transport implementations
#[async_trait]
pub trait Transport {
    /// Start the transport server.
    ///
    /// Binds to the configured address, accepts connections, and
    /// handles requests against the provided actor handle. Runs until
    /// an error occurs or the server shuts down.
    async fn start(self, leaderboard: LeaderboardHandle, metrics: Arc<Metrics>) -> Result<()>;
}

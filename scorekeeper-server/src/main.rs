mod actor;
mod config;
mod error;
mod metrics;
mod transport;
mod types;


use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use crate::actor::LeaderboardActor;
use crate::config::Config;
use crate::metrics::Metrics;
use crate::transport::{Transport, http::HttpTransport};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration from environment variables and CLI arguments
    let config = Config::from_env_and_args()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("scorekeeper={}", config.log_level).parse()?),
        )
        .init();

    let metrics = Arc::new(Metrics::new());

    // Spawn the actor that owns the score store and the rate limiter
    let leaderboard = LeaderboardActor::spawn(config.buffer_size, config.limiter, config.retention);

    // Retention cleanup on a timer; eviction runs through the actor so
    // it shares the mutation scheduling domain with inserts
    {
        let handle = leaderboard.clone();
        let metrics = metrics.clone();
        let interval = Duration::from_secs(config.cleanup_interval);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match handle.cleanup().await {
                    Ok(removed) => {
                        metrics.record_eviction(removed as u64);
                        if let Ok(count) = handle.count().await {
                            metrics.update_stored_records(count);
                        }
                    }
                    Err(e) => {
                        tracing::error!("retention cleanup failed: {}", e);
                        break;
                    }
                }
            }
        });
    }

    let mut transport_tasks = JoinSet::new();

    {
        let handle = leaderboard.clone();
        let metrics = metrics.clone();
        let host = config.http.host.clone();
        let port = config.http.port;
        let retention = config.retention;

        transport_tasks.spawn(async move {
            tracing::info!("Starting HTTP transport on {}:{}", host, port);
            let transport = HttpTransport::new(&host, port, retention)?;
            transport.start(handle, metrics).await
        });
    }

    tracing::info!(
        "Scorekeeper started: retention {} days / {} records, rate limit {} burst at {}/s",
        config.retention.days,
        config.retention.max_records,
        config.limiter.burst,
        config.limiter.refill_rate
    );

    // Wait for transport tasks to complete (they run indefinitely)
    while let Some(result) = transport_tasks.join_next().await {
        match result {
            Ok(Ok(())) => {
                tracing::info!("Transport task completed");
            }
            Ok(Err(e)) => {
                tracing::error!("Transport task failed: {}", e);
                return Err(e);
            }
            Err(e) => {
                tracing::error!("Transport task panicked: {}", e);
                return Err(anyhow::anyhow!("Transport task panicked"));
            }
        }
    }

    Ok(())
}

//! Server configuration and CLI argument parsing
//!
//! Configuration comes from command-line arguments with environment
//! variable fallback (`SCOREKEEPER_` prefix), in this precedence order:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Default values (lowest priority)
//!
//! # Example
//!
//! ```bash
//! # Using CLI arguments
//! scorekeeper --http-port 9090 --retention-days 7
//!
//! # Using environment variables
//! export SCOREKEEPER_HTTP_PORT=9090
//! export SCOREKEEPER_RETENTION_DAYS=7
//! scorekeeper
//!
//! # Mixed (CLI overrides env)
//! export SCOREKEEPER_HTTP_PORT=8080
//! scorekeeper --http-port 9090   # Uses port 9090
//! ```

use anyhow::{Result, anyhow};
use clap::Parser;
use scorekeeper::RetentionPolicy;

/// Main configuration structure for the server
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP transport configuration
    pub http: HttpConfig,
    /// Rate limiter configuration shared by all score routes
    pub limiter: LimiterConfig,
    /// Retention policy applied by the periodic cleanup task
    pub retention: RetentionPolicy,
    /// Seconds between cleanup runs
    pub cleanup_interval: u64,
    /// Channel buffer size for actor communication
    pub buffer_size: usize,
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

/// Token bucket parameters applied per client identifier
#[derive(Debug, Clone, Copy)]
pub struct LimiterConfig {
    /// Bucket capacity (requests admitted back to back)
    pub burst: u32,
    /// Refill rate in tokens per second
    pub refill_rate: f64,
}

/// Command-line arguments for the server
///
/// All arguments can also be set via environment variables with the
/// SCOREKEEPER_ prefix. CLI arguments take precedence.
#[derive(Parser, Debug)]
#[command(
    name = "scorekeeper",
    about = "Leaderboard HTTP service with per-client rate limiting",
    long_about = "A small leaderboard service: rate-limited score submission (single and bulk) and ranked, paginated queries.\n\nEnvironment variables with SCOREKEEPER_ prefix are supported. CLI arguments take precedence over environment variables."
)]
pub struct Args {
    // HTTP transport
    #[arg(
        long,
        value_name = "HOST",
        help = "HTTP host",
        default_value = "127.0.0.1",
        env = "SCOREKEEPER_HTTP_HOST"
    )]
    pub http_host: String,
    #[arg(
        long,
        value_name = "PORT",
        help = "HTTP port",
        default_value_t = 8080,
        env = "SCOREKEEPER_HTTP_PORT"
    )]
    pub http_port: u16,

    // Rate limiting
    #[arg(
        long,
        value_name = "N",
        help = "Token bucket capacity per client",
        default_value_t = 30,
        env = "SCOREKEEPER_RATE_LIMIT_BURST"
    )]
    pub rate_limit_burst: u32,
    #[arg(
        long,
        value_name = "RATE",
        help = "Token refill rate per client (tokens/second)",
        default_value_t = 0.5,
        env = "SCOREKEEPER_RATE_LIMIT_REFILL"
    )]
    pub rate_limit_refill: f64,

    // Retention
    #[arg(
        long,
        value_name = "DAYS",
        help = "Days a record survives eviction regardless of rank",
        default_value_t = 14,
        env = "SCOREKEEPER_RETENTION_DAYS"
    )]
    pub retention_days: u32,
    #[arg(
        long,
        value_name = "N",
        help = "Most-recent records kept regardless of age",
        default_value_t = 100,
        env = "SCOREKEEPER_RETENTION_MAX_RECORDS"
    )]
    pub retention_max_records: usize,
    #[arg(
        long,
        value_name = "SECS",
        help = "Interval between retention cleanup runs",
        default_value_t = 3600,
        env = "SCOREKEEPER_CLEANUP_INTERVAL"
    )]
    pub cleanup_interval: u64,

    // General options
    #[arg(
        long,
        value_name = "SIZE",
        help = "Channel buffer size",
        default_value_t = 1024,
        env = "SCOREKEEPER_BUFFER_SIZE"
    )]
    pub buffer_size: usize,
    #[arg(
        long,
        value_name = "LEVEL",
        help = "Log level: error, warn, info, debug, trace",
        default_value = "info",
        env = "SCOREKEEPER_LOG_LEVEL"
    )]
    pub log_level: String,

    // Utility options
    #[arg(
        long,
        help = "List all environment variables and exit",
        action = clap::ArgAction::SetTrue
    )]
    pub list_env_vars: bool,
}

impl Config {
    /// Build configuration from environment variables and CLI arguments.
    ///
    /// Clap resolves the precedence (CLI > env > default); this method
    /// handles `--list-env-vars` and validates the result.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();

        if args.list_env_vars {
            Self::print_env_vars();
            std::process::exit(0);
        }

        let config = Self::from_args(args);
        config.validate()?;
        Ok(config)
    }

    fn from_args(args: Args) -> Self {
        Config {
            http: HttpConfig {
                host: args.http_host,
                port: args.http_port,
            },
            limiter: LimiterConfig {
                burst: args.rate_limit_burst,
                refill_rate: args.rate_limit_refill,
            },
            retention: RetentionPolicy::new(args.retention_days, args.retention_max_records),
            cleanup_interval: args.cleanup_interval,
            buffer_size: args.buffer_size,
            log_level: args.log_level,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when rate limiter or retention parameters are
    /// non-positive, since both components require positive values.
    fn validate(&self) -> Result<()> {
        if self.limiter.burst == 0 {
            return Err(anyhow!("--rate-limit-burst must be at least 1"));
        }
        if !(self.limiter.refill_rate > 0.0) {
            return Err(anyhow!("--rate-limit-refill must be positive"));
        }
        if self.retention.days == 0 {
            return Err(anyhow!("--retention-days must be at least 1"));
        }
        if self.retention.max_records == 0 {
            return Err(anyhow!("--retention-max-records must be at least 1"));
        }
        if self.cleanup_interval == 0 {
            return Err(anyhow!("--cleanup-interval must be at least 1 second"));
        }
        if self.buffer_size == 0 {
            return Err(anyhow!("--buffer-size must be at least 1"));
        }
        Ok(())
    }

    fn print_env_vars() {
        println!("Environment variables (CLI arguments take precedence):");
        println!();
        println!("  SCOREKEEPER_HTTP_HOST               HTTP host (default: 127.0.0.1)");
        println!("  SCOREKEEPER_HTTP_PORT               HTTP port (default: 8080)");
        println!("  SCOREKEEPER_RATE_LIMIT_BURST        Token bucket capacity (default: 30)");
        println!("  SCOREKEEPER_RATE_LIMIT_REFILL       Tokens per second (default: 0.5)");
        println!("  SCOREKEEPER_RETENTION_DAYS          Retention age window (default: 14)");
        println!("  SCOREKEEPER_RETENTION_MAX_RECORDS   Retention recency rank (default: 100)");
        println!("  SCOREKEEPER_CLEANUP_INTERVAL        Seconds between cleanups (default: 3600)");
        println!("  SCOREKEEPER_BUFFER_SIZE             Actor channel buffer (default: 1024)");
        println!("  SCOREKEEPER_LOG_LEVEL               Log level (default: info)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_defaults() -> Args {
        Args::parse_from(["scorekeeper"])
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::from_args(args_with_defaults());
        assert!(config.validate().is_ok());
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.limiter.burst, 30);
        assert_eq!(config.retention.days, 14);
        assert_eq!(config.retention.max_records, 100);
    }

    #[test]
    fn cli_overrides_defaults() {
        let args = Args::parse_from([
            "scorekeeper",
            "--http-port",
            "9090",
            "--rate-limit-burst",
            "5",
            "--retention-days",
            "7",
        ]);
        let config = Config::from_args(args);
        assert_eq!(config.http.port, 9090);
        assert_eq!(config.limiter.burst, 5);
        assert_eq!(config.retention.days, 7);
    }

    #[test]
    fn zero_burst_is_rejected() {
        let mut config = Config::from_args(args_with_defaults());
        config.limiter.burst = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_refill_is_rejected() {
        let mut config = Config::from_args(args_with_defaults());
        config.limiter.refill_rate = 0.0;
        assert!(config.validate().is_err());
        config.limiter.refill_rate = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_retention_values_are_rejected() {
        let mut config = Config::from_args(args_with_defaults());
        config.retention.days = 0;
        assert!(config.validate().is_err());

        let mut config = Config::from_args(args_with_defaults());
        config.retention.max_records = 0;
        assert!(config.validate().is_err());
    }
}

//! Simple metrics collection for observability
//!
//! Lightweight atomic counters with a Prometheus text exporter.
//! Designed for minimal overhead in the request path.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Core metrics collected by the server
pub struct Metrics {
    /// Server start time
    start_time: Instant,

    /// Total HTTP requests received on score routes
    pub requests_total: AtomicU64,

    /// Rate limiting decisions
    pub requests_allowed: AtomicU64,
    pub requests_denied: AtomicU64,

    /// Submission outcomes (single and bulk items combined)
    pub submissions_accepted: AtomicU64,
    pub submissions_rejected: AtomicU64,

    /// Internal failures surfaced as 500s
    pub internal_errors: AtomicU64,

    /// Stored record count after the most recent write or cleanup
    pub stored_records: AtomicUsize,

    /// Records removed by retention cleanup since start
    pub records_evicted: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            requests_total: AtomicU64::new(0),
            requests_allowed: AtomicU64::new(0),
            requests_denied: AtomicU64::new(0),
            submissions_accepted: AtomicU64::new(0),
            submissions_rejected: AtomicU64::new(0),
            internal_errors: AtomicU64::new(0),
            stored_records: AtomicUsize::new(0),
            records_evicted: AtomicU64::new(0),
        }
    }

    /// Record a rate-limit decision on a score route.
    pub fn record_request(&self, allowed: bool) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if allowed {
            self.requests_allowed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_denied.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record submission outcomes from a single or bulk request.
    pub fn record_submissions(&self, accepted: u64, rejected: u64) {
        self.submissions_accepted
            .fetch_add(accepted, Ordering::Relaxed);
        self.submissions_rejected
            .fetch_add(rejected, Ordering::Relaxed);
    }

    /// Record an internal error.
    pub fn record_error(&self) {
        self.internal_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Update the stored record gauge.
    pub fn update_stored_records(&self, count: usize) {
        self.stored_records.store(count, Ordering::Relaxed);
    }

    /// Record a cleanup pass.
    pub fn record_eviction(&self, removed: u64) {
        self.records_evicted.fetch_add(removed, Ordering::Relaxed);
    }

    /// Get server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics in Prometheus text format.
    pub fn export_prometheus(&self) -> String {
        let mut output = String::with_capacity(1024);

        output.push_str("# HELP scorekeeper_uptime_seconds Time since server start in seconds\n");
        output.push_str("# TYPE scorekeeper_uptime_seconds gauge\n");
        output.push_str(&format!(
            "scorekeeper_uptime_seconds {}\n\n",
            self.uptime_seconds()
        ));

        output.push_str("# HELP scorekeeper_requests_total Requests on rate-limited routes\n");
        output.push_str("# TYPE scorekeeper_requests_total counter\n");
        output.push_str(&format!(
            "scorekeeper_requests_total {}\n\n",
            self.requests_total.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP scorekeeper_requests_allowed Requests admitted by the limiter\n");
        output.push_str("# TYPE scorekeeper_requests_allowed counter\n");
        output.push_str(&format!(
            "scorekeeper_requests_allowed {}\n\n",
            self.requests_allowed.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP scorekeeper_requests_denied Requests rejected with 429\n");
        output.push_str("# TYPE scorekeeper_requests_denied counter\n");
        output.push_str(&format!(
            "scorekeeper_requests_denied {}\n\n",
            self.requests_denied.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP scorekeeper_submissions_accepted Score submissions stored\n");
        output.push_str("# TYPE scorekeeper_submissions_accepted counter\n");
        output.push_str(&format!(
            "scorekeeper_submissions_accepted {}\n\n",
            self.submissions_accepted.load(Ordering::Relaxed)
        ));

        output.push_str(
            "# HELP scorekeeper_submissions_rejected Score submissions failing validation\n",
        );
        output.push_str("# TYPE scorekeeper_submissions_rejected counter\n");
        output.push_str(&format!(
            "scorekeeper_submissions_rejected {}\n\n",
            self.submissions_rejected.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP scorekeeper_internal_errors Requests failing with 500\n");
        output.push_str("# TYPE scorekeeper_internal_errors counter\n");
        output.push_str(&format!(
            "scorekeeper_internal_errors {}\n\n",
            self.internal_errors.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP scorekeeper_stored_records Records currently stored\n");
        output.push_str("# TYPE scorekeeper_stored_records gauge\n");
        output.push_str(&format!(
            "scorekeeper_stored_records {}\n\n",
            self.stored_records.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP scorekeeper_records_evicted Records removed by retention cleanup\n");
        output.push_str("# TYPE scorekeeper_records_evicted counter\n");
        output.push_str(&format!(
            "scorekeeper_records_evicted {}\n",
            self.records_evicted.load(Ordering::Relaxed)
        ));

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

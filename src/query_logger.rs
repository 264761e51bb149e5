use std::time::Duration;

/// Collaborator notified after every database round trip.
///
/// Installed by [`ArchiveStore::connect`](crate::ArchiveStore::connect) when
/// the debug flag is set, or injected explicitly to route query timings into
/// another tracing system.
pub trait QueryObserver: Send + Sync {
    fn record(&self, statement: &str, params: &[&str], elapsed: Duration);
}

/// Default observer: one `log::debug!` line per query with timing.
pub struct LogQueryObserver;

impl QueryObserver for LogQueryObserver {
    fn record(&self, statement: &str, params: &[&str], elapsed: Duration) {
        log::debug!(
            "{} [{}] ({:.2}ms)",
            statement,
            params.join(", "),
            elapsed.as_secs_f64() * 1000.0
        );
    }
}

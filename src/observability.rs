//! Process-wide counters for resolve traffic

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    urls_received: AtomicU64,
    urls_resolved: AtomicU64,
    urls_unhandled: AtomicU64,
    handler_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url_received(&self) {
        self.urls_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn url_resolved(&self) {
        self.urls_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn url_unhandled(&self) {
        self.urls_unhandled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn handler_failures(&self, count: u64) {
        self.handler_failures.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            urls_received: self.urls_received.load(Ordering::Relaxed),
            urls_resolved: self.urls_resolved.load(Ordering::Relaxed),
            urls_unhandled: self.urls_unhandled.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub urls_received: u64,
    pub urls_resolved: u64,
    pub urls_unhandled: u64,
    pub handler_failures: u64,
}

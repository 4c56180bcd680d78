//! Language store metrics.
//!
//! Counts how bundles were resolved and how often the store published and
//! persisted a language, so a host can report on lazy-loading behaviour.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters owned by one [`I18nStore`](crate::i18n::I18nStore).
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Resolutions served by the embedded default bundle (no load)
    default_resolutions: AtomicUsize,

    /// Calls made to the bundle loader
    loads: AtomicUsize,

    /// Loader calls that failed
    load_failures: AtomicUsize,

    /// Bundles published to subscribers
    publishes: AtomicUsize,

    /// Writes of the language preference
    persists: AtomicUsize,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_default_resolution(&self) {
        self.default_resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_publish(&self) {
        self.publishes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persist(&self) {
        self.persists.fetch_add(1, Ordering::Relaxed);
    }

    pub fn default_resolutions(&self) -> usize {
        self.default_resolutions.load(Ordering::Relaxed)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn load_failures(&self) -> usize {
        self.load_failures.load(Ordering::Relaxed)
    }

    pub fn publishes(&self) -> usize {
        self.publishes.load(Ordering::Relaxed)
    }

    pub fn persists(&self) -> usize {
        self.persists.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let loads = self.loads();
        let failures = self.load_failures();
        let load_success_rate = if loads > 0 {
            (loads.saturating_sub(failures) as f64 / loads as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            default_resolutions: self.default_resolutions(),
            loads,
            load_failures: failures,
            load_success_rate,
            publishes: self.publishes(),
            persists: self.persists(),
        }
    }
}

/// Snapshot of the store counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub default_resolutions: usize,
    pub loads: usize,
    pub load_failures: usize,

    /// Loader success rate as a percentage (0-100)
    pub load_success_rate: f64,

    pub publishes: usize,
    pub persists: usize,
}

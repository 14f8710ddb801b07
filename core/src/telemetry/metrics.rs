use serde::Serialize;
use std::sync::Mutex;

/// Counters reported on the health endpoint.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub views_rendered: usize,
    pub load_failures: usize,
    pub map_failures: usize,
    pub login_failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_view(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.views_rendered += 1;
        }
    }

    pub fn record_load_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.load_failures += 1;
        }
    }

    pub fn record_map_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.map_failures += 1;
        }
    }

    pub fn record_login_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.login_failures += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

//! Process-wide request counters.
//!
//! [`Metrics`] is created once at startup and handed to the middleware that
//! updates it, so nothing reaches for a global. Every update is also
//! recorded through the `metrics` facade, which the Prometheus exporter on
//! the debug listener renders.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Context;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;

/// How often the alive-task count is sampled, in requests.
pub const TASK_SAMPLE_INTERVAL: u64 = 100;

#[derive(Debug, Default)]
pub struct Metrics {
    requests: AtomicU64,
    errors: AtomicU64,
    panics: AtomicU64,
    tasks: AtomicU64,
}

/// Point-in-time copy of the counters, served on `/debug/vars`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub errors: u64,
    pub panics: u64,
    pub tasks: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a request and returns the new total.
    pub fn add_request(&self) -> u64 {
        counter!("sales_requests_total").increment(1);
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add_error(&self) -> u64 {
        counter!("sales_errors_total").increment(1);
        self.errors.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add_panic(&self) -> u64 {
        counter!("sales_panics_total").increment(1);
        self.panics.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn set_tasks(&self, tasks: u64) {
        gauge!("sales_tasks").set(tasks as f64);
        self.tasks.store(tasks, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn panics(&self) -> u64 {
        self.panics.load(Ordering::Relaxed)
    }

    pub fn tasks(&self) -> u64 {
        self.tasks.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            errors: self.errors(),
            panics: self.panics(),
            tasks: self.tasks(),
        }
    }
}

/// Installs the Prometheus recorder and spawns its upkeep task.
///
/// The recorder is process-global; call this once, from `main`.
pub fn init_prometheus() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("installing prometheus recorder")?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep.run_upkeep();
        }
    });

    Ok(handle)
}

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-lifetime monitoring counters. Updated atomically from the loop
/// task, read from wherever the caller wants observability.
#[derive(Debug, Default)]
pub struct MonitorStats {
    cycles_completed: AtomicU64,
    cycles_skipped: AtomicU64,
    touched_cycles: AtomicU64,
    alert_episodes: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub cycles_completed: u64,
    pub cycles_skipped: u64,
    pub touched_cycles: u64,
    pub alert_episodes: u64,
}

impl MonitorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&self, touched: bool) {
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
        if touched {
            self.touched_cycles.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A cycle abandoned on error or watchdog timeout.
    pub fn record_skip(&self) {
        self.cycles_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_episode(&self) {
        self.alert_episodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            cycles_skipped: self.cycles_skipped.load(Ordering::Relaxed),
            touched_cycles: self.touched_cycles.load(Ordering::Relaxed),
            alert_episodes: self.alert_episodes.load(Ordering::Relaxed),
        }
    }
}

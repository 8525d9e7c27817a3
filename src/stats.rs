use lazy_static::lazy_static;
use metrics::{counter, gauge, histogram};
use std::sync::atomic::{AtomicI64, Ordering};

lazy_static! {
    pub static ref GLOBAL_STATS: Stats = Stats::new();
}

/// Lifetime metrics of every updater in the process.
///
/// Handles are resolved on each call so they go to the recorder installed at
/// that point, not the one present when the first updater was built.
pub struct Stats {
    // Count of live updaters. Kept in an atomic since some metrics exporters
    // don't support incrementing gauges (e.g. statsd)
    live_updaters: AtomicI64,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            live_updaters: AtomicI64::new(0),
        }
    }

    pub fn record_updater_created(&self, number_of_rules: usize) {
        counter!("updater.creations").increment(1);
        histogram!("updater.num_rules").record(number_of_rules as f64);
        self.update_live_updaters(1);
    }

    pub fn record_updater_dropped(&self) {
        counter!("updater.deletions").increment(1);
        self.update_live_updaters(-1);
    }

    fn update_live_updaters(&self, delta: i64) {
        let prev_value = self.live_updaters.fetch_add(delta, Ordering::SeqCst);
        gauge!("updater.total_count").set((prev_value + delta) as f64);
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

use serde::Serialize;

use super::metrics::{MemoryStats, RawCounterSet};
use super::process::ProcessInfo;

/// Everything the console needs to draw one frame.
///
/// Each figure was read from its own kernel source at a slightly different
/// instant, so the values are close but not mutually consistent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SystemSnapshot {
    pub operating_system: String,
    pub kernel: String,
    pub uptime_seconds: u64,
    pub total_processes: u64,
    pub running_processes: u64,
    /// Mean of the per-core single-sample utilizations.
    pub cpu_utilization: f64,
    pub cpu_counters: RawCounterSet,
    pub memory: MemoryStats,
    pub memory_utilization: f64,
    /// Sorted by descending CPU share.
    pub processes: Vec<ProcessInfo>,
}

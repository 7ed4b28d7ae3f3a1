//! Raw kernel counters and the arithmetic that turns them into rates.
//!
//! Everything here is pure: the reader produces the structs, this module
//! never touches the filesystem.

use serde::Serialize;

/// The eight jiffy counters of a `cpu`/`cpuN` line in `/proc/stat`, in
/// kernel order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RawCounterSet {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl RawCounterSet {
    /// Parses the counters that follow the `cpu` label. Older kernels print
    /// fewer than eight columns; the missing tail reads as zero. A token that
    /// is not an integer makes the whole line unusable.
    pub fn from_fields<'a, I>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values = [0u64; 8];
        let mut tokens = fields.into_iter();
        for slot in &mut values {
            match tokens.next() {
                Some(token) => *slot = token.parse().ok()?,
                None => break,
            }
        }
        let [user, nice, system, idle, iowait, irq, softirq, steal] = values;
        Some(Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
        })
    }

    /// user + nice + system + irq + softirq + steal
    pub fn active_jiffies(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
            .saturating_add(self.steal)
    }

    /// idle + iowait
    pub fn idle_jiffies(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn total_jiffies(&self) -> u64 {
        self.active_jiffies().saturating_add(self.idle_jiffies())
    }

    /// Share of jiffies spent busy since boot. This is a single-sample ratio,
    /// not an instantaneous load figure.
    pub fn utilization(&self) -> f64 {
        ratio(self.active_jiffies(), self.total_jiffies())
    }

    /// Busy share of the jiffies that elapsed between `previous` and `self`.
    pub fn utilization_since(&self, previous: &RawCounterSet) -> f64 {
        let total = self
            .total_jiffies()
            .saturating_sub(previous.total_jiffies());
        let active = self
            .active_jiffies()
            .saturating_sub(previous.active_jiffies());
        ratio(active, total)
    }
}

/// `MemTotal` and `MemAvailable` from `/proc/meminfo`, in kilobytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub total_kb: u64,
    pub available_kb: u64,
}

impl MemoryStats {
    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.available_kb)
    }

    /// (total - available) / total, or 0 when the total is unknown.
    pub fn utilization(&self) -> f64 {
        ratio(self.used_kb(), self.total_kb)
    }
}

/// The timing fields of `/proc/<pid>/stat`, all in clock ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProcessCpuFields {
    pub utime: u64,
    pub stime: u64,
    pub starttime: u64,
}

impl ProcessCpuFields {
    pub fn busy_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }
}

/// Lifetime-average CPU share of a process: CPU seconds consumed divided by
/// seconds elapsed since it started. Returns 0 whenever the age is not
/// positive or the tick rate is unknown.
pub fn process_cpu_utilization(
    fields: &ProcessCpuFields,
    system_uptime: f64,
    clock_ticks: u64,
) -> f64 {
    if clock_ticks == 0 {
        return 0.0;
    }
    let ticks = clock_ticks as f64;
    let busy_seconds = fields.busy_ticks() as f64 / ticks;
    let age = system_uptime - fields.starttime as f64 / ticks;
    if age > 0.0 && age.is_finite() {
        busy_seconds / age
    } else {
        0.0
    }
}

/// Mean of the per-core fractions; 0 when no core was sampled.
pub fn system_cpu_utilization(core_utilizations: &[f64]) -> f64 {
    if core_utilizations.is_empty() {
        return 0.0;
    }
    core_utilizations.iter().sum::<f64>() / core_utilizations.len() as f64
}

pub fn kb_to_mb(kb: u64) -> u64 {
    kb / 1024
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

use std::cell::OnceCell;
use std::cmp::Ordering;

use serde::Serialize;

use super::reader::ProcReader;

/// One row of the process table, sampled at refresh time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub user: String,
    pub command: String,
    pub ram_mb: u64,
    /// Lifetime-average share of one CPU, as a fraction.
    pub cpu_utilization: f64,
    pub age_seconds: u64,
}

/// A live handle on one PID.
///
/// Command line and owner are resolved once, on the first read that yields
/// a non-empty value, and never re-read. CPU share, memory and age go back
/// to the kernel on every call.
#[derive(Debug)]
pub struct Process {
    pid: u32,
    command: OnceCell<String>,
    user: OnceCell<String>,
}

impl Process {
    pub fn new(pid: u32) -> Self {
        Process {
            pid,
            command: OnceCell::new(),
            user: OnceCell::new(),
        }
    }

    /// Builds the entity and resolves its identity fields up front.
    pub fn resolve(pid: u32, reader: &ProcReader) -> Self {
        let process = Self::new(pid);
        process.command(reader);
        process.user(reader);
        process
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn command(&self, reader: &ProcReader) -> &str {
        memoize(&self.command, || reader.process_command(self.pid))
    }

    pub fn user(&self, reader: &ProcReader) -> &str {
        memoize(&self.user, || reader.process_user(self.pid))
    }

    pub fn ram_mb(&self, reader: &ProcReader) -> u64 {
        reader.process_ram_mb(self.pid)
    }

    pub fn cpu_utilization(&self, reader: &ProcReader) -> f64 {
        reader.process_cpu_utilization(self.pid)
    }

    pub fn age_seconds(&self, reader: &ProcReader) -> u64 {
        reader.process_uptime_seconds(self.pid)
    }

    pub fn sample(&self, reader: &ProcReader) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            user: self.user(reader).to_string(),
            command: self.command(reader).to_string(),
            ram_mb: self.ram_mb(reader),
            cpu_utilization: self.cpu_utilization(reader),
            age_seconds: self.age_seconds(reader),
        }
    }
}

fn memoize<'a>(cell: &'a OnceCell<String>, load: impl FnOnce() -> String) -> &'a str {
    if let Some(value) = cell.get() {
        return value;
    }
    let value = load();
    if value.is_empty() {
        return "";
    }
    cell.get_or_init(|| value)
}

/// Display order: higher CPU share first.
pub fn cpu_descending(a: &ProcessInfo, b: &ProcessInfo) -> Ordering {
    b.cpu_utilization.total_cmp(&a.cpu_utilization)
}

/// Stable sort by [`cpu_descending`]; equal shares keep their input order.
pub fn sort_by_cpu(rows: &mut [ProcessInfo]) {
    rows.sort_by(cpu_descending);
}

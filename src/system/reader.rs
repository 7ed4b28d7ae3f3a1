//! Line-oriented parsers for the kernel's pseudo-files.
//!
//! This is the only module that opens `/proc`, the os-release file or the
//! passwd database. Every operation is infallible from the caller's point of
//! view: the kernel process table changes underneath us, so a missing file,
//! a permission error or a truncated record degrades to the type's zero
//! value instead of an error.

use std::fs;
use std::path::{Path, PathBuf};

use super::metrics::{self, MemoryStats, ProcessCpuFields, RawCounterSet};
use super::platform;

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";
pub const DEFAULT_PASSWD: &str = "/etc/passwd";

// 0-based positions in a whitespace split of /proc/<pid>/stat
const STAT_UTIME: usize = 13;
const STAT_STIME: usize = 14;
const STAT_STARTTIME: usize = 21;

#[derive(Clone, Debug)]
pub struct ProcReader {
    proc_root: PathBuf,
    os_release: PathBuf,
    passwd: PathBuf,
    clock_ticks: u64,
}

impl Default for ProcReader {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcReader {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        ProcReader {
            proc_root: proc_root.into(),
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
            passwd: PathBuf::from(DEFAULT_PASSWD),
            clock_ticks: platform::clock_ticks_per_second(),
        }
    }

    pub fn with_os_release(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_release = path.into();
        self
    }

    pub fn with_passwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.passwd = path.into();
        self
    }

    /// Overrides the detected tick rate. A rate of 0 is ignored.
    pub fn with_clock_ticks(mut self, ticks: u64) -> Self {
        if ticks > 0 {
            self.clock_ticks = ticks;
        }
        self
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    /// `comm` and argv may hold arbitrary bytes, so sources are decoded
    /// lossily rather than rejected.
    fn read(&self, path: &Path) -> Option<String> {
        let bytes = fs::read(path).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_proc(&self, file: &str) -> Option<String> {
        self.read(&self.proc_root.join(file))
    }

    fn read_pid(&self, pid: u32, file: &str) -> Option<String> {
        self.read(&self.proc_root.join(pid.to_string()).join(file))
    }

    /// `PRETTY_NAME` from os-release with quoting removed. Underscores in the
    /// value come back as spaces.
    pub fn operating_system_name(&self) -> String {
        self.read(&self.os_release)
            .and_then(|contents| parse_pretty_name(&contents))
            .unwrap_or_default()
    }

    /// Third token of the first line of `/proc/version`.
    pub fn kernel_version(&self) -> String {
        self.read_proc("version")
            .and_then(|contents| {
                let first = contents.lines().next()?;
                first.split_whitespace().nth(2).map(str::to_string)
            })
            .unwrap_or_default()
    }

    /// Numeric directory names under the proc root, in directory order.
    pub fn process_ids(&self) -> Vec<u32> {
        #[cfg(feature = "perf-tracing")]
        let _span = tracing::debug_span!("reader.process_ids").entered();

        let Ok(entries) = fs::read_dir(&self.proc_root) else {
            return Vec::new();
        };
        entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| parse_pid(&entry.file_name().to_string_lossy()))
            .collect()
    }

    /// Counters of the aggregate `cpu` line.
    pub fn cpu_raw_counters(&self) -> RawCounterSet {
        self.read_proc("stat")
            .and_then(|contents| {
                contents.lines().find_map(|line| {
                    let mut tokens = line.split_whitespace();
                    if tokens.next() != Some("cpu") {
                        return None;
                    }
                    RawCounterSet::from_fields(tokens)
                })
            })
            .unwrap_or_default()
    }

    /// Single-sample utilization of every `cpuN` line, in file order.
    pub fn cpu_core_utilizations(&self) -> Vec<f64> {
        let Some(contents) = self.read_proc("stat") else {
            return Vec::new();
        };
        contents
            .lines()
            .filter_map(|line| {
                let mut tokens = line.split_whitespace();
                let label = tokens.next()?;
                let core = label.strip_prefix("cpu")?;
                if core.is_empty() {
                    return None;
                }
                RawCounterSet::from_fields(tokens).map(|c| c.utilization())
            })
            .collect()
    }

    pub fn memory_stats(&self) -> MemoryStats {
        let Some(contents) = self.read_proc("meminfo") else {
            return MemoryStats::default();
        };
        MemoryStats {
            total_kb: keyed_number(&contents, "MemTotal:").unwrap_or(0),
            available_kb: keyed_number(&contents, "MemAvailable:").unwrap_or(0),
        }
    }

    /// Seconds since boot, first field of `/proc/uptime`.
    pub fn uptime(&self) -> f64 {
        self.read_proc("uptime")
            .and_then(|contents| contents.split_whitespace().next()?.parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .unwrap_or(0.0)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.uptime() as u64
    }

    /// The `processes` line of `/proc/stat` (forks since boot).
    pub fn total_processes(&self) -> u64 {
        self.read_proc("stat")
            .and_then(|contents| keyed_number(&contents, "processes"))
            .unwrap_or(0)
    }

    pub fn running_processes(&self) -> u64 {
        self.read_proc("stat")
            .and_then(|contents| keyed_number(&contents, "procs_running"))
            .unwrap_or(0)
    }

    /// Full command line; argv separators become spaces. Kernel threads have
    /// an empty command line.
    pub fn process_command(&self, pid: u32) -> String {
        self.read_pid(pid, "cmdline")
            .map(|raw| {
                raw.trim_end_matches(['\0', '\n'])
                    .replace('\0', " ")
            })
            .unwrap_or_default()
    }

    /// `VmSize` from `/proc/<pid>/status`, in kilobytes.
    pub fn process_vm_size_kb(&self, pid: u32) -> u64 {
        self.read_pid(pid, "status")
            .and_then(|contents| keyed_number(&contents, "VmSize:"))
            .unwrap_or(0)
    }

    pub fn process_ram_mb(&self, pid: u32) -> u64 {
        metrics::kb_to_mb(self.process_vm_size_kb(pid))
    }

    /// Real UID from the `Uid:` line.
    pub fn process_owner_id(&self, pid: u32) -> Option<u32> {
        let contents = self.read_pid(pid, "status")?;
        keyed_number(&contents, "Uid:")
    }

    /// Login name for `uid` from the passwd database; empty when unknown.
    pub fn owner_name(&self, uid: u32) -> String {
        self.read(&self.passwd)
            .and_then(|contents| {
                contents.lines().find_map(|line| {
                    let mut fields = line.split(':');
                    let name = fields.next()?;
                    let _password = fields.next()?;
                    let id: u32 = fields.next()?.trim().parse().ok()?;
                    (id == uid).then(|| name.to_string())
                })
            })
            .unwrap_or_default()
    }

    pub fn process_user(&self, pid: u32) -> String {
        self.process_owner_id(pid)
            .map(|uid| self.owner_name(uid))
            .unwrap_or_default()
    }

    fn stat_timing(&self, pid: u32) -> Option<ProcessCpuFields> {
        let contents = self.read_pid(pid, "stat")?;
        parse_stat_timing(&contents)
    }

    /// utime, stime and starttime in clock ticks; zeros when unreadable.
    pub fn process_cpu_fields(&self, pid: u32) -> ProcessCpuFields {
        self.stat_timing(pid).unwrap_or_default()
    }

    /// Seconds after boot at which the process started.
    pub fn process_start_seconds(&self, pid: u32) -> u64 {
        self.process_cpu_fields(pid).starttime / self.clock_ticks
    }

    /// Age of the process in whole seconds.
    pub fn process_uptime_seconds(&self, pid: u32) -> u64 {
        let Some(fields) = self.stat_timing(pid) else {
            return 0;
        };
        let started = fields.starttime as f64 / self.clock_ticks as f64;
        (self.uptime() - started).max(0.0) as u64
    }

    pub fn process_cpu_utilization(&self, pid: u32) -> f64 {
        let Some(fields) = self.stat_timing(pid) else {
            return 0.0;
        };
        metrics::process_cpu_utilization(&fields, self.uptime(), self.clock_ticks)
    }
}

fn parse_pid(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

fn parse_pretty_name(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim() != "PRETTY_NAME" {
            return None;
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        Some(value.replace('_', " "))
    })
}

/// Value following `key` on the first line whose leading token is `key`.
fn keyed_number<T: std::str::FromStr>(contents: &str, key: &str) -> Option<T> {
    contents.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        if tokens.next()? != key {
            return None;
        }
        tokens.next()?.parse().ok()
    })
}

/// Splits a stat record into fields with the same indices as a plain
/// whitespace split, keeping `comm` intact even when it contains spaces,
/// parentheses or newlines.
fn stat_fields(record: &str) -> Vec<&str> {
    let line = record.trim_end();
    match (line.find('('), line.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            let mut fields = Vec::with_capacity(52);
            fields.push(line[..open].trim());
            fields.push(&line[open..=close]);
            fields.extend(line[close + 1..].split_whitespace());
            fields
        }
        _ => line.split_whitespace().collect(),
    }
}

fn parse_stat_timing(contents: &str) -> Option<ProcessCpuFields> {
    let fields = stat_fields(contents);
    let at = |index: usize| fields.get(index)?.parse::<u64>().ok();
    Some(ProcessCpuFields {
        utime: at(STAT_UTIME)?,
        stime: at(STAT_STIME)?,
        starttime: at(STAT_STARTTIME)?,
    })
}

use std::cell::OnceCell;

use super::metrics;
use super::process::{Process, ProcessInfo, cpu_descending};
use super::reader::ProcReader;
use super::snapshot::SystemSnapshot;

/// Drives one refresh cycle over a [`ProcReader`].
///
/// The process list is rebuilt from scratch on every refresh: entities from
/// the previous cycle are dropped, so a PID recycled by the kernel never
/// inherits a cached command or owner.
pub struct Collector {
    reader: ProcReader,
    processes: Vec<Process>,
    operating_system: OnceCell<String>,
    kernel: OnceCell<String>,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(ProcReader::default())
    }
}

impl Collector {
    pub fn new(reader: ProcReader) -> Self {
        Collector {
            reader,
            processes: Vec::new(),
            operating_system: OnceCell::new(),
            kernel: OnceCell::new(),
        }
    }

    /// Cached for the life of the collector.
    pub fn operating_system(&self) -> &str {
        self.operating_system
            .get_or_init(|| self.reader.operating_system_name())
    }

    /// Cached for the life of the collector.
    pub fn kernel(&self) -> &str {
        self.kernel.get_or_init(|| self.reader.kernel_version())
    }

    pub fn cpu_utilization(&self) -> f64 {
        metrics::system_cpu_utilization(&self.reader.cpu_core_utilizations())
    }

    pub fn memory_utilization(&self) -> f64 {
        self.reader.memory_stats().utilization()
    }

    pub fn total_processes(&self) -> u64 {
        self.reader.total_processes()
    }

    pub fn running_processes(&self) -> u64 {
        self.reader.running_processes()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.reader.uptime_seconds()
    }

    /// Entities of the most recent refresh, highest CPU share first.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Replaces the process list with one entity per PID currently under the
    /// proc root and returns their rows in display order.
    pub fn refresh_processes(&mut self) -> Vec<ProcessInfo> {
        #[cfg(feature = "perf-tracing")]
        let _span = tracing::debug_span!("collector.build_processes").entered();

        self.processes.clear();

        let reader = &self.reader;
        let mut sampled: Vec<(Process, ProcessInfo)> = reader
            .process_ids()
            .into_iter()
            .map(|pid| {
                let process = Process::resolve(pid, reader);
                let info = process.sample(reader);
                #[cfg(feature = "perf-tracing")]
                {
                    if info.command.is_empty() && info.user.is_empty() {
                        tracing::trace!(pid, "process identity unreadable, likely exited");
                    }
                }
                (process, info)
            })
            .collect();

        // Sort on the sampled share so the key cannot change mid-sort.
        sampled.sort_by(|a, b| cpu_descending(&a.1, &b.1));

        let (processes, rows): (Vec<Process>, Vec<ProcessInfo>) = sampled.into_iter().unzip();
        self.processes = processes;
        rows
    }

    pub fn refresh(&mut self) -> SystemSnapshot {
        #[cfg(feature = "perf-tracing")]
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        let processes = self.refresh_processes();
        let memory = self.reader.memory_stats();

        SystemSnapshot {
            operating_system: self.operating_system().to_string(),
            kernel: self.kernel().to_string(),
            uptime_seconds: self.uptime_seconds(),
            total_processes: self.total_processes(),
            running_processes: self.running_processes(),
            cpu_utilization: self.cpu_utilization(),
            cpu_counters: self.reader.cpu_raw_counters(),
            memory,
            memory_utilization: memory.utilization(),
            processes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempTree;
    use std::fs;

    fn temp_root(name: &str) -> TempTree {
        TempTree::new(&format!("collector_{name}"))
    }

    fn add_process(root: &TempTree, pid: u32, busy_ticks: u64) {
        root.write(
            &format!("{pid}/stat"),
            &format!(
                "{pid} (p{pid}) S 1 1 1 0 -1 0 0 0 0 0 {busy_ticks} 0 0 0 20 0 1 0 0 0 0\n"
            ),
        );
        root.write(&format!("{pid}/cmdline"), format!("p{pid}\0"));
    }

    #[test]
    fn refresh_replaces_previous_processes() {
        let root = temp_root("replace");
        root.write("uptime", "100.00 0.00\n");
        add_process(&root, 1, 100);
        add_process(&root, 2, 500);
        let mut collector = Collector::new(ProcReader::new(root.path()).with_clock_ticks(100));

        let rows = collector.refresh_processes();
        assert_eq!(rows.iter().map(|r| r.pid).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(collector.processes().len(), 2);
        assert_eq!(collector.processes()[0].pid(), 2);

        fs::remove_dir_all(root.join("2")).unwrap();
        add_process(&root, 3, 300);
        let rows = collector.refresh_processes();
        assert_eq!(rows.iter().map(|r| r.pid).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(collector.processes().len(), 2);
    }

    #[test]
    fn latin1_process_keeps_its_metrics() {
        let root = temp_root("latin1");
        root.write("uptime", "100.00 0.00\n");
        add_process(&root, 1, 100);
        root.write(
            "7/stat",
            b"7 (caf\xe9) S 1 7 7 0 -1 0 0 0 0 0 500 0 0 0 20 0 1 0 0 0 0\n",
        );
        root.write("7/cmdline", b"/usr/bin/caf\xe9\0");
        root.write("7/status", b"Name:\tcaf\xe9\nVmSize:\t204800 kB\n");
        let mut collector = Collector::new(ProcReader::new(root.path()).with_clock_ticks(100));

        let snapshot = collector.refresh();
        let top = &snapshot.processes[0];
        assert_eq!(top.pid, 7);
        assert_eq!(top.command, "/usr/bin/caf\u{FFFD}");
        assert_eq!(top.ram_mb, 200);
        assert_eq!(top.age_seconds, 100);
        assert!(top.cpu_utilization > 0.0);
    }

    #[test]
    fn identity_strings_are_cached() {
        let root = temp_root("identity");
        root.write("version", "Linux version 6.1.0 (builder) #1\n");
        root.write("os-release", "PRETTY_NAME=\"Debian GNU/Linux 12\"\n");
        let collector = Collector::new(
            ProcReader::new(root.path()).with_os_release(root.join("os-release")),
        );
        assert_eq!(collector.kernel(), "6.1.0");
        assert_eq!(collector.operating_system(), "Debian GNU/Linux 12");

        root.write("version", "Linux version 9.9.9 (builder) #1\n");
        assert_eq!(collector.kernel(), "6.1.0");
    }

    #[test]
    fn aggregates_without_cores_are_zero() {
        let root = temp_root("nocores");
        root.write("stat", "cpu  1 2 3 4 5 6 7 8\nprocesses 10\n");
        let collector = Collector::new(ProcReader::new(root.path()));
        assert_eq!(collector.cpu_utilization(), 0.0);
        assert_eq!(collector.memory_utilization(), 0.0);
        assert_eq!(collector.total_processes(), 10);
    }
}

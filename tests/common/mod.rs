#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use proctop::system::reader::ProcReader;

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

pub const CLOCK_TICKS: u64 = 100;

/// A synthetic proc tree (plus os-release and passwd) under the temp dir.
pub struct FakeProc {
    pub root: PathBuf,
}

pub struct FakeProcess<'a> {
    pub pid: u32,
    pub comm: &'a str,
    pub cmdline: &'a str,
    pub uid: u32,
    pub vm_size_kb: u64,
    pub utime: u64,
    pub stime: u64,
    pub starttime: u64,
}

impl FakeProc {
    pub fn new(name: &str) -> Self {
        let n = NEXT_ROOT.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "proctop_it_{name}_{}_{n}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("proc")).unwrap();
        fs::create_dir_all(root.join("etc")).unwrap();
        FakeProc { root }
    }

    pub fn proc_root(&self) -> PathBuf {
        self.root.join("proc")
    }

    pub fn reader(&self) -> ProcReader {
        ProcReader::new(self.proc_root())
            .with_os_release(self.root.join("etc/os-release"))
            .with_passwd(self.root.join("etc/passwd"))
            .with_clock_ticks(CLOCK_TICKS)
    }

    pub fn write(&self, rel: &str, contents: &str) -> &Self {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    pub fn remove_process(&self, pid: u32) {
        let _ = fs::remove_dir_all(self.proc_root().join(pid.to_string()));
    }

    pub fn with_system(&self, uptime: f64) -> &Self {
        self.write("etc/os-release", "NAME=\"Ubuntu\"\nPRETTY_NAME=\"Ubuntu 22.04\"\n")
            .write(
                "etc/passwd",
                "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/zsh\n",
            )
            .write(
                "proc/version",
                "Linux version 6.5.0-14-generic (buildd@lcy02) (gcc 12.3.0) #14 SMP\n",
            )
            .write(
                "proc/stat",
                "cpu  100 0 50 700 50 0 0 0 0 0\n\
                 cpu0 60 0 20 300 20 0 0 0 0 0\n\
                 cpu1 40 0 30 400 30 0 0 0 0 0\n\
                 ctxt 999\n\
                 processes 5123\n\
                 procs_running 3\n",
            )
            .write(
                "proc/meminfo",
                "MemTotal:       16000000 kB\nMemFree:         1000000 kB\nMemAvailable:    4000000 kB\n",
            )
            .write("proc/uptime", &format!("{uptime:.2} 0.00\n"))
    }

    pub fn add_process(&self, p: &FakeProcess<'_>) -> &Self {
        let pid = p.pid;
        self.write(
            &format!("proc/{pid}/stat"),
            &format!(
                "{pid} ({}) S 1 {pid} {pid} 0 -1 4194560 100 0 0 0 {} {} 0 0 20 0 1 0 {} 1000000 200\n",
                p.comm, p.utime, p.stime, p.starttime
            ),
        )
        .write(&format!("proc/{pid}/cmdline"), p.cmdline)
        .write(
            &format!("proc/{pid}/status"),
            &format!(
                "Name:\t{}\nState:\tS (sleeping)\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\nVmSize:\t{} kB\n",
                p.comm,
                p.vm_size_kb,
                uid = p.uid
            ),
        )
    }
}

impl Drop for FakeProc {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

pub fn simple_process(pid: u32, busy_ticks: u64) -> FakeProcess<'static> {
    FakeProcess {
        pid,
        comm: "worker",
        cmdline: "worker\0",
        uid: 1000,
        vm_size_kb: 10_240,
        utime: busy_ticks,
        stime: 0,
        starttime: 0,
    }
}


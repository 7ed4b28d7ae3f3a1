use std::time::Instant;

use crossterm::event::KeyCode;
use insta::assert_snapshot;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::app::ResolvedKeybinds;
use crate::system::metrics::{MemoryStats, RawCounterSet};
use crate::system::process::ProcessInfo;
use crate::system::snapshot::SystemSnapshot;
use crate::ui::theme::Theme;
use crate::ui::{header, process_table, statusbar};

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn make_process(pid: u32, user: &str, command: &str, cpu: f64) -> ProcessInfo {
    ProcessInfo {
        pid,
        user: user.to_string(),
        command: command.to_string(),
        ram_mb: 256,
        cpu_utilization: cpu,
        age_seconds: 3661,
    }
}

fn make_snapshot() -> SystemSnapshot {
    SystemSnapshot {
        operating_system: "Ubuntu 22.04".to_string(),
        kernel: "6.5.0-14-generic".to_string(),
        uptime_seconds: 7322,
        total_processes: 5123,
        running_processes: 3,
        cpu_utilization: 0.25,
        cpu_counters: RawCounterSet::default(),
        memory: MemoryStats {
            total_kb: 16_777_216,
            available_kb: 4_194_304,
        },
        memory_utilization: 0.75,
        processes: vec![
            make_process(42, "alice", "/usr/bin/worker --fast", 0.5),
            make_process(7, "root", "/sbin/init", 0.01),
        ],
    }
}

#[test]
fn header_shows_identity_and_gauges() {
    let snapshot = make_snapshot();
    let output = render_to_string(120, 4, |frame| {
        header::render(frame, Rect::new(0, 0, 120, 4), &snapshot, &Theme::dark());
    });

    assert!(output.contains("proctop"), "{output}");
    assert!(output.contains("Ubuntu 22.04"), "{output}");
    assert!(output.contains("6.5.0-14-generic"), "{output}");
    assert!(output.contains("Up 02:02:02"), "{output}");
    assert!(output.contains("5123 total / 3 running"), "{output}");
    assert!(output.contains("25%"), "{output}");
    assert!(output.contains("12.0 GB/16.0 GB (75%)"), "{output}");
}

#[test]
fn process_table_rows_in_given_order() {
    let snapshot = make_snapshot();
    let rows: Vec<&ProcessInfo> = snapshot.processes.iter().collect();
    let output = render_to_string(100, 6, |frame| {
        process_table::render(frame, Rect::new(0, 0, 100, 6), &rows, 0, &Theme::dark());
    });

    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[0].contains("Processes (2)"));
    assert!(lines[1].contains("PID") && lines[1].contains("COMMAND"));
    assert!(lines[2].contains("42") && lines[2].contains("alice") && lines[2].contains("50%"));
    assert!(lines[2].contains("01:01:01") && lines[2].contains("256 MB"));
    assert!(lines[3].contains("/sbin/init") && lines[3].contains("1%"));
}

#[test]
fn process_table_handles_empty_list() {
    let output = render_to_string(60, 4, |frame| {
        process_table::render(frame, Rect::new(0, 0, 60, 4), &[], 3, &Theme::light());
    });
    assert!(output.contains("Processes (0)"));
}

#[test]
fn snapshot_statusbar() {
    let keybinds = ResolvedKeybinds {
        quit: KeyCode::Char('q'),
        refresh: KeyCode::F(5),
    };
    let output = render_to_string(90, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 90, 1),
            &keybinds,
            Instant::now(),
            &Theme::dark(),
        );
    });

    assert!(output.contains("updated"));
    let pills = output.split("  updated").next().unwrap_or_default().trim();
    assert_snapshot!(pills, @"q  Quit  F5  Refresh  ↑↓  Select  PgUp/PgDn  Page");
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::{elapsed_time, format_megabytes, format_percent};
use crate::system::metrics::kb_to_mb;
use crate::system::snapshot::SystemSnapshot;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_system_info(frame, chunks[0], snapshot, theme);
    render_cpu_gauge(frame, chunks[1], snapshot, theme);
    render_memory_gauge(frame, chunks[2], snapshot, theme);
}

fn bordered<'a>(theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
}

fn render_system_info(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let block = bordered(theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let os = if snapshot.operating_system.is_empty() {
        "Linux"
    } else {
        snapshot.operating_system.as_str()
    };
    let secondary = Style::default().fg(theme.text_secondary);

    let first = Line::from(vec![
        Span::styled(
            " proctop ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(os.to_string(), Style::default().fg(theme.text_primary)),
        Span::styled(format!("  {}", snapshot.kernel), secondary),
    ]);
    let second = Line::from(vec![
        Span::styled(
            format!(" Up {}", elapsed_time(snapshot.uptime_seconds)),
            secondary,
        ),
        Span::styled(
            format!(
                "  Procs {} total / {} running",
                snapshot.total_processes, snapshot.running_processes
            ),
            secondary,
        ),
    ]);

    frame.render_widget(Paragraph::new(vec![first, second]), inner);
}

fn gauge<'a>(title: &'a str, ratio: f64, label: String, theme: &Theme) -> Gauge<'a> {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Gauge::default()
        .block(
            bordered(theme).title(Span::styled(
                title,
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::BOLD),
            )),
        )
        .gauge_style(
            Style::default()
                .fg(theme.heat_color(ratio))
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(label)
}

fn render_cpu_gauge(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let label = format_percent(snapshot.cpu_utilization);
    frame.render_widget(
        gauge(" CPU ", snapshot.cpu_utilization, label, theme),
        area,
    );
}

fn render_memory_gauge(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let used = format_megabytes(kb_to_mb(snapshot.memory.used_kb()));
    let total = format_megabytes(kb_to_mb(snapshot.memory.total_kb));
    let label = format!(
        "{used}/{total} ({})",
        format_percent(snapshot.memory_utilization)
    );
    frame.render_widget(
        gauge(" RAM ", snapshot.memory_utilization, label, theme),
        area,
    );
}

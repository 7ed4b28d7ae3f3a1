use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::format::{elapsed_time, format_megabytes, format_percent, truncate_unicode};
use crate::system::process::ProcessInfo;
use crate::ui::theme::Theme;

const FIXED_WIDTHS: [u16; 5] = [7, 10, 6, 9, 10];

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[&ProcessInfo],
    selected_index: usize,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" Processes ({}) ", processes.len()),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    // borders plus one column of spacing between each of the six columns
    let used: u16 = FIXED_WIDTHS.iter().sum::<u16>() + 2 + 5;
    let command_width = area.width.saturating_sub(used) as usize;

    let header = Row::new(["PID", "USER", "CPU%", "RAM", "TIME+", "COMMAND"])
        .style(
            Style::default()
                .fg(theme.table_header_fg)
                .add_modifier(Modifier::BOLD),
        );

    let rows = processes.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.pid.to_string()),
            Cell::from(truncate_unicode(&p.user, FIXED_WIDTHS[1] as usize)),
            Cell::from(format_percent(p.cpu_utilization)),
            Cell::from(format_megabytes(p.ram_mb)),
            Cell::from(elapsed_time(p.age_seconds)),
            Cell::from(truncate_unicode(&p.command, command_width)),
        ])
        .style(Style::default().fg(theme.text_primary))
    });

    let widths = [
        Constraint::Length(FIXED_WIDTHS[0]),
        Constraint::Length(FIXED_WIDTHS[1]),
        Constraint::Length(FIXED_WIDTHS[2]),
        Constraint::Length(FIXED_WIDTHS[3]),
        Constraint::Length(FIXED_WIDTHS[4]),
        Constraint::Min(0),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    if !processes.is_empty() {
        state.select(Some(selected_index.min(processes.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

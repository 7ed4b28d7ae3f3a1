use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{ResolvedKeybinds, key_label};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    keybinds: &ResolvedKeybinds,
    last_refresh: Instant,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);
    let quit = key_label(keybinds.quit);
    let refresh = key_label(keybinds.refresh);

    let mut spans = Vec::new();
    spans.extend(pill_spans(&quit, "Quit", theme));
    spans.extend(pill_spans(&refresh, "Refresh", theme));
    spans.extend(pill_spans("\u{2191}\u{2193}", "Select", theme));
    spans.extend(pill_spans("PgUp/PgDn", "Page", theme));
    spans.push(Span::styled(
        format!("  updated {:.1}s ago", last_refresh.elapsed().as_secs_f64()),
        Style::default().fg(theme.text_secondary),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {desc}"), Style::default().fg(theme.pill_desc_fg)),
    ]
}

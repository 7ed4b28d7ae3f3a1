pub mod header;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &app.snapshot, &app.theme);

    let visible = app.visible_processes();
    process_table::render(frame, chunks[1], &visible, app.selected_index, &app.theme);

    statusbar::render(
        frame,
        chunks[2],
        &app.keybinds,
        app.last_refresh,
        &app.theme,
    );
}

#[cfg(test)]
mod tests;

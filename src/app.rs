use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::system::collector::Collector;
use crate::system::process::ProcessInfo;
use crate::system::snapshot::SystemSnapshot;
use crate::ui::theme::Theme;

const PAGE_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    pub collector: Collector,
    pub snapshot: SystemSnapshot,
    pub selected_index: usize,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    pub max_processes: usize,
    pub show_kernel_threads: bool,
    pub last_refresh: Instant,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_collector(Collector::new(config.paths.reader()), &config)
    }

    pub fn with_collector(mut collector: Collector, config: &Config) -> Self {
        let snapshot = collector.refresh();
        App {
            running: true,
            collector,
            snapshot,
            selected_index: 0,
            theme: Theme::from_config(&config.general.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            max_processes: config.display.max_processes,
            show_kernel_threads: config.display.show_kernel_threads,
            last_refresh: Instant::now(),
        }
    }

    pub fn refresh_data(&mut self) {
        let selected_pid = self.selected_process().map(|p| p.pid);
        self.snapshot = self.collector.refresh();
        self.last_refresh = Instant::now();

        // Follow the selected PID to its new position, if it survived.
        let visible = self.visible_processes();
        let index = selected_pid
            .and_then(|pid| visible.iter().position(|p| p.pid == pid))
            .unwrap_or(self.selected_index)
            .min(visible.len().saturating_sub(1));
        self.selected_index = index;
    }

    /// Rows the table shows, in collector order.
    pub fn visible_processes(&self) -> Vec<&ProcessInfo> {
        let rows = self
            .snapshot
            .processes
            .iter()
            .filter(|p| self.show_kernel_threads || !p.command.is_empty());
        if self.max_processes > 0 {
            rows.take(self.max_processes).collect()
        } else {
            rows.collect()
        }
    }

    pub fn selected_process(&self) -> Option<&ProcessInfo> {
        self.visible_processes().get(self.selected_index).copied()
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        let code = key.code;
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Top),
            KeyCode::End => return Action::Navigate(Direction::Bottom),
            _ => {}
        }

        if code == self.keybinds.quit {
            return Action::Quit;
        }
        if code == self.keybinds.refresh {
            return Action::Refresh;
        }

        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::Refresh => self.refresh_data(),
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let len = self.visible_processes().len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        let last = len - 1;
        let current = self.selected_index.min(last);
        self.selected_index = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
            Direction::PageUp => current.saturating_sub(PAGE_ROWS),
            Direction::PageDown => (current + PAGE_ROWS).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
    }
}

use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::system::reader::{DEFAULT_OS_RELEASE, DEFAULT_PASSWD, DEFAULT_PROC_ROOT, ProcReader};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub paths: PathsConfig,
    pub display: DisplayConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub theme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 1000,
            theme: "dark".to_string(),
        }
    }
}

/// Where the kernel sources live. Overridable so the monitor can be pointed
/// at a container's proc mount or a captured tree.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub proc_root: PathBuf,
    pub os_release: PathBuf,
    pub passwd: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
            passwd: PathBuf::from(DEFAULT_PASSWD),
        }
    }
}

impl PathsConfig {
    pub fn reader(&self) -> ProcReader {
        ProcReader::new(&self.proc_root)
            .with_os_release(&self.os_release)
            .with_passwd(&self.passwd)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 0 shows as many rows as fit.
    pub max_processes: usize,
    pub show_kernel_threads: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            max_processes: 0,
            show_kernel_threads: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub refresh: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            refresh: "r".to_string(),
        }
    }
}

/// Accepts a single character or a key name such as `Enter`, `Esc`, `F5`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "space" => Some(KeyCode::Char(' ')),
        "tab" => Some(KeyCode::Tab),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        other => other
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("proctop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

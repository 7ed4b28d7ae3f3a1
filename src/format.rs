use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// `HH:MM:SS`; hours keep growing past 99 instead of wrapping into days.
pub fn elapsed_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// A utilization fraction as a whole-number percentage.
pub fn format_percent(fraction: f64) -> String {
    let pct = if fraction.is_finite() {
        fraction * 100.0
    } else {
        0.0
    };
    format!("{pct:.0}%")
}

pub fn format_megabytes(mb: u64) -> String {
    const GB: u64 = 1024;
    if mb >= GB {
        format!("{:.1} GB", mb as f64 / GB as f64)
    } else {
        format!("{mb} MB")
    }
}

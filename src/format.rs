use std::time::Duration;

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

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_rate(bytes: u64, window: Option<Duration>) -> String {
    match window {
        Some(w) if !w.is_zero() => {
            let per_sec = (bytes as f64 / w.as_secs_f64()).round() as u64;
            format!("{}/s", format_bytes(per_sec))
        }
        _ => "-".to_string(),
    }
}

/// `3d 04:05:06`, or `04:05:06` under a day.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Low,
    Medium,
    High,
}

pub fn usage_level(percent: f64) -> UsageLevel {
    if percent < 50.0 {
        UsageLevel::Low
    } else if percent < 80.0 {
        UsageLevel::Medium
    } else {
        UsageLevel::High
    }
}

pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// ASCII bar such as `[####      ]  45.00%`.
pub fn usage_bar(percent: f64, bar_len: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * bar_len as f64) as usize;
    format!(
        "[{}{}] {:6.2}%",
        "#".repeat(filled),
        " ".repeat(bar_len - filled),
        clamped
    )
}

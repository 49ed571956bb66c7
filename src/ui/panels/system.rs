use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use super::field;
use crate::format::format_uptime;
use crate::system::snapshot::SystemInfo;
use crate::ui::theme::Theme;

pub fn height(_info: &SystemInfo) -> u16 {
    4
}

pub fn render(info: &SystemInfo, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let or_unknown = |value: &Option<String>| value.clone().unwrap_or_else(|| "unknown".to_string());
    let lines = vec![
        Line::from(field("Host", or_unknown(&info.hostname), theme)),
        Line::from(field("OS", or_unknown(&info.os_version), theme)),
        Line::from(field("Kernel", or_unknown(&info.kernel_version), theme)),
        Line::from(field("Uptime", format_uptime(info.uptime_secs), theme)),
    ];
    Paragraph::new(lines).render(area, buf);
}

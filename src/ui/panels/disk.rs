use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use super::{separator, usage_span};
use crate::format::{format_bytes, percent_of, truncate_unicode};
use crate::system::snapshot::DiskUsage;
use crate::ui::theme::Theme;

const BAR_LEN: usize = 20;
const MAX_MOUNT_WIDTH: usize = 24;

pub fn height(disks: &[DiskUsage]) -> u16 {
    disks.len().clamp(1, u16::MAX as usize) as u16
}

pub fn render(disks: &[DiskUsage], area: Rect, buf: &mut Buffer, theme: &Theme) {
    if disks.is_empty() {
        Paragraph::new(Span::styled(
            "no mounted filesystems",
            Style::default().fg(theme.text_secondary),
        ))
        .render(area, buf);
        return;
    }

    let mount_width = disks
        .iter()
        .map(|d| d.mount_point.width())
        .max()
        .unwrap_or(0)
        .min(MAX_MOUNT_WIDTH);

    let lines: Vec<Line> = disks
        .iter()
        .map(|disk| {
            let mount = truncate_unicode(&disk.mount_point, mount_width);
            let pad = mount_width.saturating_sub(mount.width());
            let used = disk.used();
            Line::from(vec![
                Span::styled(
                    format!("{mount}{} ", " ".repeat(pad)),
                    Style::default().fg(theme.text_primary),
                ),
                usage_span(percent_of(used, disk.total), BAR_LEN, theme),
                separator(theme),
                Span::styled(
                    format!("{} / {}", format_bytes(used), format_bytes(disk.total)),
                    Style::default().fg(theme.text_primary),
                ),
                Span::styled(
                    format!(" ({})", disk.file_system),
                    Style::default().fg(theme.text_secondary),
                ),
            ])
        })
        .collect();

    Paragraph::new(lines).render(area, buf);
}

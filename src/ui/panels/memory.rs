use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph, Widget};

use super::{field, separator, usage_span};
use crate::format::{format_bytes, percent_of};
use crate::system::snapshot::MemoryUsage;
use crate::ui::theme::Theme;

const SWAP_BAR_LEN: usize = 20;

pub fn height(_memory: &MemoryUsage) -> u16 {
    3
}

pub fn render(memory: &MemoryUsage, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let [totals_area, gauge_area, swap_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let mut totals = field("Total", format_bytes(memory.total), theme);
    totals.push(separator(theme));
    totals.extend(field("Used", format_bytes(memory.used), theme));
    totals.push(separator(theme));
    totals.extend(field("Available", format_bytes(memory.available), theme));
    Paragraph::new(Line::from(totals)).render(totals_area, buf);

    let percent = percent_of(memory.used, memory.total);
    Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.usage_color(percent))
                .bg(theme.gauge_unfilled),
        )
        .ratio(percent / 100.0)
        .label(format!("RAM {percent:.1}%"))
        .render(gauge_area, buf);

    let mut swap = vec![Span::styled("Swap: ", Style::default().fg(theme.text_secondary))];
    if memory.swap_total == 0 {
        swap.push(Span::styled("none", Style::default().fg(theme.text_secondary)));
    } else {
        let swap_percent = percent_of(memory.swap_used, memory.swap_total);
        swap.push(Span::styled(
            format!(
                "{} / {} ",
                format_bytes(memory.swap_used),
                format_bytes(memory.swap_total)
            ),
            Style::default().fg(theme.text_primary),
        ));
        swap.push(usage_span(swap_percent, SWAP_BAR_LEN, theme));
    }
    Paragraph::new(Line::from(swap)).render(swap_area, buf);
}

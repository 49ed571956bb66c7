use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use super::usage_span;
use crate::system::snapshot::CpuUsage;
use crate::ui::theme::Theme;

const BAR_LEN: usize = 10;
const MAX_COLUMNS: usize = 5;
/// `[##########] 100.00%`
const BAR_WIDTH: usize = BAR_LEN + 2 + 8;
const GAP: usize = 2;

/// How many per-core entries fit side by side, between 1 and 5.
pub fn cpu_columns(inner_width: u16, column_width: usize) -> usize {
    (inner_width as usize / column_width.max(1)).clamp(1, MAX_COLUMNS)
}

fn label_digits(cores: usize) -> usize {
    cores.saturating_sub(1).max(1).to_string().len()
}

fn column_width(cores: usize) -> usize {
    "Core ".len() + label_digits(cores) + ": ".len() + BAR_WIDTH + GAP
}

pub fn height(cpu: &CpuUsage, inner_width: u16) -> u16 {
    let cores = cpu.per_core_percent.len();
    let columns = cpu_columns(inner_width, column_width(cores));
    let rows = cores.div_ceil(columns);
    // one extra line for the average
    (rows + 1).min(u16::MAX as usize) as u16
}

pub fn render(cpu: &CpuUsage, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let cores = cpu.per_core_percent.len();
    let digits = label_digits(cores);
    let columns = cpu_columns(area.width, column_width(cores));

    let mut lines: Vec<Line> = cpu
        .per_core_percent
        .chunks(columns)
        .enumerate()
        .map(|(row, chunk)| {
            let mut spans = Vec::with_capacity(chunk.len() * 3);
            for (col, &percent) in chunk.iter().enumerate() {
                let core = row * columns + col;
                spans.push(Span::styled(
                    format!("Core {core:<digits$}: "),
                    Style::default().fg(theme.text_secondary),
                ));
                spans.push(usage_span(f64::from(percent), BAR_LEN, theme));
                spans.push(Span::raw(" ".repeat(GAP)));
            }
            Line::from(spans)
        })
        .collect();

    let average = f64::from(cpu.aggregate_percent);
    lines.push(Line::from(vec![
        Span::styled("Average: ", Style::default().fg(theme.text_secondary)),
        Span::styled(
            format!("{average:.2}%"),
            Style::default().fg(theme.usage_color(average)),
        ),
    ]));

    Paragraph::new(lines).render(area, buf);
}

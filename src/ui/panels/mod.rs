//! One renderer per dashboard section.
//!
//! Every panel draws inside a titled block. A panel that has not been sampled
//! yet or could not be read gets a one-line placeholder instead of values, so a
//! missing reading never looks like zero usage.

mod cpu;
mod disk;
mod load;
mod memory;
mod network;
mod system;
mod users;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::config::Panel;
use crate::error::MetricUnavailable;
use crate::system::snapshot::{Reading, Snapshot};
use crate::ui::theme::Theme;

pub use cpu::cpu_columns;

/// Top and bottom border.
const CHROME: u16 = 2;

enum Content<'a, T> {
    Pending,
    Unavailable(&'a MetricUnavailable),
    Ready(&'a T),
}

fn content<T>(reading: Option<&Reading<T>>) -> Content<'_, T> {
    match reading {
        None => Content::Pending,
        Some(Err(reason)) => Content::Unavailable(reason),
        Some(Ok(value)) => Content::Ready(value),
    }
}

pub fn desired_height(panel: Panel, snapshot: Option<&Snapshot>, width: u16) -> u16 {
    let inner_width = width.saturating_sub(CHROME);
    let body = match panel {
        Panel::Cpu => body_height(snapshot.and_then(|s| s.cpu.as_ref()), |usage| {
            cpu::height(usage, inner_width)
        }),
        Panel::Memory => body_height(snapshot.and_then(|s| s.memory.as_ref()), memory::height),
        Panel::Disk => body_height(snapshot.and_then(|s| s.disk.as_ref()), |d| disk::height(d)),
        Panel::Users => body_height(snapshot.and_then(|s| s.users.as_ref()), |u| users::height(u)),
        Panel::Network => body_height(snapshot.and_then(|s| s.network.as_ref()), network::height),
        Panel::Load => body_height(snapshot.and_then(|s| s.load.as_ref()), load::height),
        Panel::System => body_height(snapshot.and_then(|s| s.system.as_ref()), system::height),
    };
    body + CHROME
}

pub fn render(
    panel: Panel,
    snapshot: Option<&Snapshot>,
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
) {
    let block = panel_block(panel.title(), theme);
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.is_empty() {
        return;
    }

    match panel {
        Panel::Cpu => render_body(
            snapshot.and_then(|s| s.cpu.as_ref()),
            inner,
            buf,
            theme,
            |usage, area, buf| cpu::render(usage, area, buf, theme),
        ),
        Panel::Memory => render_body(
            snapshot.and_then(|s| s.memory.as_ref()),
            inner,
            buf,
            theme,
            |usage, area, buf| memory::render(usage, area, buf, theme),
        ),
        Panel::Disk => render_body(
            snapshot.and_then(|s| s.disk.as_ref()),
            inner,
            buf,
            theme,
            |disks, area, buf| disk::render(disks, area, buf, theme),
        ),
        Panel::Users => render_body(
            snapshot.and_then(|s| s.users.as_ref()),
            inner,
            buf,
            theme,
            |rows, area, buf| users::render(rows, area, buf, theme),
        ),
        Panel::Network => render_body(
            snapshot.and_then(|s| s.network.as_ref()),
            inner,
            buf,
            theme,
            |activity, area, buf| network::render(activity, area, buf, theme),
        ),
        Panel::Load => render_body(
            snapshot.and_then(|s| s.load.as_ref()),
            inner,
            buf,
            theme,
            |average, area, buf| load::render(average, area, buf, theme),
        ),
        Panel::System => render_body(
            snapshot.and_then(|s| s.system.as_ref()),
            inner,
            buf,
            theme,
            |info, area, buf| system::render(info, area, buf, theme),
        ),
    }
}

fn body_height<T>(reading: Option<&Reading<T>>, ready: impl FnOnce(&T) -> u16) -> u16 {
    match content(reading) {
        Content::Ready(value) => ready(value).max(1),
        Content::Pending | Content::Unavailable(_) => 1,
    }
}

fn render_body<T>(
    reading: Option<&Reading<T>>,
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
    ready: impl FnOnce(&T, Rect, &mut Buffer),
) {
    match content(reading) {
        Content::Ready(value) => ready(value, area, buf),
        Content::Pending => {
            let line = Line::from(Span::styled(
                "sampling\u{2026}",
                Style::default().fg(theme.text_secondary),
            ));
            Paragraph::new(line).render(area, buf);
        }
        Content::Unavailable(reason) => {
            let line = Line::from(vec![
                Span::styled(
                    "unavailable",
                    Style::default()
                        .fg(theme.unavailable)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({reason})"),
                    Style::default().fg(theme.text_secondary),
                ),
            ]);
            Paragraph::new(line).render(area, buf);
        }
    }
}

fn panel_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ))
}

/// `label: ` in the secondary color followed by a value.
fn field<'a>(label: &'a str, value: String, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::styled(format!("{label}: "), Style::default().fg(theme.text_secondary)),
        Span::styled(value, Style::default().fg(theme.text_primary)),
    ]
}

fn separator<'a>(theme: &Theme) -> Span<'a> {
    Span::styled(" | ", Style::default().fg(theme.border))
}

/// Colored ASCII usage bar, e.g. `[####      ]  40.00%`.
fn usage_span<'a>(percent: f64, bar_len: usize, theme: &Theme) -> Span<'a> {
    Span::styled(
        crate::format::usage_bar(percent, bar_len),
        Style::default().fg(theme.usage_color(percent)),
    )
}

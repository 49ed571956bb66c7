pub mod header;
pub mod panels;
pub mod statusbar;
pub mod theme;

use std::time::Duration;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Widget;

use crate::config::PanelSet;
use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

/// Everything a frame is rendered from.
#[derive(Clone, Copy)]
pub struct View<'a> {
    /// `None` until the first tick completes.
    pub snapshot: Option<&'a Snapshot>,
    pub host_name: Option<&'a str>,
    pub panels: &'a PanelSet,
    pub interval: Duration,
    pub theme: &'a Theme,
}

pub fn draw(frame: &mut Frame, view: View<'_>) {
    frame.render_widget(Dashboard(view), frame.area());
}

/// Renders one frame off-screen and returns it as plain text rows.
pub fn render_text(view: View<'_>, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    Dashboard(view).render(area, &mut buf);
    buffer_to_string(&buf)
}

pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut row = String::new();
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell((x, y)) {
                row.push_str(cell.symbol());
            }
        }
        out.push_str(row.trim_end());
        if y + 1 < area.bottom() {
            out.push('\n');
        }
    }
    out
}

/// Header, the enabled panels top to bottom, status bar.
struct Dashboard<'a>(View<'a>);

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.0;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        header::render(chunks[0], buf, &view);
        render_panels(chunks[1], buf, &view);
        statusbar::render(chunks[2], buf, view.theme);
    }
}

/// Stacks panels at their preferred height; whatever does not fit is cut off
/// at the bottom.
fn render_panels(area: Rect, buf: &mut Buffer, view: &View<'_>) {
    let mut y = area.y;
    for &panel in view.panels {
        let remaining = area.bottom().saturating_sub(y);
        if remaining == 0 {
            break;
        }
        let wanted = panels::desired_height(panel, view.snapshot, area.width);
        let height = wanted.min(remaining);
        let slot = Rect::new(area.x, y, area.width, height);
        panels::render(panel, view.snapshot, slot, buf, view.theme);
        y += height;
    }
}

#[cfg(test)]
mod tests;

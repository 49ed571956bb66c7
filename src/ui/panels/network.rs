use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Widget};

use crate::format::{format_bytes, format_rate, truncate_unicode};
use crate::system::snapshot::{InterfaceDelta, NetworkActivity};
use crate::ui::theme::Theme;

const NAME_WIDTH: u16 = 16;

pub fn height(activity: &NetworkActivity) -> u16 {
    if activity.interfaces.is_empty() {
        return 1;
    }
    // header + one row per interface + total
    (activity.interfaces.len() + 2).min(u16::MAX as usize) as u16
}

pub fn render(activity: &NetworkActivity, area: Rect, buf: &mut Buffer, theme: &Theme) {
    if activity.interfaces.is_empty() {
        Paragraph::new(Span::styled(
            "no interfaces",
            Style::default().fg(theme.text_secondary),
        ))
        .render(area, buf);
        return;
    }

    let header = Row::new(
        ["Interface", "Sent", "Received", "Pkts out", "Pkts in", "Out/s", "In/s"]
            .into_iter()
            .enumerate()
            .map(|(i, title)| {
                if i == 0 {
                    Cell::from(title)
                } else {
                    right(title.to_string())
                }
            }),
    )
    .style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let mut rows: Vec<Row> = activity
        .interfaces
        .iter()
        .map(|iface| interface_row(iface, activity, theme))
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from("total"),
            right(format_bytes(activity.total_sent())),
            right(format_bytes(activity.total_received())),
            Cell::from(""),
            Cell::from(""),
            right(format_rate(activity.total_sent(), activity.window)),
            right(format_rate(activity.total_received(), activity.window)),
        ])
        .style(
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
    );

    let widths = [
        Constraint::Length(NAME_WIDTH),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
    ];
    Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .render(area, buf);
}

fn interface_row<'a>(iface: &InterfaceDelta, activity: &NetworkActivity, theme: &Theme) -> Row<'a> {
    let style = if iface.is_virtual {
        Style::default().fg(theme.text_secondary)
    } else {
        Style::default().fg(theme.text_primary)
    };
    Row::new(vec![
        Cell::from(truncate_unicode(&iface.name, NAME_WIDTH as usize)),
        right(format_bytes(iface.bytes_sent)),
        right(format_bytes(iface.bytes_received)),
        right(iface.packets_sent.to_string()),
        right(iface.packets_received.to_string()),
        right(format_rate(iface.bytes_sent, activity.window)),
        right(format_rate(iface.bytes_received, activity.window)),
    ])
    .style(style)
}

fn right<'a>(text: String) -> Cell<'a> {
    Cell::from(Line::from(text).alignment(Alignment::Right))
}

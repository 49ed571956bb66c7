use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Widget};

use crate::system::snapshot::UserUsage;
use crate::ui::theme::Theme;

/// Rows shown before the rest is folded into a summary line.
const MAX_ROWS: usize = 10;

pub fn height(users: &[UserUsage]) -> u16 {
    if users.is_empty() {
        return 1;
    }
    let folded = usize::from(users.len() > MAX_ROWS);
    // header + rows + optional "more" line
    (1 + users.len().min(MAX_ROWS) + folded) as u16
}

pub fn render(users: &[UserUsage], area: Rect, buf: &mut Buffer, theme: &Theme) {
    if users.is_empty() {
        Paragraph::new(Span::styled(
            "No users above threshold",
            Style::default().fg(theme.text_secondary),
        ))
        .render(area, buf);
        return;
    }

    let header = Row::new(vec![
        Cell::from("User"),
        right("cpu%".to_string()),
        right("mem%".to_string()),
        right("procs".to_string()),
    ])
    .style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let mut rows: Vec<Row> = users
        .iter()
        .take(MAX_ROWS)
        .map(|user| {
            Row::new(vec![
                Cell::from(user.name.clone()),
                Cell::from(
                    Line::from(Span::styled(
                        format!("{:.2}", user.cpu_percent),
                        Style::default().fg(theme.usage_color(f64::from(user.cpu_percent))),
                    ))
                    .alignment(Alignment::Right),
                ),
                Cell::from(
                    Line::from(Span::styled(
                        format!("{:.2}", user.memory_percent),
                        Style::default().fg(theme.usage_color(f64::from(user.memory_percent))),
                    ))
                    .alignment(Alignment::Right),
                ),
                right(user.processes.to_string()),
            ])
            .style(Style::default().fg(theme.text_primary))
        })
        .collect();

    if users.len() > MAX_ROWS {
        rows.push(
            Row::new(vec![Cell::from(format!(
                "+{} more",
                users.len() - MAX_ROWS
            ))])
            .style(Style::default().fg(theme.text_secondary)),
        );
    }

    let widths = [
        Constraint::Min(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(6),
    ];
    Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .render(area, buf);
}

fn right<'a>(text: String) -> Cell<'a> {
    Cell::from(Line::from(text).alignment(Alignment::Right))
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::View;

pub fn render(area: Rect, buf: &mut Buffer, view: &View<'_>) {
    let theme = view.theme;
    let refresh = format!("every {}s", format_interval(view.interval.as_secs_f64()));
    let state = if view.snapshot.is_some() {
        "live"
    } else {
        "starting"
    };

    let mut spans = vec![Span::styled(
        " acctop ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(host) = view.host_name {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            host.to_string(),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.extend([
        Span::raw("  "),
        Span::styled(refresh, Style::default().fg(theme.text_secondary)),
        Span::raw("  "),
        Span::styled(state, Style::default().fg(theme.text_secondary)),
    ]);

    Paragraph::new(Line::from(spans)).render(area, buf);
}

/// `2.5`, `1`, `0.25`: no trailing zeros.
fn format_interval(secs: f64) -> String {
    let text = format!("{secs:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

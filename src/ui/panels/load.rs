use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use super::{field, separator};
use crate::system::snapshot::LoadAverage;
use crate::ui::theme::Theme;

pub fn height(average: &LoadAverage) -> u16 {
    if average.tasks.is_some() { 2 } else { 1 }
}

pub fn render(average: &LoadAverage, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let mut spans = field("1 min", format!("{:.2}", average.one), theme);
    spans.push(separator(theme));
    spans.extend(field("5 min", format!("{:.2}", average.five), theme));
    spans.push(separator(theme));
    spans.extend(field("15 min", format!("{:.2}", average.fifteen), theme));

    let mut lines = vec![Line::from(spans)];
    if let Some(tasks) = average.tasks {
        lines.push(Line::from(field(
            "Tasks",
            format!("{} running / {} total", tasks.runnable, tasks.total),
            theme,
        )));
    }
    Paragraph::new(lines).render(area, buf);
}

use crate::convert::CalendarSystem;
use crate::project::Projection;
use crate::theme::{BASE_STYLE, LABEL_STYLE, TITLE_STYLE, VALUE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Widget},
};

const LABEL_WIDTH: usize = 12;

/// Number of rows the panel needs, including its border
pub(crate) const PANEL_HEIGHT: u16 = 7;

/// Shows the weekday, converted date, month name, and day difference of the
/// most recent projection
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ResultPanel<'a> {
    projection: Option<&'a Projection>,
    output_system: CalendarSystem,
}

impl<'a> ResultPanel<'a> {
    pub(crate) fn new(projection: Option<&'a Projection>, output_system: CalendarSystem) -> Self {
        ResultPanel {
            projection,
            output_system,
        }
    }

    fn to_text(self) -> Text<'static> {
        let (weekday, date, month, headline, breakdown) = match self.projection {
            Some(p) => (
                p.weekday.to_string(),
                p.converted.to_string(),
                p.month_name.clone(),
                p.delta.headline(),
                p.delta.breakdown(),
            ),
            None => Default::default(),
        };
        let mut lines = vec![
            slot("Weekday", weekday),
            slot(&self.output_system.to_string(), date),
            slot("Month", month),
            slot("Difference", headline),
        ];
        if let Some(breakdown) = breakdown {
            lines.push(slot("", breakdown));
        }
        Text::from(lines)
    }
}

fn slot(label: &str, value: String) -> Line<'static> {
    Line::from_iter([
        Span::styled(format!("{label:<LABEL_WIDTH$}"), LABEL_STYLE),
        Span::styled(value, VALUE_STYLE),
    ])
}

impl Widget for ResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(Span::styled(format!(" {} ", self.output_system), TITLE_STYLE))
            .title_alignment(Alignment::Center)
            .style(BASE_STYLE);
        Paragraph::new(self.to_text()).block(block).render(area, buf);
    }
}

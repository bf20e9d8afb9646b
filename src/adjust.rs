use crate::settings::{Adjustments, MonthLength};
use crate::theme::{
    adjust::{ACTIVE_FIELD_STYLE, CHOSEN_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE, LABEL_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 27;
const OUTER_HEIGHT: u16 = 9;

/// Width of the text inside the dialog's border
const TEXT_WIDTH: usize = 21;

const LABEL_WIDTH: usize = 12;

/// Most digits that can be typed into the offset field
const MAX_OFFSET_DIGITS: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Adjust;

impl StatefulWidget for Adjust {
    type State = AdjustState;

    /*
     * ...........................
     * .┌───── Adjustments ─────┐.
     * .│                       │.
     * .│ Day offset        -12 │.
     * .│ Month length    29 30 │.
     * .│                       │.
     * .│        [APPLY]        │.
     * .└───────────────────────┘.
     * ...........................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Adjustments ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(2, 1));
        state.to_text().render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum AdjustField {
    #[default]
    Offset,
    MonthLength,
    Apply,
}

impl AdjustField {
    fn next(self) -> AdjustField {
        match self {
            AdjustField::Offset => AdjustField::MonthLength,
            AdjustField::MonthLength => AdjustField::Apply,
            AdjustField::Apply => AdjustField::Offset,
        }
    }

    fn previous(self) -> AdjustField {
        match self {
            AdjustField::Offset => AdjustField::Apply,
            AdjustField::MonthLength => AdjustField::Offset,
            AdjustField::Apply => AdjustField::MonthLength,
        }
    }
}

/// Pending edits in the adjustment dialog.  Nothing takes effect until the
/// edits are applied.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct AdjustState {
    negative: bool,
    digits: Vec<u8>,
    month_length: MonthLength,
    field: AdjustField,
}

impl AdjustState {
    pub(crate) fn new(current: Adjustments) -> AdjustState {
        let digits = if current.day_offset == 0 {
            Vec::new()
        } else {
            current
                .day_offset
                .unsigned_abs()
                .to_string()
                .bytes()
                .map(|b| b - b'0')
                .collect()
        };
        AdjustState {
            negative: current.day_offset < 0,
            digits,
            month_length: current.month_length,
            field: AdjustField::Offset,
        }
    }

    pub(crate) fn field(&self) -> AdjustField {
        self.field
    }

    /// The adjustments as currently entered; an empty offset counts as zero
    pub(crate) fn adjustments(&self) -> Adjustments {
        let magnitude = self
            .digits
            .iter()
            .fold(0i64, |acc, &d| acc.saturating_mul(10).saturating_add(i64::from(d)));
        let offset = if self.negative { -magnitude } else { magnitude };
        Adjustments {
            day_offset: i32::try_from(offset)
                .unwrap_or(if self.negative { i32::MIN } else { i32::MAX }),
            month_length: self.month_length,
        }
    }

    fn to_text(&self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.offset_line(),
            self.month_length_line(),
            Line::styled("", BASE_STYLE),
            Line::from(Span::styled(
                "[APPLY]",
                self.field_style(AdjustField::Apply),
            ))
            .alignment(Alignment::Center),
        ])
    }

    fn offset_line(&self) -> Line<'static> {
        let value = if self.digits.is_empty() {
            Span::styled("0", UNFILLED_CELL_STYLE)
        } else {
            let sign = if self.negative { "-" } else { "" };
            let digits = self
                .digits
                .iter()
                .map(|d| char::from(b'0' + d))
                .collect::<String>();
            Span::styled(format!("{sign}{digits}"), self.field_style(AdjustField::Offset))
        };
        let padding = TEXT_WIDTH.saturating_sub(LABEL_WIDTH + value.width());
        Line::from_iter([
            Span::styled(format!("{:<LABEL_WIDTH$}", "Day offset"), LABEL_STYLE),
            Span::styled(" ".repeat(padding), BASE_STYLE),
            value,
        ])
    }

    fn month_length_line(&self) -> Line<'static> {
        let choice = |length: MonthLength| {
            let style = if self.month_length == length {
                CHOSEN_STYLE
            } else {
                self.field_style(AdjustField::MonthLength)
            };
            Span::styled(format!("{:>3}", length.days()), style)
        };
        let padding = TEXT_WIDTH.saturating_sub(LABEL_WIDTH + 6);
        Line::from_iter([
            Span::styled(format!("{:<LABEL_WIDTH$}", "Month length"), LABEL_STYLE),
            Span::styled(" ".repeat(padding), BASE_STYLE),
            choice(MonthLength::TwentyNine),
            choice(MonthLength::Thirty),
        ])
    }

    fn field_style(&self, field: AdjustField) -> Style {
        if self.field == field {
            ACTIVE_FIELD_STYLE
        } else {
            BASE_STYLE
        }
    }

    pub(crate) fn handle_input(&mut self, input: AdjustInput) -> AdjustOutput {
        match (input, self.field) {
            (AdjustInput::NextField, _) => {
                self.field = self.field.next();
                AdjustOutput::Ok
            }
            (AdjustInput::PreviousField, _) => {
                self.field = self.field.previous();
                AdjustOutput::Ok
            }
            (AdjustInput::Enter, _) => AdjustOutput::Apply(self.adjustments()),
            (AdjustInput::Negative, AdjustField::Offset) => {
                self.negative = !self.negative;
                AdjustOutput::Ok
            }
            (AdjustInput::Positive, AdjustField::Offset) => {
                self.negative = false;
                AdjustOutput::Ok
            }
            (AdjustInput::Digit(d), AdjustField::Offset)
                if d < 10 && self.digits.len() < MAX_OFFSET_DIGITS =>
            {
                if !(self.digits.is_empty() && d == 0) {
                    self.digits.push(d);
                }
                AdjustOutput::Ok
            }
            (AdjustInput::Backspace, AdjustField::Offset) if !self.digits.is_empty() => {
                self.digits.pop();
                AdjustOutput::Ok
            }
            (AdjustInput::Toggle, AdjustField::MonthLength) => {
                self.month_length = self.month_length.toggled();
                AdjustOutput::Ok
            }
            (AdjustInput::Digit(d), AdjustField::MonthLength) => {
                // "9" picks 29 and "0" picks 30
                match d {
                    9 => self.month_length = MonthLength::TwentyNine,
                    0 => self.month_length = MonthLength::Thirty,
                    _ => return AdjustOutput::Invalid,
                }
                AdjustOutput::Ok
            }
            _ => AdjustOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AdjustInput {
    Negative,
    Positive,
    Digit(u8),
    Backspace,
    NextField,
    PreviousField,
    Toggle,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AdjustOutput {
    Ok,
    Invalid,
    Apply(Adjustments),
}

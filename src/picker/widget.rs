use super::column::ColumnKind;
use super::sync::SyncState;
use super::DatePicker;
use crate::theme::{
    picker::{CENTER_STYLE, FOCUS_BORDER_STYLE, MOVING_STYLE, SELECTED_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, StatefulWidget, Widget},
};

/// Width of each column, including its border
const COLUMN_WIDTHS: [u16; 3] = [8, 7, 7];

/// Total width of the picker
pub(crate) const PICKER_WIDTH: u16 = COLUMN_WIDTHS[0] + COLUMN_WIDTHS[1] + COLUMN_WIDTHS[2];

const MARKER_LEFT: &str = "›";
const MARKER_RIGHT: &str = "‹";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Picker;

impl StatefulWidget for Picker {
    type State = DatePicker;

    /*
     * ┌─Year─┐┌Month┐┌─Day─┐
     * │ 2023 ││  10 ││  03 │
     * │ 2024 ││  11 ││  04 │
     * │›2025‹││› 12‹││› 05‹│
     * │ 2026 ││     ││  06 │
     * │ 2027 ││     ││  07 │
     * └──────┘└─────┘└─────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let areas = Layout::horizontal(COLUMN_WIDTHS.map(Constraint::Length)).split(area);
        for (kind, &column_area) in ColumnKind::ALL.into_iter().zip(areas.iter()) {
            let mut block = Block::bordered()
                .title(kind.title())
                .title_alignment(Alignment::Center)
                .style(BASE_STYLE);
            if state.focus() == kind {
                block = block.border_style(FOCUS_BORDER_STYLE);
            }
            let inner = block.inner(column_area);
            block.render(column_area, buf);
            state.set_area(kind, inner);
            render_column(state, kind, inner, buf);
        }
    }
}

fn render_column(state: &DatePicker, kind: ColumnKind, area: Rect, buf: &mut Buffer) {
    let sync = state.column(kind);
    let geometry = sync.geometry();
    let column = sync.column();
    let highlighted = sync.highlighted();
    let center_row = geometry.viewport_height() / 2;
    for (r, y) in (0..geometry.viewport_height().min(area.height)).zip(area.y..) {
        let row_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        };
        if r == center_row {
            buf.set_style(row_area, CENTER_STYLE);
            Line::from(MARKER_LEFT).render(row_area, buf);
            Line::from(MARKER_RIGHT)
                .alignment(Alignment::Right)
                .render(row_area, buf);
        }
        let Some((index, true)) =
            geometry.item_at_row(sync.scroll() + i32::from(r), column.len())
        else {
            continue;
        };
        let Some(item) = column.get(index) else {
            continue;
        };
        let style = if Some(index) != highlighted {
            BASE_STYLE
        } else if sync.state() == SyncState::Idle {
            SELECTED_STYLE
        } else {
            MOVING_STYLE
        };
        let label_area = Rect {
            x: row_area.x.saturating_add(1),
            width: row_area.width.saturating_sub(2),
            ..row_area
        };
        Line::styled(item.label.as_str(), style)
            .alignment(Alignment::Right)
            .render(label_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::CalendarSystem;

    fn lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_render() {
        let mut picker = DatePicker::new(CalendarSystem::Gregorian, Some((2025, 12, 5)));
        let area = Rect::new(0, 0, PICKER_WIDTH, 7);
        let mut buf = Buffer::empty(area);
        Picker.render(area, &mut buf, &mut picker);
        assert_eq!(
            lines(&buf),
            [
                "┌─Year─┐┌Month┐┌─Day─┐",
                "│ 2023 ││  10 ││  03 │",
                "│ 2024 ││  11 ││  04 │",
                "│›2025‹││› 12‹││› 05‹│",
                "│ 2026 ││     ││  06 │",
                "│ 2027 ││     ││  07 │",
                "└──────┘└─────┘└─────┘",
            ]
        );
        assert_eq!(picker.column_at(3, 3), Some(ColumnKind::Year));
        assert_eq!(picker.column_at(17, 1), Some(ColumnKind::Day));
    }

    #[test]
    fn test_render_follows_scroll() {
        let mut picker = DatePicker::new(CalendarSystem::Hijri, Some((1447, 6, 14)));
        let area = Rect::new(0, 0, PICKER_WIDTH, 7);
        let mut buf = Buffer::empty(area);
        Picker.render(area, &mut buf, &mut picker);
        picker.scroll_by(ColumnKind::Month, 3, std::time::Instant::now());
        let mut buf = Buffer::empty(area);
        Picker.render(area, &mut buf, &mut picker);
        let rows = lines(&buf);
        assert_eq!(rows[1], "│ 1445 ││  07 ││  12 │");
        assert_eq!(rows[3], "│›1447‹││› 09‹││› 14‹│");
        assert_eq!(rows[5], "│ 1449 ││  11 ││  16 │");
    }
}

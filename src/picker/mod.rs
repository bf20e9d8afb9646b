mod column;
mod sync;
mod widget;
pub(crate) use self::column::ColumnKind;
pub(crate) use self::sync::Step;
pub(crate) use self::widget::{Picker, PICKER_WIDTH};
use self::column::PickerColumn;
use self::sync::{ColumnGeometry, PickerSynchronizer};
use crate::convert::CalendarSystem;
use ratatui::layout::Rect;
use std::time::Instant;

/// Rows taken up by each picker item
const ITEM_HEIGHT: u16 = 1;

/// Viewport height assumed until the picker is first drawn
const INITIAL_VIEWPORT_HEIGHT: u16 = 7;

/// A year, month, and day as picked, in whichever calendar is the input side
pub(crate) type Ymd = (i32, u8, u8);

/// The three wheels of the date picker, all in the same input calendar
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DatePicker {
    system: CalendarSystem,
    columns: [PickerSynchronizer; 3],
    focus: ColumnKind,
    /// Screen areas of the column viewports as last drawn
    areas: [Rect; 3],
}

impl DatePicker {
    pub(crate) fn new(system: CalendarSystem, position: Option<Ymd>) -> DatePicker {
        let geometry = ColumnGeometry::new(ITEM_HEIGHT, INITIAL_VIEWPORT_HEIGHT);
        let columns = ColumnKind::ALL
            .map(|kind| PickerSynchronizer::new(PickerColumn::new(kind, system), geometry));
        let mut picker = DatePicker {
            system,
            columns,
            focus: ColumnKind::Year,
            areas: [Rect::default(); 3],
        };
        picker.center_on(position);
        picker
    }

    pub(crate) fn system(&self) -> CalendarSystem {
        self.system
    }

    pub(crate) fn focus(&self) -> ColumnKind {
        self.focus
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub(crate) fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub(crate) fn set_focus(&mut self, kind: ColumnKind) {
        self.focus = kind;
    }

    pub(crate) fn column(&self, kind: ColumnKind) -> &PickerSynchronizer {
        &self.columns[kind.index()]
    }

    pub(crate) fn column_mut(&mut self, kind: ColumnKind) -> &mut PickerSynchronizer {
        &mut self.columns[kind.index()]
    }

    /// Replaces every column's items with those for `system` and centers
    /// them on `position`
    pub(crate) fn rebuild(&mut self, system: CalendarSystem, position: Option<Ymd>) {
        tracing::info!(%system, ?position, "Rebuilding picker");
        self.system = system;
        for sync in &mut self.columns {
            let mut column = PickerColumn::new(sync.kind(), system);
            column.select_value(position.map(|ymd| component(ymd, sync.kind())));
            sync.rebuild(column);
        }
    }

    /// Selects and centers `position` (or each column's fallback item)
    pub(crate) fn center_on(&mut self, position: Option<Ymd>) {
        for sync in &mut self.columns {
            let kind = sync.kind();
            sync.center_on(position.map(|ymd| component(ymd, kind)));
        }
    }

    /// The committed values of the three columns
    pub(crate) fn selection(&self) -> SelectionState {
        SelectionState {
            year: self.column(ColumnKind::Year).committed_value(),
            month: self.column(ColumnKind::Month).committed_value(),
            day: self.column(ColumnKind::Day).committed_value(),
        }
    }

    pub(crate) fn step(&mut self, kind: ColumnKind, step: Step, now: Instant) {
        self.column_mut(kind).step(step, now);
    }

    pub(crate) fn scroll_by(&mut self, kind: ColumnKind, rows: i32, now: Instant) {
        self.column_mut(kind).scroll_by(rows, now);
    }

    pub(crate) fn swipe(&mut self, kind: ColumnKind, delta_rows: i32, now: Instant) {
        self.column_mut(kind).swipe(delta_rows, now);
    }

    /// Runs every column's due transitions.  Returns `true` if any column
    /// committed a value.
    pub(crate) fn tick(&mut self, now: Instant) -> bool {
        let mut committed = false;
        for sync in &mut self.columns {
            committed |= sync.tick(now).is_some();
        }
        committed
    }

    /// Advances every column's motion by one frame.  Returns `true` if any
    /// column is still moving.
    pub(crate) fn advance_motion(&mut self) -> bool {
        let mut moving = false;
        for sync in &mut self.columns {
            moving |= sync.advance_motion();
        }
        moving
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.columns.iter().any(PickerSynchronizer::is_animating)
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.columns
            .iter()
            .filter_map(PickerSynchronizer::next_deadline)
            .min()
    }

    /// The column whose viewport contains the given screen cell
    pub(crate) fn column_at(&self, x: u16, y: u16) -> Option<ColumnKind> {
        ColumnKind::ALL.into_iter().find(|kind| {
            let area = self.areas[kind.index()];
            area.x <= x && x < area.right() && area.y <= y && y < area.bottom()
        })
    }

    /// Rows scrolled by a page movement in the given column
    pub(crate) fn half_page(&self, kind: ColumnKind) -> i32 {
        let geometry = self.column(kind).geometry();
        i32::from((geometry.viewport_height() / 2).max(geometry.item_height()))
    }

    fn set_area(&mut self, kind: ColumnKind, area: Rect) {
        self.areas[kind.index()] = area;
        self.column_mut(kind).set_viewport_height(area.height);
    }
}

fn component(ymd: Ymd, kind: ColumnKind) -> i32 {
    let (year, month, day) = ymd;
    match kind {
        ColumnKind::Year => year,
        ColumnKind::Month => i32::from(month),
        ColumnKind::Day => i32::from(day),
    }
}

/// The currently committed value of each column
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct SelectionState {
    pub(crate) year: Option<i32>,
    pub(crate) month: Option<i32>,
    pub(crate) day: Option<i32>,
}

impl SelectionState {
    /// Returns `None` if any column has no committed value
    pub(crate) fn ymd(&self) -> Option<Ymd> {
        let year = self.year?;
        let month = u8::try_from(self.month?).ok()?;
        let day = u8::try_from(self.day?).ok()?;
        Some((year, month, day))
    }
}

//! Per-column scroll synchronization.
//!
//! Each picker column turns continuous scrolling, wheel ticks, and swipes
//! into a single committed item.  A column is always in one of four states:
//!
//! - `Idle`: at rest, with exactly one item selected
//! - `Scrolling`: the scroll position is being changed directly; the item
//!   nearest the viewport center is tracked on every change
//! - `Settling`: scrolling went quiet, and the view is being driven to center
//!   the nearest item before it is committed
//! - `Stepping`: a wheel tick or swipe moved one item forwards or backwards,
//!   and the view is being driven to center it before it is committed
//!
//! Each column holds at most one pending timed transition.  Every qualifying
//! event replaces it.

use super::column::{ColumnKind, PickerColumn};
use std::time::{Duration, Instant};

/// How long scrolling must stay quiet before the column settles
pub(crate) const SCROLL_QUIET: Duration = Duration::from_millis(120);

/// Time allowed for the settling motion before the final commit pass
pub(crate) const SETTLE_DELAY: Duration = Duration::from_millis(220);

/// Time allowed for the stepping motion before the final commit pass
pub(crate) const STEP_DELAY: Duration = Duration::from_millis(180);

/// Swipes covering fewer rows than this are ignored
pub(crate) const MIN_SWIPE_ROWS: i32 = 1;

/// Vertical layout of a column as rendered.
///
/// Positions are measured in rows of the column's content, with row 0 being
/// the top of the first item; the scroll offset is the content row shown at
/// the top of the viewport.  Centers are computed in doubled rows so that
/// half rows stay exact.  The viewport height is kept odd so that any item
/// center can be brought exactly to the viewport center.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ColumnGeometry {
    item_height: u16,
    viewport_height: u16,
}

impl ColumnGeometry {
    pub(crate) fn new(item_height: u16, viewport_height: u16) -> ColumnGeometry {
        ColumnGeometry {
            item_height: item_height.max(1),
            viewport_height: if viewport_height % 2 == 0 {
                viewport_height.saturating_sub(1).max(1)
            } else {
                viewport_height
            },
        }
    }

    pub(crate) fn item_height(&self) -> u16 {
        self.item_height
    }

    /// The number of viewport rows actually used
    pub(crate) fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    /// Twice the content row at the center of the item at `index`
    pub(crate) fn item_center2(&self, index: usize) -> i64 {
        let h = i64::from(self.item_height);
        to_i64(index).saturating_mul(2 * h).saturating_add(h)
    }

    /// Twice the content row at the center of the viewport when scrolled to
    /// `scroll`
    pub(crate) fn viewport_center2(&self, scroll: i32) -> i64 {
        2 * i64::from(scroll) + i64::from(self.viewport_height)
    }

    /// The scroll offset at which the item at `index` is centered
    pub(crate) fn centering_offset(&self, index: usize) -> i32 {
        let offset = (self.item_center2(index) - i64::from(self.viewport_height)).div_euclid(2);
        i32::try_from(offset).unwrap_or(i32::MAX)
    }

    /// The item occupying content row `row`, if any, and whether `row` is
    /// that item's center row
    pub(crate) fn item_at_row(&self, row: i32, len: usize) -> Option<(usize, bool)> {
        let row = usize::try_from(row).ok()?;
        let h = usize::from(self.item_height);
        let index = row / h;
        (index < len).then_some((index, row % h == h / 2))
    }
}

/// Returns the index of the center nearest to `target`.  On a tie, the
/// earliest center wins.
pub(crate) fn nearest_item<I>(centers: I, target: i64) -> Option<usize>
where
    I: IntoIterator<Item = i64>,
{
    let mut best: Option<(usize, u64)> = None;
    for (i, center) in centers.into_iter().enumerate() {
        let distance = center.abs_diff(target);
        match best {
            Some((_, d)) if d <= distance => (),
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum SyncState {
    Idle,
    Scrolling,
    Settling,
    Stepping,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Step {
    Previous,
    Next,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Transition {
    Settle,
    Commit,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct Pending {
    due: Instant,
    transition: Transition,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PickerSynchronizer {
    column: PickerColumn,
    geometry: ColumnGeometry,
    /// Current rendered scroll offset
    scroll: i32,
    /// Scroll offset the view is being driven towards
    target: Option<i32>,
    /// Item nearest the viewport center while not at rest
    nearest: Option<usize>,
    state: SyncState,
    pending: Option<Pending>,
}

impl PickerSynchronizer {
    pub(crate) fn new(column: PickerColumn, geometry: ColumnGeometry) -> PickerSynchronizer {
        let mut sync = PickerSynchronizer {
            column,
            geometry,
            scroll: 0,
            target: None,
            nearest: None,
            state: SyncState::Idle,
            pending: None,
        };
        sync.jump_to_selected();
        sync
    }

    pub(crate) fn kind(&self) -> ColumnKind {
        self.column.kind()
    }

    pub(crate) fn column(&self) -> &PickerColumn {
        &self.column
    }

    pub(crate) fn geometry(&self) -> ColumnGeometry {
        self.geometry
    }

    pub(crate) fn state(&self) -> SyncState {
        self.state
    }

    pub(crate) fn scroll(&self) -> i32 {
        self.scroll
    }

    /// The value of the committed item
    pub(crate) fn committed_value(&self) -> Option<i32> {
        self.column.selected_value()
    }

    /// The item to show as current: the committed item at rest, otherwise
    /// the item the column is moving to
    pub(crate) fn highlighted(&self) -> Option<usize> {
        match self.state {
            SyncState::Idle => self.column.selected_index(),
            _ => self.nearest.or_else(|| self.column.selected_index()),
        }
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Replaces the column's items, dropping any in-flight interaction, and
    /// centers the column's selected item
    pub(crate) fn rebuild(&mut self, column: PickerColumn) {
        self.column = column;
        self.reset();
    }

    /// Selects the item with the given value (or the fallback item) and
    /// centers it immediately
    pub(crate) fn center_on(&mut self, value: Option<i32>) {
        self.column.select_value(value);
        self.reset();
    }

    /// Called by the renderer with the number of rows available for items
    pub(crate) fn set_viewport_height(&mut self, height: u16) {
        let geometry = ColumnGeometry::new(self.geometry.item_height, height);
        if geometry == self.geometry {
            return;
        }
        self.geometry = geometry;
        if self.state == SyncState::Idle {
            self.jump_to_selected();
        } else {
            self.scroll = self.clamp_scroll(self.scroll);
            if self.target.is_some() {
                self.target = self.highlighted().map(|i| self.geometry.centering_offset(i));
            }
        }
    }

    /// Moves the scroll position by `rows` (positive scrolls towards later
    /// items) and restarts the quiet period
    pub(crate) fn scroll_by(&mut self, rows: i32, now: Instant) {
        if self.column.is_empty() {
            return;
        }
        let scroll = self.clamp_scroll(self.scroll.saturating_add(rows));
        if scroll == self.scroll {
            return;
        }
        self.scroll = scroll;
        self.target = None;
        self.nearest = self.nearest_now();
        if self.state != SyncState::Scrolling {
            tracing::debug!(column = ?self.kind(), "Scrolling");
        }
        self.state = SyncState::Scrolling;
        self.schedule(Transition::Settle, now + SCROLL_QUIET);
    }

    /// Moves one item forwards or backwards, clamped to the ends of the
    /// column
    pub(crate) fn step(&mut self, step: Step, now: Instant) {
        let Some(last) = self.column.len().checked_sub(1) else {
            return;
        };
        let current = self.highlighted().unwrap_or(0);
        let index = match step {
            Step::Previous => current.saturating_sub(1),
            Step::Next => current.saturating_add(1).min(last),
        };
        tracing::debug!(column = ?self.kind(), from = current, to = index, "Stepping");
        self.nearest = Some(index);
        self.drive_to(index);
        self.state = SyncState::Stepping;
        self.schedule(Transition::Commit, now + STEP_DELAY);
    }

    /// Handles a swipe that moved `delta_rows` rows downwards (negative for
    /// upwards).  Swiping up advances to the next item.
    pub(crate) fn swipe(&mut self, delta_rows: i32, now: Instant) {
        if delta_rows.abs() < MIN_SWIPE_ROWS {
            return;
        }
        self.step(
            if delta_rows < 0 {
                Step::Next
            } else {
                Step::Previous
            },
            now,
        );
    }

    /// Moves the rendered scroll position one frame closer to the driven
    /// target.  Returns `true` if the view is still moving afterwards.
    pub(crate) fn advance_motion(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let distance = target - self.scroll;
        // Cover half the remaining distance per frame, at least one row
        let stride = (distance.abs() + 1) / 2;
        self.scroll += stride * distance.signum();
        if self.scroll == target {
            self.target = None;
        }
        self.target.is_some()
    }

    /// Runs the pending transition if it is due.  Returns the committed value
    /// if a commit pass ran.
    pub(crate) fn tick(&mut self, now: Instant) -> Option<i32> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        match pending.transition {
            Transition::Settle => {
                self.nearest = self.nearest_now();
                if let Some(i) = self.nearest {
                    self.drive_to(i);
                }
                tracing::debug!(column = ?self.kind(), nearest = ?self.nearest, "Settling");
                self.state = SyncState::Settling;
                self.schedule(Transition::Commit, now + SETTLE_DELAY);
                None
            }
            Transition::Commit => self.commit(),
        }
    }

    fn commit(&mut self) -> Option<i32> {
        let index = self.nearest_now()?;
        self.column.select(index);
        self.nearest = None;
        self.state = SyncState::Idle;
        // The motion may not have finished within the delay, and may have
        // been heading elsewhere; drive towards the committed item instead.
        let offset = self.geometry.centering_offset(index);
        self.target = (self.scroll != offset).then_some(offset);
        let value = self.column.selected_value();
        tracing::debug!(column = ?self.kind(), ?value, "Committed");
        value
    }

    fn schedule(&mut self, transition: Transition, due: Instant) {
        self.pending = Some(Pending { due, transition });
    }

    fn reset(&mut self) {
        self.pending = None;
        self.nearest = None;
        self.state = SyncState::Idle;
        self.jump_to_selected();
    }

    fn jump_to_selected(&mut self) {
        self.target = None;
        if let Some(i) = self.column.selected_index() {
            self.scroll = self.geometry.centering_offset(i);
        }
    }

    fn drive_to(&mut self, index: usize) {
        self.target = Some(self.geometry.centering_offset(index));
    }

    fn nearest_now(&self) -> Option<usize> {
        let geometry = self.geometry;
        nearest_item(
            (0..self.column.len()).map(|i| geometry.item_center2(i)),
            geometry.viewport_center2(self.scroll),
        )
    }

    fn clamp_scroll(&self, scroll: i32) -> i32 {
        match self.column.len().checked_sub(1) {
            Some(last) => scroll.clamp(
                self.geometry.centering_offset(0),
                self.geometry.centering_offset(last),
            ),
            None => scroll,
        }
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::CalendarSystem;
    use crate::picker::column::PickerItem;
    use proptest::prelude::*;

    fn month_sync() -> PickerSynchronizer {
        PickerSynchronizer::new(
            PickerColumn::new(ColumnKind::Month, CalendarSystem::Gregorian),
            ColumnGeometry::new(1, 7),
        )
    }

    fn settle_motion(sync: &mut PickerSynchronizer) {
        while sync.advance_motion() {}
    }

    /// Item whose center is nearest the viewport center, computed the long
    /// way
    fn centered_item(sync: &PickerSynchronizer) -> Option<usize> {
        let g = sync.geometry();
        let center = g.viewport_center2(sync.scroll());
        (0..sync.column().len()).min_by_key(|&i| (g.item_center2(i).abs_diff(center), i))
    }

    #[test]
    fn test_geometry() {
        let g = ColumnGeometry::new(1, 7);
        assert_eq!(g.item_center2(0), 1);
        assert_eq!(g.item_center2(3), 7);
        assert_eq!(g.centering_offset(0), -3);
        assert_eq!(g.centering_offset(5), 2);
        assert_eq!(g.viewport_center2(2), g.item_center2(5));
        assert_eq!(g.item_at_row(-1, 12), None);
        assert_eq!(g.item_at_row(4, 12), Some((4, true)));
        assert_eq!(g.item_at_row(12, 12), None);
    }

    #[test]
    fn test_geometry_even_viewport() {
        let g = ColumnGeometry::new(1, 8);
        assert_eq!(g.viewport_height(), 7);
        let g = ColumnGeometry::new(3, 6);
        assert_eq!(g.viewport_height(), 5);
        assert_eq!(g.centering_offset(2), 5);
        assert_eq!(g.viewport_center2(5), g.item_center2(2));
        assert_eq!(g.item_at_row(6, 4), Some((2, false)));
        assert_eq!(g.item_at_row(7, 4), Some((2, true)));
    }

    #[test]
    fn test_nearest_item() {
        assert_eq!(nearest_item([1, 3, 5, 7], 4), Some(1));
        assert_eq!(nearest_item([1, 3, 5, 7], 6), Some(2));
        assert_eq!(nearest_item([1, 3, 5, 7], 100), Some(3));
        assert_eq!(nearest_item(Vec::new(), 4), None);
    }

    #[test]
    fn test_nearest_item_irregular() {
        // Centers of items of heights 1, 6, 2
        assert_eq!(nearest_item([1, 8, 16], 12), Some(1));
        assert_eq!(nearest_item([1, 8, 16], 13), Some(2));
    }

    #[test]
    fn test_new_is_centered_and_idle() {
        let sync = month_sync();
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.committed_value(), Some(1));
        assert_eq!(sync.scroll(), -3);
        assert_eq!(sync.next_deadline(), None);
    }

    #[test]
    fn test_scroll_then_settle() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.scroll_by(4, t0);
        assert_eq!(sync.state(), SyncState::Scrolling);
        assert_eq!(sync.highlighted(), Some(4));
        assert_eq!(sync.committed_value(), Some(1));
        assert_eq!(sync.next_deadline(), Some(t0 + SCROLL_QUIET));
        assert_eq!(sync.tick(t0 + SCROLL_QUIET - Duration::from_millis(1)), None);
        assert_eq!(sync.state(), SyncState::Scrolling);
        assert_eq!(sync.tick(t0 + SCROLL_QUIET), None);
        assert_eq!(sync.state(), SyncState::Settling);
        settle_motion(&mut sync);
        assert_eq!(sync.tick(t0 + SCROLL_QUIET + SETTLE_DELAY), Some(5));
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.column().selected_index(), Some(4));
        assert_eq!(sync.scroll(), sync.geometry().centering_offset(4));
    }

    #[test]
    fn test_scroll_debounce() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.scroll_by(1, t0);
        let t1 = t0 + Duration::from_millis(100);
        sync.scroll_by(1, t1);
        assert_eq!(sync.tick(t0 + SCROLL_QUIET), None);
        assert_eq!(sync.state(), SyncState::Scrolling);
        assert_eq!(sync.next_deadline(), Some(t1 + SCROLL_QUIET));
        sync.tick(t1 + SCROLL_QUIET);
        assert_eq!(sync.state(), SyncState::Settling);
    }

    #[test]
    fn test_scroll_clamped() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.scroll_by(-5, t0);
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.next_deadline(), None);
        sync.scroll_by(100, t0);
        assert_eq!(sync.scroll(), sync.geometry().centering_offset(11));
        assert_eq!(sync.highlighted(), Some(11));
    }

    #[test]
    fn test_wheel_step() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.step(Step::Next, t0);
        assert_eq!(sync.state(), SyncState::Stepping);
        assert_eq!(sync.highlighted(), Some(1));
        assert!(sync.is_animating());
        settle_motion(&mut sync);
        assert_eq!(sync.tick(t0 + STEP_DELAY), Some(2));
        assert_eq!(sync.state(), SyncState::Idle);
        assert!(!sync.is_animating());
    }

    #[test]
    fn test_rapid_steps_accumulate() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.step(Step::Next, t0);
        let t1 = t0 + Duration::from_millis(50);
        sync.step(Step::Next, t1);
        sync.step(Step::Next, t1);
        assert_eq!(sync.next_deadline(), Some(t1 + STEP_DELAY));
        settle_motion(&mut sync);
        assert_eq!(sync.tick(t0 + STEP_DELAY), None);
        assert_eq!(sync.tick(t1 + STEP_DELAY), Some(4));
    }

    #[test]
    fn test_step_clamped() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.step(Step::Previous, t0);
        settle_motion(&mut sync);
        assert_eq!(sync.tick(t0 + STEP_DELAY), Some(1));
    }

    #[test]
    fn test_swipe() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.swipe(0, t0);
        assert_eq!(sync.state(), SyncState::Idle);
        sync.swipe(-3, t0);
        assert_eq!(sync.state(), SyncState::Stepping);
        settle_motion(&mut sync);
        assert_eq!(sync.tick(t0 + STEP_DELAY), Some(2));
        sync.swipe(2, t0 + STEP_DELAY);
        settle_motion(&mut sync);
        assert_eq!(sync.tick(t0 + STEP_DELAY * 2), Some(1));
    }

    #[test]
    fn test_step_during_settling_replaces_commit() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.scroll_by(3, t0);
        sync.tick(t0 + SCROLL_QUIET);
        assert_eq!(sync.state(), SyncState::Settling);
        let t1 = t0 + SCROLL_QUIET + Duration::from_millis(10);
        sync.step(Step::Next, t1);
        assert_eq!(sync.state(), SyncState::Stepping);
        settle_motion(&mut sync);
        assert_eq!(sync.tick(t1 + STEP_DELAY), Some(5));
        assert_eq!(sync.tick(t0 + SCROLL_QUIET + SETTLE_DELAY), None);
        assert_eq!(sync.next_deadline(), None);
    }

    #[test]
    fn test_commit_before_motion_finishes() {
        let mut sync = PickerSynchronizer::new(
            PickerColumn::new(ColumnKind::Year, CalendarSystem::Gregorian),
            ColumnGeometry::new(1, 9),
        );
        let t0 = Instant::now();
        sync.step(Step::Next, t0);
        // No frames were drawn, so the view never moved
        assert_eq!(sync.tick(t0 + STEP_DELAY), Some(1112));
        assert_eq!(sync.state(), SyncState::Idle);
        assert!(!sync.is_animating());
    }

    #[test]
    fn test_empty_column_is_noop() {
        let mut sync = PickerSynchronizer::new(
            PickerColumn::with_items(ColumnKind::Day, Vec::new()),
            ColumnGeometry::new(1, 7),
        );
        let t0 = Instant::now();
        sync.scroll_by(3, t0);
        sync.step(Step::Next, t0);
        sync.swipe(-4, t0);
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.next_deadline(), None);
        assert_eq!(sync.tick(t0 + SETTLE_DELAY), None);
        assert!(!sync.advance_motion());
        assert_eq!(sync.committed_value(), None);
    }

    #[test]
    fn test_center_on_cancels_pending() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.scroll_by(2, t0);
        sync.center_on(Some(9));
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.next_deadline(), None);
        assert_eq!(sync.committed_value(), Some(9));
        assert_eq!(sync.scroll(), sync.geometry().centering_offset(8));
    }

    #[test]
    fn test_rebuild() {
        let mut sync = PickerSynchronizer::new(
            PickerColumn::new(ColumnKind::Day, CalendarSystem::Gregorian),
            ColumnGeometry::new(1, 7),
        );
        sync.center_on(Some(31));
        let mut column = PickerColumn::new(ColumnKind::Day, CalendarSystem::Hijri);
        column.select_value(Some(30));
        sync.rebuild(column);
        assert_eq!(sync.column().len(), 30);
        assert_eq!(sync.committed_value(), Some(30));
        assert_eq!(sync.scroll(), sync.geometry().centering_offset(29));
    }

    #[test]
    fn test_resize_recenters() {
        let mut sync = month_sync();
        sync.center_on(Some(6));
        sync.set_viewport_height(11);
        assert_eq!(sync.geometry().viewport_height(), 11);
        assert_eq!(sync.scroll(), 0);
        assert_eq!(sync.committed_value(), Some(6));
    }

    #[test]
    fn test_irregular_items() {
        let items = (1..=5)
            .map(|value| PickerItem {
                value,
                label: value.to_string(),
            })
            .collect();
        let mut sync = PickerSynchronizer::new(
            PickerColumn::with_items(ColumnKind::Month, items),
            ColumnGeometry::new(3, 9),
        );
        let t0 = Instant::now();
        sync.scroll_by(4, t0);
        assert_eq!(sync.highlighted(), Some(1));
        sync.scroll_by(1, t0);
        assert_eq!(sync.highlighted(), Some(2));
        sync.tick(t0 + SCROLL_QUIET);
        settle_motion(&mut sync);
        assert_eq!(sync.tick(t0 + SCROLL_QUIET + SETTLE_DELAY), Some(3));
    }

    #[test]
    fn test_settles_on_nearest_after_mixed_input() {
        let mut sync = PickerSynchronizer::new(
            PickerColumn::new(ColumnKind::Day, CalendarSystem::Gregorian),
            ColumnGeometry::new(1, 9),
        );
        let mut now = Instant::now();
        let script: [(u8, i32); 8] = [
            (0, 7),
            (1, 0),
            (0, -2),
            (2, -4),
            (0, 11),
            (1, 0),
            (2, 3),
            (0, 40),
        ];
        for (kind, amount) in script {
            match kind {
                0 => sync.scroll_by(amount, now),
                1 => sync.step(Step::Next, now),
                _ => sync.swipe(amount, now),
            }
            sync.advance_motion();
            now += Duration::from_millis(40);
            sync.tick(now);
        }
        for _ in 0..3 {
            settle_motion(&mut sync);
            now += SETTLE_DELAY;
            sync.tick(now);
        }
        settle_motion(&mut sync);
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.next_deadline(), None);
        assert_eq!(sync.column().selected_index(), centered_item(&sync));
        assert_eq!(sync.committed_value(), Some(31));
    }

    #[test]
    fn test_commit_before_motion_centers_committed_item() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.step(Step::Next, t0);
        assert_eq!(sync.tick(t0 + STEP_DELAY), Some(1));
        settle_motion(&mut sync);
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.column().selected_index(), Some(0));
        assert_eq!(centered_item(&sync), Some(0));
    }

    #[test]
    fn test_scroll_then_step_without_frames() {
        let mut sync = month_sync();
        let t0 = Instant::now();
        sync.scroll_by(1, t0);
        sync.step(Step::Next, t0);
        assert_eq!(sync.tick(t0 + STEP_DELAY), Some(2));
        settle_motion(&mut sync);
        assert_eq!(sync.column().selected_index(), Some(1));
        assert_eq!(centered_item(&sync), Some(1));
    }

    /// A single user interaction with a column
    #[derive(Clone, Copy, Debug)]
    enum Input {
        Scroll(i32),
        Step(Step),
        Swipe(i32),
    }

    fn input() -> impl Strategy<Value = Input> {
        prop_oneof![
            (-12i32..=12).prop_map(Input::Scroll),
            any::<bool>().prop_map(|next| Input::Step(if next { Step::Next } else { Step::Previous })),
            (-4i32..=4).prop_map(Input::Swipe),
        ]
    }

    proptest! {
        #[test]
        fn settles_on_nearest_item(
            item_height in 1u16..=3,
            viewport_height in 1u16..=15,
            inputs in prop::collection::vec((input(), 0u8..4, 0u64..400), 0..24),
        ) {
            let mut sync = PickerSynchronizer::new(
                PickerColumn::new(ColumnKind::Day, CalendarSystem::Gregorian),
                ColumnGeometry::new(item_height, viewport_height),
            );
            let mut now = Instant::now();
            for (input, frames, wait_ms) in inputs {
                match input {
                    Input::Scroll(rows) => sync.scroll_by(rows, now),
                    Input::Step(step) => sync.step(step, now),
                    Input::Swipe(rows) => sync.swipe(rows, now),
                }
                for _ in 0..frames {
                    sync.advance_motion();
                }
                now += Duration::from_millis(wait_ms);
                sync.tick(now);
            }
            // A settle followed by its commit needs two passes
            for _ in 0..3 {
                settle_motion(&mut sync);
                now += SETTLE_DELAY;
                sync.tick(now);
            }
            settle_motion(&mut sync);
            prop_assert_eq!(sync.state(), SyncState::Idle);
            prop_assert_eq!(sync.next_deadline(), None);
            prop_assert_eq!(sync.column().selected_index(), centered_item(&sync));
        }
    }
}

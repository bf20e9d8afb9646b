use crate::convert::CalendarSystem;
use std::ops::RangeInclusive;

/// Years offered by the year column, in either calendar
pub(crate) const YEAR_RANGE: RangeInclusive<i32> = 1..=2222;

const MONTHS: RangeInclusive<i32> = 1..=12;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ColumnKind {
    Year,
    Month,
    Day,
}

impl ColumnKind {
    pub(crate) const ALL: [ColumnKind; 3] = [ColumnKind::Year, ColumnKind::Month, ColumnKind::Day];

    pub(crate) fn index(self) -> usize {
        match self {
            ColumnKind::Year => 0,
            ColumnKind::Month => 1,
            ColumnKind::Day => 2,
        }
    }

    pub(crate) fn next(self) -> ColumnKind {
        match self {
            ColumnKind::Year => ColumnKind::Month,
            ColumnKind::Month => ColumnKind::Day,
            ColumnKind::Day => ColumnKind::Year,
        }
    }

    pub(crate) fn previous(self) -> ColumnKind {
        match self {
            ColumnKind::Year => ColumnKind::Day,
            ColumnKind::Month => ColumnKind::Year,
            ColumnKind::Day => ColumnKind::Month,
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            ColumnKind::Year => "Year",
            ColumnKind::Month => "Month",
            ColumnKind::Day => "Day",
        }
    }

    fn items(self, system: CalendarSystem) -> Vec<PickerItem> {
        match self {
            ColumnKind::Year => YEAR_RANGE
                .map(|y| PickerItem {
                    value: y,
                    label: y.to_string(),
                })
                .collect(),
            ColumnKind::Month => MONTHS.map(PickerItem::padded).collect(),
            ColumnKind::Day => (1..=i32::from(system.max_day()))
                .map(PickerItem::padded)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct PickerItem {
    pub(crate) value: i32,
    pub(crate) label: String,
}

impl PickerItem {
    fn padded(value: i32) -> PickerItem {
        PickerItem {
            value,
            label: format!("{value:02}"),
        }
    }
}

/// The items of one picker column and which of them is selected.
///
/// Invariant: `selected` is `Some` and in range whenever `items` is nonempty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PickerColumn {
    kind: ColumnKind,
    items: Vec<PickerItem>,
    selected: Option<usize>,
}

impl PickerColumn {
    pub(crate) fn new(kind: ColumnKind, system: CalendarSystem) -> PickerColumn {
        PickerColumn::with_items(kind, kind.items(system))
    }

    pub(crate) fn with_items(kind: ColumnKind, items: Vec<PickerItem>) -> PickerColumn {
        let mut column = PickerColumn {
            kind,
            items,
            selected: None,
        };
        column.selected = column.fallback_index();
        column
    }

    pub(crate) fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub(crate) fn items(&self) -> &[PickerItem] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&PickerItem> {
        self.items.get(index)
    }

    pub(crate) fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub(crate) fn selected_value(&self) -> Option<i32> {
        self.selected.and_then(|i| self.get(i)).map(|item| item.value)
    }

    /// Selects the item at `index`, clamped to the last item.  Does nothing
    /// on an empty column.
    pub(crate) fn select(&mut self, index: usize) {
        if let Some(last) = self.len().checked_sub(1) {
            self.selected = Some(index.min(last));
        }
    }

    pub(crate) fn position_of(&self, value: i32) -> Option<usize> {
        self.items.iter().position(|item| item.value == value)
    }

    /// The item to select when a wanted value has no item: the middle year,
    /// or the first month or day
    pub(crate) fn fallback_index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else if self.kind == ColumnKind::Year {
            Some(self.len() / 2)
        } else {
            Some(0)
        }
    }

    /// Selects the item with the given value, or the fallback item if there
    /// is none
    pub(crate) fn select_value(&mut self, value: Option<i32>) {
        if let Some(i) = value
            .and_then(|v| self.position_of(v))
            .or_else(|| self.fallback_index())
        {
            self.selected = Some(i);
        }
    }
}

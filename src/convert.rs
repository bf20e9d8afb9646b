use crate::settings::{Adjustments, MonthLength};
use std::fmt;
use thiserror::Error;
use time::{macros::date, Date, Month};

/// Gregorian half of the anchor pair
const ANCHOR_GREGORIAN: Date = date!(2025 - 12 - 05);

/// Hijri half of the anchor pair
const ANCHOR_HIJRI: HijriDate = HijriDate {
    year: 1447,
    month: 6,
    day: 14,
};

const MONTHS_IN_YEAR: i64 = 12;

static HIJRI_MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Akhir",
    "Jumada al-Ula",
    "Jumada al-Akhirah",
    "Rajab",
    "Shaban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qadah",
    "Dhu al-Hijjah",
];

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum CalendarSystem {
    #[default]
    Gregorian,
    Hijri,
}

impl CalendarSystem {
    pub(crate) fn other(self) -> CalendarSystem {
        match self {
            CalendarSystem::Gregorian => CalendarSystem::Hijri,
            CalendarSystem::Hijri => CalendarSystem::Gregorian,
        }
    }

    /// Number of day items offered for this calendar's picker
    pub(crate) fn max_day(self) -> u8 {
        match self {
            CalendarSystem::Gregorian => 31,
            CalendarSystem::Hijri => 30,
        }
    }
}

impl fmt::Display for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarSystem::Gregorian => write!(f, "Gregorian"),
            CalendarSystem::Hijri => write!(f, "Hijri"),
        }
    }
}

/// A date in the approximated Hijri calendar, in which every month has the
/// same configured length
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct HijriDate {
    year: i32,
    month: u8,
    day: u8,
}

impl HijriDate {
    pub(crate) fn new(
        year: i32,
        month: u8,
        day: u8,
        month_length: MonthLength,
    ) -> Result<HijriDate, ConvertError> {
        if (1..=12).contains(&month) && (1..=month_length.days()).contains(&day) {
            Ok(HijriDate { year, month, day })
        } else {
            Err(ConvertError::InvalidDate { year, month, day })
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> u8 {
        self.month
    }

    pub(crate) fn day(&self) -> u8 {
        self.day
    }

    pub(crate) fn month_name(&self) -> &'static str {
        HIJRI_MONTH_NAMES[usize::from(self.month - 1) % HIJRI_MONTH_NAMES.len()]
    }

    /// Position of this date on a single day-count axis on which every month
    /// is `month_length` days long
    fn linear_index(&self, month_length: MonthLength) -> i64 {
        (i64::from(self.year) * MONTHS_IN_YEAR + i64::from(self.month))
            * i64::from(month_length.days())
            + i64::from(self.day)
    }

    // Carrying day overflow into months and month overflow into years one
    // step at a time lands on the unique (year, month, day) with the given
    // index, month in 1..=12 and day in 1..=month_length, which is what the
    // Euclidean divisions below compute directly.
    fn from_linear_index(index: i64, month_length: MonthLength) -> Result<HijriDate, ConvertError> {
        let length = i64::from(month_length.days());
        let months = (index - 1).div_euclid(length);
        let day = (index - 1).rem_euclid(length) + 1;
        let year = (months - 1).div_euclid(MONTHS_IN_YEAR);
        let month = (months - 1).rem_euclid(MONTHS_IN_YEAR) + 1;
        Ok(HijriDate {
            year: i32::try_from(year).map_err(|_| ConvertError::OutOfTime)?,
            month: u8::try_from(month).map_err(|_| ConvertError::OutOfTime)?,
            day: u8::try_from(day).map_err(|_| ConvertError::OutOfTime)?,
        })
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.day)
    }
}

/// Converts a Gregorian date to the approximated Hijri calendar.
///
/// The whole-day distance from the anchor Gregorian date, plus the
/// configured day offset, is applied to the anchor Hijri date.  Since `Date`
/// carries no time of day, a caller holding a timestamp should pass its
/// (local) date, which floors away any partial day.
pub(crate) fn to_hijri(date: Date, adjustments: Adjustments) -> Result<HijriDate, ConvertError> {
    let distance = i64::from(date.to_julian_day()) - i64::from(ANCHOR_GREGORIAN.to_julian_day());
    let index = ANCHOR_HIJRI.linear_index(adjustments.month_length)
        + distance
        + i64::from(adjustments.day_offset);
    HijriDate::from_linear_index(index, adjustments.month_length)
}

/// Converts an approximated Hijri date back to the Gregorian calendar.  This
/// is the exact inverse of [`to_hijri()`] for the same adjustments.
pub(crate) fn to_gregorian(
    year: i32,
    month: u8,
    day: u8,
    adjustments: Adjustments,
) -> Result<Date, ConvertError> {
    let target = HijriDate::new(year, month, day, adjustments.month_length)?;
    let distance = target.linear_index(adjustments.month_length)
        - ANCHOR_HIJRI.linear_index(adjustments.month_length)
        - i64::from(adjustments.day_offset);
    let julian = i64::from(ANCHOR_GREGORIAN.to_julian_day()) + distance;
    let julian = i32::try_from(julian).map_err(|_| ConvertError::OutOfTime)?;
    Date::from_julian_day(julian).map_err(|_| ConvertError::OutOfTime)
}

/// A date in either calendar, validated against the month lengths in effect
/// when it was built
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum CalendarDate {
    Gregorian(Date),
    Hijri(HijriDate),
}

impl CalendarDate {
    pub(crate) fn from_ymd(
        system: CalendarSystem,
        year: i32,
        month: u8,
        day: u8,
        adjustments: Adjustments,
    ) -> Result<CalendarDate, ConvertError> {
        match system {
            CalendarSystem::Gregorian => {
                let invalid = ConvertError::InvalidDate { year, month, day };
                let m = Month::try_from(month).map_err(|_| invalid)?;
                Date::from_calendar_date(year, m, day)
                    .map(CalendarDate::Gregorian)
                    .map_err(|_| invalid)
            }
            CalendarSystem::Hijri => {
                HijriDate::new(year, month, day, adjustments.month_length).map(CalendarDate::Hijri)
            }
        }
    }

    pub(crate) fn system(&self) -> CalendarSystem {
        match self {
            CalendarDate::Gregorian(_) => CalendarSystem::Gregorian,
            CalendarDate::Hijri(_) => CalendarSystem::Hijri,
        }
    }

    pub(crate) fn ymd(&self) -> (i32, u8, u8) {
        match self {
            CalendarDate::Gregorian(d) => (d.year(), u8::from(d.month()), d.day()),
            CalendarDate::Hijri(h) => (h.year(), h.month(), h.day()),
        }
    }

    pub(crate) fn month_name(&self) -> String {
        match self {
            CalendarDate::Gregorian(d) => d.month().to_string(),
            CalendarDate::Hijri(h) => h.month_name().to_owned(),
        }
    }

    /// The same day expressed in the other calendar
    pub(crate) fn counterpart(&self, adjustments: Adjustments) -> Result<CalendarDate, ConvertError> {
        match self {
            CalendarDate::Gregorian(d) => to_hijri(*d, adjustments).map(CalendarDate::Hijri),
            CalendarDate::Hijri(h) => {
                to_gregorian(h.year, h.month, h.day, adjustments).map(CalendarDate::Gregorian)
            }
        }
    }

    /// The Gregorian representation of this day, used for weekdays and day
    /// differences
    pub(crate) fn gregorian(&self, adjustments: Adjustments) -> Result<Date, ConvertError> {
        match self {
            CalendarDate::Gregorian(d) => Ok(*d),
            CalendarDate::Hijri(h) => to_gregorian(h.year, h.month, h.day, adjustments),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.ymd();
        write!(f, "{year}/{month}/{day}")
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConvertError {
    #[error("reached the end of time")]
    OutOfTime,
    #[error("no such date: {year}/{month}/{day}")]
    InvalidDate { year: i32, month: u8, day: u8 },
}

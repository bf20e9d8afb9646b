use crate::convert::{CalendarDate, CalendarSystem, ConvertError};
use crate::picker::SelectionState;
use crate::settings::Adjustments;
use std::fmt;
use time::{Date, Weekday};

const DAYS_IN_YEAR: u64 = 365;
const DAYS_IN_MONTH: u64 = 30;

/// Everything shown for one picked date
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Projection {
    pub(crate) weekday: Weekday,
    pub(crate) converted: CalendarDate,
    pub(crate) month_name: String,
    pub(crate) delta: DayDelta,
}

impl Projection {
    pub(crate) fn new(
        input: CalendarDate,
        adjustments: Adjustments,
        today: Date,
    ) -> Result<Projection, ConvertError> {
        let converted = input.counterpart(adjustments)?;
        let gregorian = input.gregorian(adjustments)?;
        Ok(Projection {
            weekday: gregorian.weekday(),
            converted,
            month_name: converted.month_name(),
            delta: DayDelta::between(gregorian, today),
        })
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weekday: {}", self.weekday)?;
        writeln!(f, "{}: {}", self.converted.system(), self.converted)?;
        writeln!(f, "Month: {}", self.month_name)?;
        write!(f, "Difference: {}", self.delta.headline())?;
        if let Some(breakdown) = self.delta.breakdown() {
            write!(f, "\n            {breakdown}")?;
        }
        Ok(())
    }
}

/// Signed number of days from today to a date
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct DayDelta(i64);

impl DayDelta {
    pub(crate) fn between(date: Date, today: Date) -> DayDelta {
        DayDelta((date - today).whole_days())
    }

    pub(crate) fn days(self) -> i64 {
        self.0
    }

    /// The absolute day count and whether it lies ahead or behind
    pub(crate) fn headline(self) -> String {
        let days = self.0.unsigned_abs();
        match self.0.signum() {
            0 => String::from("0 days"),
            1 => format!("{} remaining", plural(days, "day")),
            _ => format!("{} elapsed", plural(days, "day")),
        }
    }

    /// The absolute day count broken down into 365-day years, 30-day months,
    /// and days, leaving out zero components.  Returns `None` for today.
    pub(crate) fn breakdown(self) -> Option<String> {
        let days = self.0.unsigned_abs();
        if days == 0 {
            return None;
        }
        let years = days / DAYS_IN_YEAR;
        let months = (days % DAYS_IN_YEAR) / DAYS_IN_MONTH;
        let rest = (days % DAYS_IN_YEAR) % DAYS_IN_MONTH;
        let parts = [(years, "year"), (months, "month"), (rest, "day")]
            .into_iter()
            .filter(|&(n, _)| n > 0)
            .map(|(n, unit)| plural(n, unit))
            .collect::<Vec<_>>();
        Some(format!("equivalent to {}", parts.join(" and ")))
    }
}

impl fmt::Display for DayDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline())?;
        if let Some(breakdown) = self.breakdown() {
            write!(f, "\n{breakdown}")?;
        }
        Ok(())
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Keeps the displayed result in step with the picker.  When the picked
/// values do not form a date, the previous result stays on display.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ResultProjector {
    today: Date,
    output: Option<Projection>,
}

impl ResultProjector {
    pub(crate) fn new(today: Date) -> ResultProjector {
        ResultProjector {
            today,
            output: None,
        }
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    /// Replaces the date that differences are measured from.  Returns `true`
    /// if it changed.
    pub(crate) fn set_today(&mut self, today: Date) -> bool {
        if today == self.today {
            return false;
        }
        tracing::info!(%today, "Local date changed");
        self.today = today;
        true
    }

    pub(crate) fn output(&self) -> Option<&Projection> {
        self.output.as_ref()
    }

    /// Recomputes the result for the given selection.  Returns `false` if
    /// the selection was skipped and the previous result kept.
    pub(crate) fn refresh(
        &mut self,
        selection: SelectionState,
        system: CalendarSystem,
        adjustments: Adjustments,
    ) -> bool {
        let Some((year, month, day)) = selection.ymd() else {
            tracing::debug!(?selection, "Incomplete selection; keeping previous result");
            return false;
        };
        match CalendarDate::from_ymd(system, year, month, day, adjustments)
            .and_then(|input| Projection::new(input, adjustments, self.today))
        {
            Ok(projection) => {
                tracing::debug!(converted = %projection.converted, days = projection.delta.days(), "Projected");
                self.output = Some(projection);
                true
            }
            Err(e) => {
                tracing::debug!("Skipping projection: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::HijriDate;
    use crate::settings::MonthLength;
    use time::macros::date;

    fn selection(year: i32, month: i32, day: i32) -> SelectionState {
        SelectionState {
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }
    }

    #[test]
    fn test_delta_zero() {
        let delta = DayDelta::between(date!(2025 - 12 - 05), date!(2025 - 12 - 05));
        assert_eq!(delta.headline(), "0 days");
        assert_eq!(delta.breakdown(), None);
        assert_eq!(delta.to_string(), "0 days");
    }

    #[test]
    fn test_delta_400_days_ahead() {
        let today = date!(2025 - 01 - 01);
        let delta = DayDelta::between(today + time::Duration::days(400), today);
        assert_eq!(delta.days(), 400);
        assert_eq!(delta.headline(), "400 days remaining");
        assert_eq!(
            delta.breakdown().as_deref(),
            Some("equivalent to 1 year and 1 month and 5 days")
        );
    }

    #[test]
    fn test_delta_elapsed() {
        let delta = DayDelta::between(date!(2025 - 11 - 05), date!(2025 - 12 - 05));
        assert_eq!(delta.days(), -30);
        assert_eq!(
            delta.to_string(),
            "30 days elapsed\nequivalent to 1 month"
        );
    }

    #[test]
    fn test_delta_skips_zero_components() {
        let delta = DayDelta(731);
        assert_eq!(delta.headline(), "731 days remaining");
        assert_eq!(
            delta.breakdown().as_deref(),
            Some("equivalent to 2 years and 1 day")
        );
        let delta = DayDelta(-1);
        assert_eq!(delta.headline(), "1 day elapsed");
        assert_eq!(delta.breakdown().as_deref(), Some("equivalent to 1 day"));
    }

    #[test]
    fn test_refresh_gregorian() {
        let mut projector = ResultProjector::new(date!(2025 - 12 - 05));
        assert!(projector.refresh(
            selection(2025, 12, 5),
            CalendarSystem::Gregorian,
            Adjustments::default()
        ));
        let output = projector.output().unwrap();
        assert_eq!(output.weekday, Weekday::Friday);
        assert_eq!(output.converted.to_string(), "1447/6/14");
        assert_eq!(output.month_name, "Jumada al-Akhirah");
        assert_eq!(output.delta.days(), 0);
    }

    #[test]
    fn test_refresh_hijri() {
        let mut projector = ResultProjector::new(date!(2025 - 12 - 05));
        assert!(projector.refresh(
            selection(1447, 7, 1),
            CalendarSystem::Hijri,
            Adjustments::default()
        ));
        let output = projector.output().unwrap();
        assert_eq!(
            output.converted,
            CalendarDate::Gregorian(date!(2025 - 12 - 22))
        );
        assert_eq!(output.weekday, Weekday::Monday);
        assert_eq!(output.month_name, "December");
        assert_eq!(output.delta.headline(), "17 days remaining");
    }

    #[test]
    fn test_refresh_keeps_last_on_invalid() {
        let mut projector = ResultProjector::new(date!(2025 - 12 - 05));
        let adj = Adjustments::default();
        assert!(projector.refresh(selection(2025, 12, 5), CalendarSystem::Gregorian, adj));
        let before = projector.output().cloned();
        assert!(!projector.refresh(selection(2025, 2, 31), CalendarSystem::Gregorian, adj));
        assert!(!projector.refresh(SelectionState::default(), CalendarSystem::Gregorian, adj));
        let short = Adjustments {
            day_offset: 0,
            month_length: MonthLength::TwentyNine,
        };
        assert!(!projector.refresh(selection(1447, 6, 30), CalendarSystem::Hijri, short));
        assert_eq!(projector.output().cloned(), before);
    }

    #[test]
    fn test_refresh_reads_current_adjustments() {
        let mut projector = ResultProjector::new(date!(2025 - 12 - 05));
        let shifted = Adjustments {
            day_offset: 1,
            month_length: MonthLength::Thirty,
        };
        assert!(projector.refresh(selection(2025, 12, 5), CalendarSystem::Gregorian, shifted));
        assert_eq!(
            projector.output().map(|p| p.converted),
            Some(CalendarDate::Hijri(
                HijriDate::new(1447, 6, 15, MonthLength::Thirty).unwrap()
            ))
        );
    }

    #[test]
    fn test_display() {
        let projection = Projection::new(
            CalendarDate::Gregorian(date!(2025 - 12 - 06)),
            Adjustments::default(),
            date!(2025 - 12 - 05),
        )
        .unwrap();
        assert_eq!(
            projection.to_string(),
            [
                "Weekday: Saturday",
                "Hijri: 1447/6/15",
                "Month: Jumada al-Akhirah",
                "Difference: 1 day remaining",
                "            equivalent to 1 day",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_set_today() {
        let mut projector = ResultProjector::new(date!(2025 - 12 - 05));
        let adj = Adjustments::default();
        projector.refresh(selection(2025, 12, 10), CalendarSystem::Gregorian, adj);
        assert_eq!(projector.output().map(|p| p.delta.days()), Some(5));
        assert!(!projector.set_today(date!(2025 - 12 - 05)));
        assert!(projector.set_today(date!(2025 - 12 - 06)));
        assert_eq!(projector.today(), date!(2025 - 12 - 06));
        projector.refresh(selection(2025, 12, 10), CalendarSystem::Gregorian, adj);
        assert_eq!(projector.output().map(|p| p.delta.days()), Some(4));
    }
}

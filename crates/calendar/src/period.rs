use mealcal_shared::format_date;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use time::{Date, Duration};

use crate::{month_boundary, week_boundary};

#[derive(
    EnumString, Display, AsRefStr, Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Week,
    Month,
}

/// A contiguous, inclusive date range under view.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub mode: ViewMode,
    pub start: Date,
    pub end: Date,
}

impl Period {
    pub fn week(pivot: Date) -> Self {
        let week = week_boundary(pivot);
        Self {
            mode: ViewMode::Week,
            start: week.start,
            end: week.end,
        }
    }

    pub fn month(pivot: Date) -> Self {
        let month = month_boundary(pivot);
        Self {
            mode: ViewMode::Month,
            start: month.start,
            end: month.end,
        }
    }

    pub fn of(mode: ViewMode, pivot: Date) -> Self {
        match mode {
            ViewMode::Week => Self::week(pivot),
            ViewMode::Month => Self::month(pivot),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.next_day()).take_while(move |d| *d <= end)
    }

    pub fn len(&self) -> usize {
        ((self.end - self.start).whole_days() + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Same-mode period immediately after this one.
    pub fn next(&self) -> Self {
        match self.end.next_day() {
            Some(day) => Self::of(self.mode, day),
            None => *self,
        }
    }

    /// Same-mode period immediately before this one.
    pub fn previous(&self) -> Self {
        match self.start.previous_day() {
            Some(day) => Self::of(self.mode, day),
            None => *self,
        }
    }

    /// Shifts a week period by whole weeks; month periods by whole months.
    pub fn shift(&self, steps: i32) -> Self {
        match self.mode {
            ViewMode::Week => self
                .start
                .checked_add(Duration::weeks(i64::from(steps)))
                .map_or(*self, Self::week),
            ViewMode::Month => {
                let mut period = *self;
                for _ in 0..steps.unsigned_abs() {
                    period = if steps > 0 {
                        period.next()
                    } else {
                        period.previous()
                    };
                }
                period
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}..{}",
            self.mode,
            format_date(self.start),
            format_date(self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_switching_mode_keeps_pivot() {
        let pivot = date!(2024 - 06 - 04);

        assert_eq!(
            Period::of(ViewMode::Week, pivot),
            Period {
                mode: ViewMode::Week,
                start: date!(2024 - 06 - 03),
                end: date!(2024 - 06 - 09),
            }
        );
        assert_eq!(
            Period::of(ViewMode::Month, pivot),
            Period {
                mode: ViewMode::Month,
                start: date!(2024 - 06 - 01),
                end: date!(2024 - 06 - 30),
            }
        );
    }

    #[test]
    fn test_days_and_len() {
        let week = Period::week(date!(2024 - 06 - 04));
        assert_eq!(week.len(), 7);
        assert_eq!(week.days().count(), 7);
        assert!(week.contains(date!(2024 - 06 - 09)));
        assert!(!week.contains(date!(2024 - 06 - 10)));

        let month = Period::month(date!(2024 - 02 - 04));
        assert_eq!(month.len(), 29);
        assert_eq!(month.days().last(), Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn test_navigation() {
        let week = Period::week(date!(2024 - 06 - 04));
        assert_eq!(week.previous().start, date!(2024 - 05 - 27));
        assert_eq!(week.next().start, date!(2024 - 06 - 10));
        assert_eq!(week.shift(-2).start, date!(2024 - 05 - 20));

        let month = Period::month(date!(2024 - 01 - 31));
        assert_eq!(month.next().start, date!(2024 - 02 - 01));
        assert_eq!(month.previous().end, date!(2023 - 12 - 31));
        assert_eq!(month.shift(3).start, date!(2024 - 04 - 01));
        assert_eq!(month.shift(-1), month.previous());
    }

    #[test]
    fn test_navigation_stops_at_range_ends() {
        let last = Period::week(Date::MAX);
        assert_eq!(last.len(), 5);
        assert_eq!(last.next(), last);
        assert_eq!(last.shift(1), last);

        let first = Period::week(Date::MIN);
        assert_eq!(first.previous(), first);
        assert_eq!(first.shift(-1), first);
    }

    #[test]
    fn test_display() {
        let week = Period::week(date!(2024 - 06 - 04));
        assert_eq!(week.to_string(), "week 2024-06-03..2024-06-09");
    }
}

use time::{Date, Duration};

/// Monday-start week containing a pivot date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBoundary {
    pub start: Date,
    pub end: Date,
    pub days: [Date; 7],
}

/// Calendar month containing a pivot date.
///
/// `days` is laid out for a 7-column grid starting on Monday: the leading
/// columns before the 1st are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBoundary {
    pub start: Date,
    pub end: Date,
    pub days: Vec<Option<Date>>,
}

impl MonthBoundary {
    pub fn leading_blanks(&self) -> usize {
        self.days.iter().take_while(|d| d.is_none()).count()
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.days.iter().flatten().copied()
    }

    /// Grid rows of seven cells; the last row may be shorter.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Date>]> {
        self.days.chunks(7)
    }
}

/// ISO weekday number: Monday = 1 .. Sunday = 7.
pub fn iso_weekday(date: Date) -> u8 {
    date.weekday().number_from_monday()
}

/// The Monday-start week holding `pivot`.
///
/// In the last week of the `time::Date` range the days past `Date::MAX`
/// repeat `Date::MAX`.
pub fn week_boundary(pivot: Date) -> WeekBoundary {
    let days_since_monday = i64::from(iso_weekday(pivot)) - 1;
    let start = pivot
        .checked_sub(Duration::days(days_since_monday))
        .unwrap_or(Date::MIN);

    let mut days = [start; 7];
    for (offset, day) in days.iter_mut().enumerate() {
        *day = start
            .checked_add(Duration::days(offset as i64))
            .unwrap_or(Date::MAX);
    }

    WeekBoundary {
        start,
        end: days[6],
        days,
    }
}

pub fn days_in_month(date: Date) -> u8 {
    time::util::days_in_year_month(date.year(), date.month())
}

pub fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

pub fn month_boundary(pivot: Date) -> MonthBoundary {
    let start = first_of_month(pivot);
    let len = days_in_month(pivot);
    let end = start + Duration::days(i64::from(len) - 1);
    let leading = usize::from(iso_weekday(start)) - 1;

    let mut days = Vec::with_capacity(leading + usize::from(len));
    days.resize(leading, None);
    days.extend((0..i64::from(len)).map(|offset| Some(start + Duration::days(offset))));

    MonthBoundary { start, end, days }
}

/// 1-based week of the month on a Monday-start grid; week 1 is the row
/// holding the 1st, whatever weekday that is.
pub fn week_number(date: Date) -> u8 {
    let offset = iso_weekday(first_of_month(date));
    (date.day() + offset - 2) / 7 + 1
}

use mealcal_calendar::{Period, ViewMode, month_boundary, week_boundary, week_number};
use time::{Duration, Weekday, macros::date};

fn every_day_of_2024_and_2025() -> impl Iterator<Item = time::Date> {
    let start = date!(2024 - 01 - 01);
    (0..731).map(move |offset| start + Duration::days(offset))
}

#[test]
fn week_boundary_always_has_seven_consecutive_days_from_monday() {
    for day in every_day_of_2024_and_2025() {
        let week = week_boundary(day);

        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].weekday(), Weekday::Monday, "pivot {day}");
        assert!(week.days.contains(&day));
        for pair in week.days.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }
}

#[test]
fn month_boundary_is_blanks_plus_every_day() {
    for day in every_day_of_2024_and_2025() {
        let month = month_boundary(day);
        let blanks = month.leading_blanks();

        assert!(blanks < 7);
        assert_eq!(month.days.len(), blanks + usize::from(month.end.day()));
        assert_eq!(month.days[blanks].map(|d| d.day()), Some(1));
        assert_eq!(
            month.dates().next().map(|d| d.weekday().number_days_from_monday()),
            Some(blanks as u8)
        );
    }
}

#[test]
fn week_number_grows_within_month_and_resets() {
    let mut previous: Option<(time::Date, u8)> = None;

    for day in every_day_of_2024_and_2025() {
        let number = week_number(day);

        if let Some((prev_day, prev_number)) = previous {
            if prev_day.month() == day.month() {
                assert!(number >= prev_number, "{day} went back");
                assert!(number - prev_number <= 1);
            } else {
                assert_eq!(number, 1, "{day} did not reset");
            }
        }

        previous = Some((day, number));
    }
}

#[test]
fn week_number_matches_month_grid_row() {
    for day in every_day_of_2024_and_2025() {
        let month = month_boundary(day);
        let row = month
            .rows()
            .position(|row| row.contains(&Some(day)))
            .expect("day on grid");

        assert_eq!(usize::from(week_number(day)), row + 1);
    }
}

#[test]
fn view_mode_parses_from_cli_strings() {
    assert_eq!("week".parse::<ViewMode>().unwrap(), ViewMode::Week);
    assert_eq!("month".parse::<ViewMode>().unwrap(), ViewMode::Month);

    let json = serde_json::to_string(&ViewMode::Month).unwrap();
    assert_eq!(json, "\"month\"");
}

#[test]
fn period_shift_round_trips_navigation() {
    let week = Period::week(date!(2024 - 12 - 31));
    assert_eq!(week.shift(5).shift(-5), week);

    let month = Period::month(date!(2024 - 12 - 31));
    assert_eq!(month.next().previous(), month);
}

pub mod calendar;
pub mod plan;
pub mod shopping;
pub mod template;

use mealcal_shared::parse_date;
use time::{Date, OffsetDateTime};

pub fn parse_date_arg(value: &str) -> Result<Date, String> {
    parse_date(value).map_err(|e| e.to_string())
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

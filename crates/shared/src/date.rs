use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, Result};

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Result<Date> {
    Date::parse(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::Invalid(format!("invalid date `{value}`: {e}")))
}

pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parses a `YYYY-MM` month key into the first day of that month.
pub fn parse_month(value: &str) -> Result<Date> {
    let value = value.trim();
    if value.len() != 7 {
        crate::bail!("invalid month `{value}`: expected YYYY-MM");
    }

    Date::parse(&format!("{value}-01"), DATE_FORMAT)
        .map_err(|e| Error::Invalid(format!("invalid month `{value}`: {e}")))
}

pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

/// Serde adapter for `YYYY-MM-DD` dates.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_date(&value).map_err(D::Error::custom)
    }
}

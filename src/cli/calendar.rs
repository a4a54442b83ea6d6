use anyhow::Result;
use mealcal_calendar::{month_boundary, week_boundary};
use mealcal_shared::format_date;
use time::Date;

pub fn week(date: Option<Date>) -> Result<()> {
    let week = week_boundary(date.unwrap_or_else(super::today));

    println!("{} .. {}", format_date(week.start), format_date(week.end));
    for day in week.days {
        println!("  {:<9} {}", day.weekday(), format_date(day));
    }

    Ok(())
}

pub fn month(date: Option<Date>) -> Result<()> {
    let month = month_boundary(date.unwrap_or_else(super::today));

    println!("{} {}", month.start.month(), month.start.year());
    println!(" Mo Tu We Th Fr Sa Su");
    for row in month.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|day| match day {
                Some(day) => format!("{:>3}", day.day()),
                None => "   ".to_owned(),
            })
            .collect();
        println!("{}", cells.concat());
    }

    Ok(())
}

pub fn week_number(date: Date) -> Result<()> {
    println!("{}", mealcal_calendar::week_number(date));

    Ok(())
}

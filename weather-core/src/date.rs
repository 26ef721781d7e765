use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

/// Human-readable date, e.g. `"Monday, 15 January 2024"`.
pub fn format_date(date: &NaiveDate) -> String {
    format!("{}, {} {} {}", date.format("%A"), date.day(), date.format("%B"), date.year())
}

/// Like [`format_date`], using the calendar date in the timestamp's own zone.
pub fn format_datetime<Tz: TimeZone>(when: &DateTime<Tz>) -> String {
    format_date(&when.date_naive())
}

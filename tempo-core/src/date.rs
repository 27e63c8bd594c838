//! Due-date parsing helpers
//!
//! Accepts ISO dates ("2026-09-01"), a few human formats ("Sep 1",
//! "Sep 1 2026"), relative words ("today", "tomorrow"), weekday names
//! ("friday", "next friday"), and offsets ("in 3 days", "in 2 weeks").

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc, Weekday};

use crate::error::{Result, TaskError};

/// Parse a date string into a due timestamp (end of that day, UTC)
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>> {
    let date = parse_date(input)?;
    let end_of_day = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| TaskError::invalid("Invalid date"))?;
    Ok(DateTime::from_naive_utc_and_offset(end_of_day, Utc))
}

/// Parse a date string into a `NaiveDate`
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim().to_lowercase();

    if let Some(date) = try_parse_relative(&input) {
        return Ok(date);
    }

    if let Some(date) = try_parse_weekday(&input) {
        return Ok(date);
    }

    if let Some(date) = try_parse_offset(&input) {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
        return Ok(date);
    }

    // Human formats with an explicit year
    for format in ["%b %d %Y", "%B %d %Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&input, format) {
            return Ok(date);
        }
    }

    // Year-less formats roll forward to the next occurrence. Parsing
    // borrows the leap year 2000, so a "Feb 29" can fail to land in the
    // current year; those fall through to the format-hint error below.
    for format in ["%b %d", "%B %d", "%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{} 2000", input), &format!("{} %Y", format))
        {
            let today = Local::now().date_naive();
            let Some(date) = date.with_year(today.year()) else {
                continue;
            };
            if date < today {
                match date.with_year(today.year() + 1) {
                    Some(next) => return Ok(next),
                    None => continue,
                }
            }
            return Ok(date);
        }
    }

    Err(TaskError::invalid(format!(
        "Could not parse date '{}'. Try formats like: 'tomorrow', 'Sep 1', '2026-09-01', 'next monday', 'in 3 days'",
        input
    )))
}

fn try_parse_relative(input: &str) -> Option<NaiveDate> {
    let today = Local::now().date_naive();

    match input {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        _ => None,
    }
}

fn try_parse_weekday(input: &str) -> Option<NaiveDate> {
    let today = Local::now().date_naive();

    let weekday_str = input.strip_prefix("next ").unwrap_or(input);

    let target: Weekday = match weekday_str {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };

    let days = (target.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64
        + 7)
        % 7;
    let days = if days == 0 { 7 } else { days as u64 };

    today.checked_add_days(Days::new(days))
}

fn try_parse_offset(input: &str) -> Option<NaiveDate> {
    let today = Local::now().date_naive();

    let rest = input.strip_prefix("in ")?.trim();
    let (num, unit) = rest.split_once(' ')?;
    let num: u64 = num.trim().parse().ok()?;

    match unit.trim() {
        "day" | "days" => today.checked_add_days(Days::new(num)),
        "week" | "weeks" => today.checked_add_days(Days::new(num * 7)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_today_tomorrow() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date("today").unwrap(), today);
        assert_eq!(parse_date("tomorrow").unwrap(), today + Duration::days(1));
    }

    #[test]
    fn test_parse_iso_date() {
        let date = parse_date("2026-09-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
    }

    #[test]
    fn test_parse_weekday() {
        let date = parse_date("friday").unwrap();
        assert_eq!(date.weekday(), Weekday::Fri);
        assert!(date > Local::now().date_naive());
    }

    #[test]
    fn test_parse_offset() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date("in 3 days").unwrap(), today + Duration::days(3));
        assert_eq!(parse_date("in 2 weeks").unwrap(), today + Duration::days(14));
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn test_parse_feb_29_without_year() {
        // Valid only when the next occurrence lands in a leap year;
        // otherwise the error must carry the format hint
        match parse_date("feb 29") {
            Ok(date) => assert_eq!((date.month(), date.day()), (2, 29)),
            Err(TaskError::InvalidData(msg)) => assert!(msg.contains("Could not parse date")),
            Err(err) => panic!("unexpected error: {}", err),
        }
    }

    #[test]
    fn test_due_date_is_end_of_day() {
        let due = parse_due_date("2026-09-01").unwrap();
        assert_eq!(due.to_rfc3339(), "2026-09-01T23:59:59+00:00");
    }
}

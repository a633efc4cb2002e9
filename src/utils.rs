// src/utils.rs
use anyhow::{Context, Result};
use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

const USER_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp typed by a user or returned by a model.
///
/// RFC 3339 strings keep their offset; naive strings are read in the local
/// time zone.
pub fn parse_user_time(input: &str) -> Result<DateTime<Utc>> {
    parse_time_in(input, &Local)
}

pub fn parse_time_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in USER_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("Time does not exist in the local zone: {}", input));
        }
    }

    anyhow::bail!(
        "Unrecognized time: {}. Use RFC 3339 or YYYY-MM-DD HH:MM",
        input
    )
}

/// Parse `YYYY-MM-DD` as the start of that local day
pub fn parse_user_date(input: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {}. Use YYYY-MM-DD", input))?;
    start_of_day(date, &Local)
}

fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Midnight does not exist on {}", date))
}

/// Sunday-to-Sunday bounds of the week containing `now`, in `tz`
pub fn week_bounds<Tz: TimeZone>(now: DateTime<Tz>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = now.timezone();
    let today = now.date_naive();
    let sunday = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    let start = start_of_day(sunday, &tz)?;
    let end = start_of_day(sunday + Duration::days(7), &tz)?;
    Ok((start, end))
}

/// `MM-DD HH:MM` in local time, for table output
pub fn format_local(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%m-%d %H:%M").to_string()
}

/// Shorten to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn plus8() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_parse_rfc3339_keeps_offset() {
        let t = parse_time_in("2024-02-08T14:00:00+08:00", &Utc).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 2, 8, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_in_zone() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 8, 6, 0, 0).unwrap();
        assert_eq!(parse_time_in("2024-02-08T14:00:00", &plus8()).unwrap(), expected);
        assert_eq!(parse_time_in("2024-02-08 14:00", &plus8()).unwrap(), expected);
        assert!(parse_time_in("next tuesday", &plus8()).is_err());
    }

    #[test]
    fn test_week_bounds_start_on_sunday() {
        // Thursday 2024-02-08 10:00 +08:00
        let now = plus8().with_ymd_and_hms(2024, 2, 8, 10, 0, 0).unwrap();
        let (start, end) = week_bounds(now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 3, 16, 0, 0).unwrap());
        assert_eq!(end - start, Duration::days(7));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}

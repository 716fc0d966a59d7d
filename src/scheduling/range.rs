use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, ParseError, Utc};
use serde::{Deserialize, Serialize};

/// Symbolic time-range token accepted by the session query entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeRange {
    Today,
    Week,
    Month,
}

impl TimeRange {
    /// Lenient token parse: unrecognized tokens mean "no constraint", so the
    /// caller simply skips the range.
    pub fn parse(token: &str) -> Option<TimeRange> {
        match token {
            "today" => Some(TimeRange::Today),
            "week" => Some(TimeRange::Week),
            "month" => Some(TimeRange::Month),
            _ => None,
        }
    }
}

/// An inclusive interval of instants. Ends produced by the resolver land on
/// 23:59:59.999 so the whole final day is covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_range(first: NaiveDate, last: NaiveDate) -> DateRange {
    DateRange {
        start: day_start(first),
        end: day_start(last) + Duration::days(1) - Duration::milliseconds(1),
    }
}

/// Resolve a symbolic range token against a reference instant.
///
/// `week` runs Monday through Sunday regardless of locale. The dashboard uses
/// a different, Sunday-based week (see `dashboard::week_window`); the two
/// conventions are intentionally kept separate.
pub fn resolve(range: TimeRange, now: DateTime<Utc>) -> DateRange {
    let today = now.date_naive();
    match range {
        TimeRange::Today => day_range(today, today),
        TimeRange::Week => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            day_range(monday, monday + Duration::days(6))
        }
        TimeRange::Month => {
            let first = today - Duration::days(today.day0() as i64);
            let last = first + chrono::Months::new(1) - Duration::days(1);
            day_range(first, last)
        }
    }
}

/// Resolve an explicit `YYYY-MM-DD` date to its full-day interval. Takes
/// priority over any symbolic token when both are supplied.
pub fn specific_date(raw: &str) -> Result<DateRange, ParseError> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
    Ok(day_range(date, date))
}

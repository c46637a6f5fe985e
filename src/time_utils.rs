// SPDX-License-Identifier: MIT

//! Shared helpers for calendar-day math and date/time formatting.
//!
//! Day boundaries are computed in the caller's timezone (a fixed UTC
//! offset supplied with the request), so "today" follows the local
//! calendar date rather than a 24h offset from now.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Timelike, Utc};

/// Convert a local naive datetime in the given offset to a UTC instant.
fn local_to_utc(ndt: chrono::NaiveDateTime, tz: FixedOffset) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(ndt - Duration::seconds(i64::from(tz.local_minus_utc()))))
}

/// First instant of the local calendar day, as UTC.
pub fn start_of_day(date: NaiveDate, tz: FixedOffset) -> DateTime<Utc> {
    local_to_utc(date.and_time(chrono::NaiveTime::MIN), tz)
}

/// Last instant of the local calendar day (23:59:59.999), as UTC.
pub fn end_of_day(date: NaiveDate, tz: FixedOffset) -> DateTime<Utc> {
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
    local_to_utc(end, tz)
}

/// Local calendar date of a UTC instant in the given offset.
pub fn local_date(ts: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Drop sub-second precision. Stored rows keep whole seconds so their
/// RFC3339 form sorts lexicographically in range filters.
pub fn truncate_to_secs(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Current UTC time at whole-second precision.
pub fn now_secs() -> DateTime<Utc> {
    truncate_to_secs(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_bounds_utc() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let d = date(2024, 3, 10);

        assert_eq!(
            format_utc_rfc3339(start_of_day(d, tz)),
            "2024-03-10T00:00:00Z"
        );
        assert_eq!(end_of_day(d, tz).to_rfc3339(), "2024-03-10T23:59:59.999+00:00");
    }

    #[test]
    fn test_day_bounds_follow_offset() {
        // UTC-8: local midnight is 08:00 UTC
        let tz = FixedOffset::west_opt(8 * 3600).unwrap();
        let d = date(2024, 3, 10);

        assert_eq!(
            format_utc_rfc3339(start_of_day(d, tz)),
            "2024-03-10T08:00:00Z"
        );
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 02:00 UTC is still the previous day at UTC-8
        let tz = FixedOffset::west_opt(8 * 3600).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap();

        assert_eq!(local_date(ts, tz), date(2024, 3, 9));
    }
}

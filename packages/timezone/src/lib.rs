#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Resolves civil calendar dates in an IANA timezone to UTC instant ranges.
//!
//! A "civil day" is one calendar date as experienced in a specific zone.
//! Its UTC rendering is usually 24 hours wide, but 23 or 25 across a DST
//! transition, so the zone's offset must be looked up per date from tzdata
//! rather than treated as a per-zone constant. `chrono-tz` embeds the tz
//! database and handles the transition rules.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Timezone applied when a caller doesn't specify one.
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

/// Format accepted for civil date strings.
const CIVIL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from resolving a civil date in a timezone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    /// The timezone identifier is not a recognized IANA zone.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The date string is not a parseable `YYYY-MM-DD` calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Resolves a civil date in a timezone to the half-open UTC interval
/// `[start, end)` covering that day.
///
/// `start` is local midnight of `date` expressed in UTC; `end` is local
/// midnight of the following civil date. The interval is exactly one civil
/// day wide in local time, which is 23, 24, or 25 UTC hours depending on
/// DST transitions. Consecutive days tile with no gaps or overlaps: the
/// `end` of one day equals the `start` of the next.
///
/// A local midnight skipped by a spring-forward transition resolves to the
/// first valid local instant of that day; a repeated midnight resolves to
/// its earlier occurrence.
///
/// # Errors
///
/// Returns [`DateRangeError::InvalidTimezone`] if `timezone` is not an
/// IANA zone identifier, or [`DateRangeError::InvalidDate`] if `date` is
/// not a `YYYY-MM-DD` calendar date.
pub fn civil_day_range(
    date: &str,
    timezone: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), DateRangeError> {
    let tz = parse_timezone(timezone)?;
    let day = parse_civil_date(date)?;
    let next = day
        .succ_opt()
        .ok_or_else(|| DateRangeError::InvalidDate(date.to_string()))?;

    let start = local_midnight_utc(day, tz)?;
    let end = local_midnight_utc(next, tz)?;

    Ok((start, end))
}

/// Returns "now" rendered as a `YYYY-MM-DD` civil date in the given zone.
///
/// Near a date boundary this differs between zones: it can already be
/// tomorrow in Sydney while still today in Chicago.
///
/// # Errors
///
/// Returns [`DateRangeError::InvalidTimezone`] if `timezone` is not an
/// IANA zone identifier.
pub fn today(timezone: &str) -> Result<String, DateRangeError> {
    let tz = parse_timezone(timezone)?;
    Ok(Utc::now()
        .with_timezone(&tz)
        .format(CIVIL_DATE_FORMAT)
        .to_string())
}

fn parse_timezone(timezone: &str) -> Result<Tz, DateRangeError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| DateRangeError::InvalidTimezone(timezone.to_string()))
}

fn parse_civil_date(date: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(date, CIVIL_DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(date.to_string()))
}

/// Resolves local midnight of `day` in `tz` to a UTC instant, consulting
/// the zone's transition data for that specific date.
fn local_midnight_utc(day: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, DateRangeError> {
    let midnight = day.and_time(NaiveTime::MIN);

    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        // Clocks fell back across midnight (e.g. America/Havana); the
        // civil day starts at the earlier of the two occurrences.
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        // Clocks sprang forward across midnight (e.g. America/Sao_Paulo
        // before 2019); the day starts at the first instant after the gap.
        LocalResult::None => first_valid_local_instant(midnight, tz),
    }
}

/// Walks forward from a nonexistent local time to the first instant the
/// zone can represent. DST gaps are at most two hours, so the probe is
/// bounded well past that.
fn first_valid_local_instant(from: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, DateRangeError> {
    let mut probe = from;
    for _ in 0..12 {
        probe += Duration::minutes(15);
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    Err(DateRangeError::InvalidDate(from.date().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(date: &str, tz: &str) -> (DateTime<Utc>, DateTime<Utc>) {
        civil_day_range(date, tz).unwrap()
    }

    #[test]
    fn resolves_ordinary_chicago_day() {
        // Dec 25 is CST (UTC-6)
        let (start, end) = range("2024-12-25", "America/Chicago");
        assert_eq!(start.to_rfc3339(), "2024-12-25T06:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-12-26T06:00:00+00:00");
    }

    #[test]
    fn spring_forward_day_is_23_hours() {
        // Chicago loses an hour on 2024-03-10
        let (start, end) = range("2024-03-10", "America/Chicago");
        assert_eq!(start.to_rfc3339(), "2024-03-10T06:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-11T05:00:00+00:00");
        assert_eq!((end - start).num_hours(), 23);
    }

    #[test]
    fn fall_back_day_is_25_hours() {
        // Chicago gains an hour on 2024-11-03
        let (start, end) = range("2024-11-03", "America/Chicago");
        assert_eq!(start.to_rfc3339(), "2024-11-03T05:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-11-04T06:00:00+00:00");
        assert_eq!((end - start).num_hours(), 25);
    }

    #[test]
    fn transition_day_differs_from_fixed_offset_by_one_hour() {
        // A naive fixed UTC-6 rendering of 2024-11-03 would end at
        // 2024-11-04T06:00:00Z too, but its start would be 05:00Z only if
        // the offset were recomputed. Compare against the fixed rendering.
        let (start, end) = range("2024-11-03", "America/Chicago");
        let fixed_start: DateTime<Utc> = "2024-11-03T06:00:00Z".parse().unwrap();
        let fixed_end: DateTime<Utc> = "2024-11-04T06:00:00Z".parse().unwrap();
        assert_eq!((fixed_start - start).num_hours(), 1);
        assert_eq!(end, fixed_end);
    }

    #[test]
    fn consecutive_days_tile_without_gaps() {
        let days = ["2024-11-02", "2024-11-03", "2024-11-04", "2024-11-05"];
        for pair in days.windows(2) {
            let (_, end) = range(pair[0], "America/Chicago");
            let (start, _) = range(pair[1], "America/Chicago");
            assert_eq!(end, start, "gap between {} and {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn midnight_skipped_by_transition_starts_after_gap() {
        // Sao Paulo sprang forward at midnight on 2018-11-04: local
        // 00:00 did not exist, the day began at 01:00 (-02) = 03:00Z.
        let (start, end) = range("2018-11-04", "America/Sao_Paulo");
        assert_eq!(start.to_rfc3339(), "2018-11-04T03:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2018-11-05T02:00:00+00:00");
    }

    #[test]
    fn ambiguous_midnight_resolves_to_earlier_occurrence() {
        // Havana fell back at 01:00 on 2024-11-03, repeating 00:00-00:59.
        // The day starts at the first (CDT, UTC-4) midnight.
        let (start, end) = range("2024-11-03", "America/Havana");
        assert_eq!(start.to_rfc3339(), "2024-11-03T04:00:00+00:00");
        assert_eq!((end - start).num_hours(), 25);
    }

    #[test]
    fn utc_day_is_identity() {
        let (start, end) = range("2024-06-15", "UTC");
        assert_eq!(start.to_rfc3339(), "2024-06-15T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-06-16T00:00:00+00:00");
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = civil_day_range("2024-12-25", "America/Springfield").unwrap_err();
        assert_eq!(
            err,
            DateRangeError::InvalidTimezone("America/Springfield".to_string())
        );
    }

    #[test]
    fn rejects_malformed_date() {
        assert_eq!(
            civil_day_range("12/25/2024", "America/Chicago").unwrap_err(),
            DateRangeError::InvalidDate("12/25/2024".to_string())
        );
        assert_eq!(
            civil_day_range("2024-13-40", "America/Chicago").unwrap_err(),
            DateRangeError::InvalidDate("2024-13-40".to_string())
        );
    }

    #[test]
    fn today_renders_a_civil_date() {
        let date = today("America/Chicago").unwrap();
        assert!(NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn today_rejects_unknown_timezone() {
        assert!(today("not-a-zone").is_err());
    }
}

//! Julian Day conversions and instant parsing.
//!
//! Searches run on Julian Day (UT) values; callers and samples use
//! `DateTime<Utc>`.

use crate::error::{Result, UraniaError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Julian Day of the Unix epoch.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert a UTC datetime to a Julian Day.
pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Convert a Julian Day to a UTC datetime, rounded to the millisecond.
pub fn julian_day_to_datetime(jd: f64) -> Result<DateTime<Utc>> {
    if !jd.is_finite() {
        return Err(UraniaError::invalid_input(format!(
            "Julian Day must be finite, got {jd}"
        )));
    }
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
    Utc.timestamp_millis_opt(millis as i64)
        .single()
        .ok_or_else(|| UraniaError::invalid_input(format!("Julian Day {jd} is out of range")))
}

/// Julian Day at 00:00 UT of a calendar date.
pub fn calendar_to_julian_day(year: i32, month: u32, day: u32) -> Result<f64> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        UraniaError::invalid_input(format!("Invalid calendar date {year}-{month:02}-{day:02}"))
    })?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| UraniaError::invalid_input("Invalid time of day"))?;
    Ok(datetime_to_julian_day(Utc.from_utc_datetime(&midnight)))
}

/// Parse a user-supplied instant.
///
/// Accepts RFC 3339 (`2024-03-20T03:06:00Z`), `YYYY-MM-DD HH:MM:SS` and a
/// bare `YYYY-MM-DD` (midnight UT).
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(UraniaError::invalid_input(format!(
        "Could not parse '{text}' as a date (expected RFC 3339 or YYYY-MM-DD)"
    )))
}

/// Reject non-finite or inverted search windows before any provider call.
pub fn validate_window(start_jd: f64, end_jd: f64) -> Result<()> {
    if !start_jd.is_finite() || !end_jd.is_finite() {
        return Err(UraniaError::invalid_input("Search window bounds must be finite"));
    }
    if end_jd <= start_jd {
        return Err(UraniaError::invalid_input(format!(
            "Search window end ({end_jd}) must be after start ({start_jd})"
        )));
    }
    Ok(())
}

//! Conversion between Unix timestamps and calendar dates.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

use super::{ToolError, ToolResult};

/// Values at or above this magnitude are read as milliseconds in `Auto` mode.
const AUTO_MILLIS_THRESHOLD: i64 = 100_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    Seconds,
    Milliseconds,
    /// Guess from magnitude
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Converted {
    pub seconds: i64,
    pub milliseconds: i64,
    /// RFC 3339 in UTC
    pub iso: String,
    /// `YYYY-MM-DD HH:MM:SS ±HH:MM` in the requested offset
    pub human: String,
}

pub fn from_unix(value: i64, unit: Unit, offset: Option<FixedOffset>) -> ToolResult<Converted> {
    let milliseconds = match unit {
        Unit::Seconds => value.checked_mul(1000),
        Unit::Milliseconds => Some(value),
        Unit::Auto if value.abs() >= AUTO_MILLIS_THRESHOLD => Some(value),
        Unit::Auto => value.checked_mul(1000),
    }
    .ok_or_else(|| ToolError::Timestamp(format!("{value} is out of range")))?;

    let instant = DateTime::from_timestamp_millis(milliseconds)
        .ok_or_else(|| ToolError::Timestamp(format!("{value} is out of range")))?;
    Ok(convert(instant, offset))
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or `YYYY-MM-DD` (UTC midnight).
pub fn from_datetime(text: &str, offset: Option<FixedOffset>) -> ToolResult<Converted> {
    let text = text.trim();
    let instant = DateTime::parse_from_rfc3339(text)
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .or_else(|_| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(|date| Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default()))
        })
        .map_err(|_| ToolError::Timestamp(format!("cannot parse '{text}' as a date")))?;
    Ok(convert(instant, offset))
}

#[must_use]
pub fn now(offset: Option<FixedOffset>) -> Converted {
    convert(Utc::now(), offset)
}

/// Parse `+08:00`, `-0530`, `Z` or whole hours like `8` into an offset.
pub fn parse_offset(text: &str) -> ToolResult<FixedOffset> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| invalid_offset(text));
    }

    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_offset(text));
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.as_str(), "0"),
        4 => digits.split_at(2),
        _ => return Err(invalid_offset(text)),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid_offset(text))?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid_offset(text))?;
    if hours > 14 || minutes >= 60 {
        return Err(invalid_offset(text));
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(|| invalid_offset(text))
}

fn invalid_offset(text: &str) -> ToolError {
    ToolError::Timestamp(format!("invalid UTC offset '{text}'"))
}

fn convert(instant: DateTime<Utc>, offset: Option<FixedOffset>) -> Converted {
    let offset = offset.unwrap_or_else(|| Utc.fix());
    Converted {
        seconds: instant.timestamp(),
        milliseconds: instant.timestamp_millis(),
        iso: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        human: instant
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seconds_and_millis_agree() {
        let from_seconds = from_unix(1_700_000_000, Unit::Seconds, None).unwrap();
        let from_millis = from_unix(1_700_000_000_000, Unit::Milliseconds, None).unwrap();
        assert_eq!(from_seconds, from_millis);
        assert_eq!(from_seconds.iso, "2023-11-14T22:13:20.000Z");
        assert_eq!(from_seconds.human, "2023-11-14 22:13:20 +00:00");
    }

    #[test]
    fn auto_unit_guesses_from_magnitude() {
        assert_eq!(
            from_unix(1_700_000_000, Unit::Auto, None).unwrap().seconds,
            1_700_000_000
        );
        assert_eq!(
            from_unix(1_700_000_000_123, Unit::Auto, None)
                .unwrap()
                .milliseconds,
            1_700_000_000_123
        );
    }

    #[test]
    fn human_rendering_uses_offset() {
        let offset = parse_offset("+08:00").unwrap();
        let converted = from_unix(0, Unit::Seconds, Some(offset)).unwrap();
        assert_eq!(converted.human, "1970-01-01 08:00:00 +08:00");
        assert_eq!(converted.iso, "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn from_datetime_accepts_common_formats() {
        assert_eq!(
            from_datetime("2024-05-01T10:00:00+02:00", None).unwrap().seconds,
            from_datetime("2024-05-01 08:00:00", None).unwrap().seconds
        );
        assert_eq!(
            from_datetime("1970-01-02", None).unwrap().seconds,
            86_400
        );
        assert!(matches!(
            from_datetime("next tuesday", None),
            Err(ToolError::Timestamp(_))
        ));
    }

    #[test]
    fn parse_offset_variants() {
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("-0530").unwrap().local_minus_utc(), -19_800);
        assert_eq!(parse_offset("9").unwrap().local_minus_utc(), 32_400);
        assert!(parse_offset("+25:00").is_err());
        assert!(parse_offset("abc").is_err());
        assert!(parse_offset("aé1").is_err());
        assert!(parse_offset("+é1").is_err());
        assert!(parse_offset("+").is_err());
    }

    #[test]
    fn out_of_range_is_an_error() {
        assert!(from_unix(i64::MAX, Unit::Seconds, None).is_err());
    }
}

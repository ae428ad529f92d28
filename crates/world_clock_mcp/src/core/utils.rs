use chrono::{DateTime, Duration, NaiveDateTime};

use crate::core::error::{WorldClockError, WorldClockResult};

/// Datetime format accepted as plain input and used for converted output
pub const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO input without a seconds field, accepted as a convenience
const ISO_MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Timestamp format stamped onto timezone comparisons (UTC, microsecond precision)
pub const COMPARISON_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// Parse a `+HH:MM` / `-HH:MM` UTC offset string into signed seconds.
///
/// The sign is read together with the hour field and applies to the hours
/// alone; the minute component always adds unsigned, so `-03:30` parses to
/// `-3h + 30m` (-9000 seconds) rather than `-(3h 30m)`.
///
/// # Arguments
/// * `offset` - Offset string as reported by the World Time API
///
/// # Returns
/// * `WorldClockResult<i64>` - Offset in seconds, or an error for strings
///   that do not carry a sign+hour prefix followed by two minute digits
pub fn parse_utc_offset(offset: &str) -> WorldClockResult<i64> {
    let invalid = || WorldClockError::InvalidUtcOffset {
        offset: offset.to_string(),
    };

    let hours: i64 = offset
        .get(0..3)
        .and_then(|field| field.parse().ok())
        .ok_or_else(invalid)?;
    let minutes: i64 = offset
        .get(4..6)
        .and_then(|field| field.parse().ok())
        .ok_or_else(invalid)?;

    Ok(hours * 3600 + minutes * 60)
}

/// Shift a naive datetime from one UTC offset to another.
///
/// The input is treated as wall-clock time in the source offset: subtracting
/// the source offset yields the UTC instant, and adding the target offset
/// yields the target wall-clock time.
pub fn convert_between_offsets(
    datetime: NaiveDateTime,
    from_offset_seconds: i64,
    to_offset_seconds: i64,
) -> WorldClockResult<NaiveDateTime> {
    datetime
        .checked_sub_signed(Duration::seconds(from_offset_seconds))
        .and_then(|utc| utc.checked_add_signed(Duration::seconds(to_offset_seconds)))
        .ok_or_else(|| WorldClockError::DatetimeOutOfRange {
            datetime: datetime.to_string(),
        })
}

/// Parse a user-supplied datetime string into naive wall-clock time.
///
/// Strings containing a `T` separator parse as ISO 8601, with a trailing `Z`
/// normalized to `+00:00` first. An embedded offset is dropped and the civil
/// fields are kept as written. Everything else must match
/// [`NAIVE_DATETIME_FORMAT`].
pub fn parse_input_datetime(datetime_str: &str) -> WorldClockResult<NaiveDateTime> {
    let invalid = || WorldClockError::InvalidDatetimeFormat {
        datetime: datetime_str.to_string(),
    };

    if datetime_str.contains('T') {
        let normalized = match datetime_str.strip_suffix('Z') {
            Some(prefix) => format!("{prefix}+00:00"),
            None => datetime_str.to_string(),
        };
        if let Ok(aware) = DateTime::parse_from_rfc3339(&normalized) {
            return Ok(aware.naive_local());
        }
        if let Ok(naive) = normalized.parse::<NaiveDateTime>() {
            return Ok(naive);
        }
        return NaiveDateTime::parse_from_str(&normalized, ISO_MINUTE_FORMAT)
            .map_err(|_| invalid());
    }

    NaiveDateTime::parse_from_str(datetime_str, NAIVE_DATETIME_FORMAT).map_err(|_| invalid())
}

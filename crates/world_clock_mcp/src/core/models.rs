use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{WorldClockError, WorldClockResult};

/// Zone snapshot as reported by the World Time API.
///
/// Only the fields the tools consume are modeled; anything else in the
/// payload is ignored. `client_ip` is present on IP lookups only, and the
/// day and week counters are not guaranteed on every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneSnapshot {
    pub timezone: String,
    pub datetime: String,
    pub utc_datetime: String,
    pub utc_offset: String,
    pub abbreviation: String,
    pub dst: bool,
    pub unixtime: i64,
    pub client_ip: Option<String>,
    pub day_of_week: Option<i64>,
    pub day_of_year: Option<i64>,
    pub week_number: Option<i64>,
}

/// Request to get current time for a specific timezone
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetCurrentTimeRequest {
    /// Timezone in format 'Area/Location' (e.g., 'America/New_York', 'Europe/London')
    pub timezone: String,
}

/// Request to list available timezones
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetTimezoneListRequest {
    /// Optional area filter (e.g., 'America', 'Europe', 'Asia')
    pub area: Option<String>,
}

/// Request to get current time for an IP address
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetTimeByIpRequest {
    /// Optional IP address. If not provided, uses requester's IP
    pub ip: Option<String>,
}

/// Request to compare current time across timezones
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareTimezonesRequest {
    /// List of timezones to compare
    pub timezones: Vec<String>,
}

/// Request to convert a datetime from one timezone to another
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertTimeRequest {
    /// DateTime string in ISO format or 'YYYY-MM-DD HH:MM:SS'
    pub datetime: String,
    /// Source timezone
    pub from_timezone: String,
    /// Target timezone
    pub to_timezone: String,
}

/// Current time for a single timezone
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CurrentTimeResult {
    /// IANA timezone name as reported by the service
    pub timezone: String,
    /// Local datetime with offset
    pub datetime: String,
    /// Same instant expressed in UTC
    pub utc_datetime: String,
    /// UTC offset in +HH:MM / -HH:MM form
    pub utc_offset: String,
    /// Timezone abbreviation (e.g. EST, GMT)
    pub timezone_abbreviation: String,
    /// Day of week, 0 = Sunday
    pub day_of_week: i64,
    /// Ordinal day of the year
    pub day_of_year: i64,
    /// ISO week number
    pub week_number: i64,
    /// Whether daylight saving time is in effect
    pub dst: bool,
    /// Seconds since the Unix epoch
    pub unix_timestamp: i64,
}

impl CurrentTimeResult {
    pub fn from_snapshot(snapshot: ZoneSnapshot) -> WorldClockResult<Self> {
        Ok(Self {
            timezone: snapshot.timezone,
            datetime: snapshot.datetime,
            utc_datetime: snapshot.utc_datetime,
            utc_offset: snapshot.utc_offset,
            timezone_abbreviation: snapshot.abbreviation,
            day_of_week: require_field(snapshot.day_of_week, "day_of_week")?,
            day_of_year: require_field(snapshot.day_of_year, "day_of_year")?,
            week_number: require_field(snapshot.week_number, "week_number")?,
            dst: snapshot.dst,
            unix_timestamp: snapshot.unixtime,
        })
    }
}

/// Sorted zone catalog produced when the service answers with a plain list
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TimezoneCatalog {
    /// Number of timezones in the listing
    pub count: usize,
    /// Lexicographically sorted timezone names
    pub timezones: Vec<String>,
}

/// Result of a timezone listing query
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TimezoneListing {
    /// The service answered with a list of zone names
    Catalog(TimezoneCatalog),
    /// Any other payload is passed through unchanged
    Passthrough(Value),
}

/// Current time resolved from an IP address
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct IpTimeResult {
    /// IANA timezone name the address resolved to
    pub timezone: String,
    /// Local datetime with offset
    pub datetime: String,
    /// Same instant expressed in UTC
    pub utc_datetime: String,
    /// UTC offset in +HH:MM / -HH:MM form
    pub utc_offset: String,
    /// Timezone abbreviation (e.g. EST, GMT)
    pub timezone_abbreviation: String,
    /// IP address the lookup was answered for, "N/A" when not reported
    pub client_ip: String,
    /// Whether daylight saving time is in effect
    pub dst: bool,
    /// Seconds since the Unix epoch
    pub unix_timestamp: i64,
}

impl IpTimeResult {
    pub fn from_snapshot(snapshot: ZoneSnapshot) -> Self {
        Self {
            timezone: snapshot.timezone,
            datetime: snapshot.datetime,
            utc_datetime: snapshot.utc_datetime,
            utc_offset: snapshot.utc_offset,
            timezone_abbreviation: snapshot.abbreviation,
            client_ip: snapshot.client_ip.unwrap_or_else(|| "N/A".to_string()),
            dst: snapshot.dst,
            unix_timestamp: snapshot.unixtime,
        }
    }
}

/// One row of a timezone comparison
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum ComparisonEntry {
    /// The zone answered; fields mirror the reported snapshot
    Zone {
        timezone: String,
        datetime: String,
        utc_offset: String,
        abbreviation: String,
        dst: bool,
    },
    /// The zone lookup failed; the error stays local to this entry
    Failure { timezone: String, error: String },
}

impl ComparisonEntry {
    pub fn from_snapshot(snapshot: ZoneSnapshot) -> Self {
        ComparisonEntry::Zone {
            timezone: snapshot.timezone,
            datetime: snapshot.datetime,
            utc_offset: snapshot.utc_offset,
            abbreviation: snapshot.abbreviation,
            dst: snapshot.dst,
        }
    }

    pub fn failure(timezone: &str, error: &WorldClockError) -> Self {
        ComparisonEntry::Failure {
            timezone: timezone.to_string(),
            error: error.to_string(),
        }
    }
}

/// Side-by-side view of several timezones at one instant
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct TimezoneComparison {
    /// UTC timestamp the comparison was taken at
    pub timestamp: String,
    /// Number of zones requested
    pub zones_compared: usize,
    /// One entry per requested zone, in request order
    pub results: Vec<ComparisonEntry>,
}

/// A datetime translated from one timezone to another
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TimeConversionResult {
    /// Input datetime string, echoed verbatim
    pub original_datetime: String,
    /// Source timezone as requested
    pub from_timezone: String,
    /// Target timezone as requested
    pub to_timezone: String,
    /// Converted wall-clock time in YYYY-MM-DD HH:MM:SS form
    pub converted_datetime: String,
    /// Current UTC offset of the source zone
    pub from_utc_offset: String,
    /// Current UTC offset of the target zone
    pub to_utc_offset: String,
    /// Abbreviation of the source zone
    pub from_abbreviation: String,
    /// Abbreviation of the target zone
    pub to_abbreviation: String,
}

fn require_field<T>(field: Option<T>, name: &str) -> WorldClockResult<T> {
    field.ok_or_else(|| WorldClockError::UnexpectedPayload {
        message: format!("response missing field `{name}`"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_payload() -> Value {
        json!({
            "abbreviation": "EST",
            "client_ip": "203.0.113.7",
            "datetime": "2024-01-01T12:00:00.000000-05:00",
            "day_of_week": 1,
            "day_of_year": 1,
            "dst": false,
            "dst_from": null,
            "dst_offset": 0,
            "dst_until": null,
            "raw_offset": -18000,
            "timezone": "America/New_York",
            "unixtime": 1704128400,
            "utc_datetime": "2024-01-01T17:00:00.000000+00:00",
            "utc_offset": "-05:00",
            "week_number": 1
        })
    }

    #[test]
    fn test_zone_snapshot_deserializes_wire_payload() {
        let snapshot: ZoneSnapshot = serde_json::from_value(wire_payload()).unwrap();
        assert_eq!(snapshot.timezone, "America/New_York");
        assert_eq!(snapshot.utc_offset, "-05:00");
        assert_eq!(snapshot.abbreviation, "EST");
        assert_eq!(snapshot.unixtime, 1704128400);
        assert_eq!(snapshot.client_ip.as_deref(), Some("203.0.113.7"));
        assert!(!snapshot.dst);
    }

    #[test]
    fn test_zone_snapshot_tolerates_missing_optional_fields() {
        let mut payload = wire_payload();
        let map = payload.as_object_mut().unwrap();
        map.remove("client_ip");
        map.remove("day_of_week");
        map.remove("week_number");

        let snapshot: ZoneSnapshot = serde_json::from_value(payload).unwrap();
        assert!(snapshot.client_ip.is_none());
        assert!(snapshot.day_of_week.is_none());
        assert_eq!(snapshot.day_of_year, Some(1));
    }

    #[test]
    fn test_current_time_result_maps_snapshot_fields() {
        let snapshot: ZoneSnapshot = serde_json::from_value(wire_payload()).unwrap();
        let result = CurrentTimeResult::from_snapshot(snapshot).unwrap();
        assert_eq!(result.timezone, "America/New_York");
        assert_eq!(result.timezone_abbreviation, "EST");
        assert_eq!(result.day_of_week, 1);
        assert_eq!(result.unix_timestamp, 1704128400);
    }

    #[test]
    fn test_current_time_result_requires_day_fields() {
        let mut payload = wire_payload();
        payload.as_object_mut().unwrap().remove("day_of_year");
        let snapshot: ZoneSnapshot = serde_json::from_value(payload).unwrap();

        let err = CurrentTimeResult::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, WorldClockError::UnexpectedPayload { .. }));
        assert!(err.to_string().contains("day_of_year"));
    }

    #[test]
    fn test_ip_time_result_defaults_missing_client_ip() {
        let mut payload = wire_payload();
        payload.as_object_mut().unwrap().remove("client_ip");
        let snapshot: ZoneSnapshot = serde_json::from_value(payload).unwrap();

        let result = IpTimeResult::from_snapshot(snapshot);
        assert_eq!(result.client_ip, "N/A");
    }

    #[test]
    fn test_comparison_entries_serialize_without_enum_tags() {
        let snapshot: ZoneSnapshot = serde_json::from_value(wire_payload()).unwrap();
        let zone = serde_json::to_value(ComparisonEntry::from_snapshot(snapshot)).unwrap();
        assert_eq!(zone["timezone"], "America/New_York");
        assert_eq!(zone["abbreviation"], "EST");
        assert!(zone.get("Zone").is_none());

        let error = WorldClockError::ApiStatus { status: 404 };
        let failure = serde_json::to_value(ComparisonEntry::failure("Bad/Zone", &error)).unwrap();
        assert_eq!(failure["timezone"], "Bad/Zone");
        assert_eq!(failure["error"], "API request failed with status 404");
        assert!(failure.get("Failure").is_none());
    }

    #[test]
    fn test_timezone_listing_serializes_catalog_shape() {
        let listing = TimezoneListing::Catalog(TimezoneCatalog {
            count: 2,
            timezones: vec!["Asia/Tokyo".to_string(), "Europe/London".to_string()],
        });
        let value = serde_json::to_value(listing).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["timezones"][0], "Asia/Tokyo");

        let passthrough = TimezoneListing::Passthrough(json!({"detail": "rate limited"}));
        let value = serde_json::to_value(passthrough).unwrap();
        assert_eq!(value["detail"], "rate limited");
    }

    #[test]
    fn test_optional_request_fields_deserialize_as_absent() {
        let request: GetTimezoneListRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.area.is_none());

        let request: GetTimeByIpRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.ip.is_none());

        let request: CompareTimezonesRequest =
            serde_json::from_value(json!({"timezones": ["UTC", "Asia/Tokyo"]})).unwrap();
        assert_eq!(request.timezones.len(), 2);
    }
}

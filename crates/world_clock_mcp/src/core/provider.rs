use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use crate::core::api::{TimeApi, WorldTimeApi};
use crate::core::error::{WorldClockError, WorldClockResult};
use crate::core::models::{
    ComparisonEntry, CurrentTimeResult, IpTimeResult, TimeConversionResult, TimezoneCatalog,
    TimezoneComparison, TimezoneListing, ZoneSnapshot,
};
use crate::core::utils::{
    COMPARISON_TIMESTAMP_FORMAT, NAIVE_DATETIME_FORMAT, convert_between_offsets,
    parse_input_datetime, parse_utc_offset,
};

/// Core world clock operations backed by the World Time API
#[derive(Clone)]
pub struct WorldClockServer {
    api: Arc<dyn TimeApi>,
    timeout: Duration,
}

impl WorldClockServer {
    pub fn new(timeout: Duration) -> WorldClockResult<Self> {
        Ok(Self::with_api(Arc::new(WorldTimeApi::new()?), timeout))
    }

    /// Build a provider over a caller-supplied API implementation.
    pub fn with_api(api: Arc<dyn TimeApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_zone(&self, endpoint: &str) -> WorldClockResult<ZoneSnapshot> {
        let payload = self.api.request(endpoint, self.timeout).await?;
        serde_json::from_value(payload).map_err(|e| WorldClockError::UnexpectedPayload {
            message: e.to_string(),
        })
    }

    /// Current time for an IANA timezone. The zone name goes to the service
    /// verbatim; an unknown zone surfaces as the service's own error.
    pub async fn get_current_time(&self, timezone: &str) -> WorldClockResult<CurrentTimeResult> {
        let snapshot = self.fetch_zone(&format!("timezone/{timezone}")).await?;
        CurrentTimeResult::from_snapshot(snapshot)
    }

    /// List known timezones, optionally narrowed to one area. An empty
    /// filter means no filter.
    pub async fn get_timezone_list(&self, area: Option<&str>) -> WorldClockResult<TimezoneListing> {
        let endpoint = match area {
            Some(area) if !area.is_empty() => format!("timezone/{area}"),
            _ => "timezone".to_string(),
        };
        let payload = self.api.request(&endpoint, self.timeout).await?;

        match payload {
            Value::Array(entries) => {
                let mut timezones = entries
                    .into_iter()
                    .map(|entry| match entry {
                        Value::String(name) => Ok(name),
                        other => Err(WorldClockError::UnexpectedPayload {
                            message: format!("expected a zone name, got {other}"),
                        }),
                    })
                    .collect::<WorldClockResult<Vec<String>>>()?;
                timezones.sort();

                Ok(TimezoneListing::Catalog(TimezoneCatalog {
                    count: timezones.len(),
                    timezones,
                }))
            }
            other => Ok(TimezoneListing::Passthrough(other)),
        }
    }

    /// Current time at the requester's address, or at an explicit one.
    pub async fn get_time_by_ip(&self, ip: Option<&str>) -> WorldClockResult<IpTimeResult> {
        let endpoint = match ip {
            Some(ip) if !ip.is_empty() => format!("ip/{ip}"),
            _ => "ip".to_string(),
        };
        let snapshot = self.fetch_zone(&endpoint).await?;
        Ok(IpTimeResult::from_snapshot(snapshot))
    }

    /// Side-by-side snapshot of several zones.
    ///
    /// Zones are queried sequentially in request order; a failed lookup
    /// stays local to its entry.
    pub async fn compare_timezones(&self, timezones: &[String]) -> TimezoneComparison {
        let mut results = Vec::with_capacity(timezones.len());
        for timezone in timezones {
            let entry = match self.fetch_zone(&format!("timezone/{timezone}")).await {
                Ok(snapshot) => ComparisonEntry::from_snapshot(snapshot),
                Err(e) => ComparisonEntry::failure(timezone, &e),
            };
            results.push(entry);
        }

        TimezoneComparison {
            timestamp: Utc::now().format(COMPARISON_TIMESTAMP_FORMAT).to_string(),
            zones_compared: timezones.len(),
            results,
        }
    }

    /// Convert a wall-clock datetime from one zone to another.
    ///
    /// The arithmetic uses each zone's current UTC offset as reported by the
    /// service, so a datetime falling under a different DST regime converts
    /// with today's offsets. The input must parse before either zone is
    /// fetched.
    pub async fn convert_time(
        &self,
        datetime_str: &str,
        from_timezone: &str,
        to_timezone: &str,
    ) -> WorldClockResult<TimeConversionResult> {
        let datetime = parse_input_datetime(datetime_str)?;

        let from = self.fetch_zone(&format!("timezone/{from_timezone}")).await?;
        let to = self.fetch_zone(&format!("timezone/{to_timezone}")).await?;

        let from_offset_seconds = parse_utc_offset(&from.utc_offset)?;
        let to_offset_seconds = parse_utc_offset(&to.utc_offset)?;
        let converted = convert_between_offsets(datetime, from_offset_seconds, to_offset_seconds)?;

        Ok(TimeConversionResult {
            original_datetime: datetime_str.to_string(),
            from_timezone: from_timezone.to_string(),
            to_timezone: to_timezone.to_string(),
            converted_datetime: converted.format(NAIVE_DATETIME_FORMAT).to_string(),
            from_utc_offset: from.utc_offset,
            to_utc_offset: to.utc_offset,
            from_abbreviation: from.abbreviation,
            to_abbreviation: to.abbreviation,
        })
    }
}

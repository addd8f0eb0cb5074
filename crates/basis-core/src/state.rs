//! The persisted watcher state.
//!
//! One `WatchState` document exists for the watched instrument pair. It is
//! loaded at the start of an invocation, threaded mutably through the
//! decision pipeline, and saved at most once at the end. Old documents may
//! carry the update timestamp as integer epoch seconds; decoding accepts
//! both forms.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Persisted snapshot of last-known values, daily extrema and fetch health.
///
/// Extrema use `0.0` as the uninitialized sentinel; a zero extremum is set
/// from the incoming sample rather than compared numerically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchState {
    /// Last recorded spot value; at night this is the morning close.
    #[serde(default)]
    pub last_spot: f64,
    /// Divergence (spot − futures) at the last notification or range update.
    #[serde(default)]
    pub last_divergence: f64,
    /// Venue time of the last persisted update; drives the daily reset.
    #[serde(default = "unix_epoch", deserialize_with = "de_timestamp")]
    pub last_update: DateTime<Utc>,

    /// Daily spot high, 0.0 when uninitialized.
    #[serde(default)]
    pub spot_high: f64,
    /// Daily spot low, 0.0 when uninitialized.
    #[serde(default)]
    pub spot_low: f64,
    /// Daily futures high, 0.0 when uninitialized.
    #[serde(default)]
    pub future_high: f64,
    /// Daily futures low, 0.0 when uninitialized.
    #[serde(default)]
    pub future_low: f64,

    /// Consecutive fetch failures; 0 when healthy.
    #[serde(default)]
    pub failure_count: u32,
    /// Last failure description; empty when healthy.
    #[serde(default)]
    pub last_error: String,
}

impl Default for WatchState {
    fn default() -> Self {
        Self {
            last_spot: 0.0,
            last_divergence: 0.0,
            last_update: unix_epoch(),
            spot_high: 0.0,
            spot_low: 0.0,
            future_high: 0.0,
            future_low: 0.0,
            failure_count: 0,
            last_error: String::new(),
        }
    }
}

impl WatchState {
    /// Whether all four extrema still carry the uninitialized sentinel.
    #[must_use]
    pub fn range_unset(&self) -> bool {
        self.spot_high == 0.0
            && self.spot_low == 0.0
            && self.future_high == 0.0
            && self.future_low == 0.0
    }

    /// Whether the last fetch cycle succeeded.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.failure_count == 0
    }
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Accept either an RFC 3339 datetime or legacy integer epoch seconds.
fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        DateTime(DateTime<Utc>),
        EpochSeconds(i64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::DateTime(ts) => Ok(ts),
        Raw::EpochSeconds(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("epoch out of range: {secs}"))),
    }
}

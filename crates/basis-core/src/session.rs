//! Trading session classification for the watched venue.
//!
//! All clock logic runs in the venue timezone (Asia/Taipei). Times are
//! compared at minute granularity as `hour * 100 + minute` against inclusive
//! boundaries, so 08:45 and 13:45 are both in session by design.
//!
//! Also exposes the pre-open window and the fixed clock checkpoints used for
//! heartbeat notices independent of threshold logic. The US-market
//! checkpoints shift with daylight saving and are resolved from the foreign
//! venue's current offset abbreviation.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use chrono_tz::{OffsetName, Tz};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Venue timezone for all session decisions.
pub const VENUE_TZ: Tz = chrono_tz::Asia::Taipei;

/// Foreign venue consulted for the daylight-saving-dependent checkpoints.
const US_MARKET_TZ: Tz = chrono_tz::America::New_York;

/// Trading session classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    /// Morning session: 08:45 – 13:45 venue time, inclusive.
    Morning,
    /// Night session: 15:00 – 05:00 venue time, wrapping midnight.
    Night,
    /// Market closed.
    Closed,
}

impl Session {
    /// Whether quotes are being made in this session.
    #[must_use]
    pub fn is_trading(self) -> bool {
        !matches!(self, Session::Closed)
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Morning => write!(f, "Morning"),
            Self::Night => write!(f, "Night"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

fn hhmm(local: DateTime<Tz>) -> u32 {
    local.hour() * 100 + local.minute()
}

fn minutes_of_day(local: DateTime<Tz>) -> u32 {
    local.hour() * 60 + local.minute()
}

/// Current venue-local time.
#[must_use]
pub fn venue_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&VENUE_TZ)
}

/// Classify the session at a given venue-local datetime.
#[must_use]
pub fn classify_at(local: DateTime<Tz>) -> Session {
    let now = hhmm(local);

    if (845..=1345).contains(&now) {
        return Session::Morning;
    }

    // Night wraps midnight: 15:00 – 23:59 or 00:00 – 05:00.
    if now >= 1500 || now <= 500 {
        return Session::Night;
    }

    Session::Closed
}

/// Classify the current session in venue time.
#[must_use]
pub fn classify_now() -> Session {
    classify_at(venue_now())
}

/// Whether the venue-local time falls in the pre-open window (08:45 – 09:00).
#[must_use]
pub fn is_pre_open_at(local: DateTime<Tz>) -> bool {
    (845..=900).contains(&hhmm(local))
}

/// A fixed clock checkpoint matched with a one-minute tolerance.
struct Checkpoint {
    hour: u32,
    minute: u32,
    /// `Some(true)` matches only in US standard time, `Some(false)` only in
    /// US daylight time, `None` matches year-round.
    standard_time: Option<bool>,
    label: &'static str,
}

static CHECKPOINTS: &[Checkpoint] = &[
    Checkpoint {
        hour: 8,
        minute: 45,
        standard_time: None,
        label: "Futures morning session opens (08:45)",
    },
    Checkpoint {
        hour: 9,
        minute: 0,
        standard_time: None,
        label: "Cash market opens (09:00)",
    },
    Checkpoint {
        hour: 15,
        minute: 0,
        standard_time: None,
        label: "Futures night session opens (15:00)",
    },
    Checkpoint {
        hour: 17,
        minute: 0,
        standard_time: Some(true),
        label: "US pre-market begins (17:00, standard time)",
    },
    Checkpoint {
        hour: 22,
        minute: 30,
        standard_time: Some(true),
        label: "US market opens (22:30, standard time)",
    },
    Checkpoint {
        hour: 16,
        minute: 0,
        standard_time: Some(false),
        label: "US pre-market begins (16:00, daylight time)",
    },
    Checkpoint {
        hour: 21,
        minute: 30,
        standard_time: Some(false),
        label: "US market opens (21:30, daylight time)",
    },
];

/// Whether the US market is on standard (winter) time at the given instant.
///
/// Returns `None` when the offset abbreviation cannot be resolved; callers
/// must degrade gracefully rather than abort.
#[must_use]
pub fn is_us_standard_time_at(at: DateTime<Utc>) -> Option<bool> {
    let offset = US_MARKET_TZ.offset_from_utc_datetime(&at.naive_utc());
    match offset.abbreviation() {
        Some("EST") => Some(true),
        Some("EDT") => Some(false),
        other => {
            warn!(abbreviation = ?other, "Unable to resolve US market offset");
            None
        }
    }
}

fn checkpoint_label(now_minutes: u32, us_standard: Option<bool>) -> Option<&'static str> {
    for cp in CHECKPOINTS {
        match (cp.standard_time, us_standard) {
            (None, _) => {}
            // Daylight-dependent entries degrade to no match when the
            // foreign offset could not be resolved.
            (Some(_), None) => continue,
            (Some(want), Some(have)) if want != have => continue,
            _ => {}
        }

        let center = cp.hour * 60 + cp.minute;
        if now_minutes.abs_diff(center) <= 1 {
            return Some(cp.label);
        }
    }
    None
}

/// Match the venue-local time against the checkpoint table (±1 minute).
#[must_use]
pub fn specific_instant_at(local: DateTime<Tz>) -> Option<&'static str> {
    let us_standard = is_us_standard_time_at(local.with_timezone(&Utc));
    checkpoint_label(minutes_of_day(local), us_standard)
}

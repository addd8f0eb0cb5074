//! Daily range tracker.
//!
//! Maintains the per-day high/low extrema for both instruments. Spot extrema
//! are only sampled in the morning session; futures extrema track
//! continuously across both sessions. At the first invocation of a new
//! trading day (morning open, 08:45) all four extrema are reset from the
//! current sample instead of compared.
//!
//! A `0.0` extremum is the uninitialized sentinel and is set from the
//! incoming value rather than compared, so a genuine zero quote can never
//! become the daily low.

use basis_core::{Session, WatchState};
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

/// Morning session open, as hhmm.
const MORNING_OPEN_HHMM: u32 = 845;

fn hhmm(at: DateTime<Tz>) -> u32 {
    at.hour() * 100 + at.minute()
}

/// Whether this invocation is the first of a new trading day.
///
/// The post-midnight night tail (00:00 – 05:00) belongs to the previous
/// trading day, so a date change alone is not enough: the clock must also
/// have reached the morning open.
fn new_day_reset_due(state: &WatchState, now: DateTime<Tz>) -> bool {
    let now_hhmm = hhmm(now);
    let last = state.last_update.with_timezone(&now.timezone());

    if last.date_naive() != now.date_naive() {
        now_hhmm >= MORNING_OPEN_HHMM
    } else {
        // Same date: catch the case where the last update predates 08:45
        // (e.g. the process was down over the open).
        hhmm(last) < MORNING_OPEN_HHMM && now_hhmm >= MORNING_OPEN_HHMM
    }
}

// Non-positive samples never enter the range: 0.0 is the unset sentinel,
// and a zero low would be indistinguishable from it.
fn break_high(slot: &mut f64, sample: f64) -> bool {
    if sample <= 0.0 {
        return false;
    }
    if *slot == 0.0 || sample > *slot {
        *slot = sample;
        true
    } else {
        false
    }
}

fn break_low(slot: &mut f64, sample: f64) -> bool {
    if sample <= 0.0 {
        return false;
    }
    if *slot == 0.0 || sample < *slot {
        *slot = sample;
        true
    } else {
        false
    }
}

/// Update the daily extrema from the current sample.
///
/// Returns whether the mutation warrants a save. Also mirrors the latest
/// sample into `last_spot`/`last_divergence` whenever it runs in a trading
/// session; `last_update` advances only when a save is warranted, which
/// keeps a repeated call with the same sample and clock from mutating state
/// twice.
pub fn update_daily_range(
    state: &mut WatchState,
    spot: f64,
    future: f64,
    session: Session,
    now: DateTime<Tz>,
) -> bool {
    if !session.is_trading() {
        return false;
    }

    let mut should_persist = false;

    if new_day_reset_due(state, now) {
        info!(spot, future, "New trading day, resetting daily range");
        state.spot_high = spot;
        state.spot_low = spot;
        state.future_high = future;
        state.future_low = future;
        should_persist = true;
    } else if state.range_unset() {
        // Fresh state: seed all four extrema at once.
        state.spot_high = spot;
        state.spot_low = spot;
        state.future_high = future;
        state.future_low = future;
        should_persist = true;
    } else {
        if session == Session::Morning {
            should_persist |= break_high(&mut state.spot_high, spot);
            should_persist |= break_low(&mut state.spot_low, spot);
        }
        should_persist |= break_high(&mut state.future_high, future);
        should_persist |= break_low(&mut state.future_low, future);

        if should_persist {
            debug!(
                spot_high = state.spot_high,
                spot_low = state.spot_low,
                future_high = state.future_high,
                future_low = state.future_low,
                "Daily range extended"
            );
        }
    }

    state.last_spot = spot;
    state.last_divergence = spot - future;

    if should_persist {
        state.last_update = now.with_timezone(&Utc);
    }

    should_persist
}

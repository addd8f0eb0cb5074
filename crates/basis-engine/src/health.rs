//! Fetch-health state machine.
//!
//! Tracks consecutive fetch failures across invocations and decides when a
//! system-health notice must be sent. Runs before any market-divergence
//! logic; its notice is independent of, and may co-occur with, a market
//! alert.

use basis_core::WatchState;

/// Cadence of the periodic still-failing reminder. At a five-minute
/// schedule this is one reminder per hour.
pub const FAILURE_REMINDER_EVERY: u32 = 12;

/// Fold a fetch outcome into the state and return the health notice to send,
/// if any.
///
/// Transitions over {healthy, failing}:
/// - healthy → failing: always notice, with the error detail.
/// - failing → failing: notice only every [`FAILURE_REMINDER_EVERY`] failures.
/// - failing → healthy: always notice, with the prior streak length; resets
///   the counter and clears the stored error.
/// - healthy → healthy: silent.
pub fn track_fetch_outcome(state: &mut WatchState, error: Option<&str>) -> Option<String> {
    match error {
        Some(detail) => {
            state.last_error = detail.to_string();
            state.failure_count += 1;

            if state.failure_count == 1 {
                Some(format!("[system] Quote fetch failed\nerror: {detail}"))
            } else if state.failure_count % FAILURE_REMINDER_EVERY == 0 {
                Some(format!(
                    "[system] Quote fetch still failing ({} consecutive failures)\nerror: {detail}",
                    state.failure_count
                ))
            } else {
                None
            }
        }
        None => {
            if state.failure_count > 0 {
                let streak = state.failure_count;
                state.failure_count = 0;
                state.last_error.clear();
                Some(format!(
                    "[system] Quote source recovered after {streak} consecutive failures"
                ))
            } else {
                None
            }
        }
    }
}

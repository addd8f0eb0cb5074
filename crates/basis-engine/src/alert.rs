//! Session alert builders.
//!
//! One builder per trading session, sharing a trait so the orchestrator can
//! stay session-agnostic. Builders read the state as it stood before the
//! current sample was folded into the daily range, so extremum breakouts
//! compare against the prior extrema and re-notification suppression
//! compares against the last notified divergence.
//!
//! Checks run in strict priority order and the first match wins:
//! 1. daily extremum breakout (always notifies)
//! 2. spot trend move (morning only)
//! 3. divergence threshold breach, gated by the re-notification suppressor
//! 4. standalone divergence shift (night only)
//! 5. silent

use basis_core::{Session, WatchState};
use tracing::{debug, info};

use crate::config::AlertThresholds;

/// Outcome of one alert evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    /// Message text to deliver, when there is one.
    pub message: Option<String>,
    /// Whether the message must actually be sent. A suppressed breach keeps
    /// `notify` false with no message.
    pub notify: bool,
}

impl AlertDecision {
    fn send(message: String) -> Self {
        Self {
            message: Some(message),
            notify: true,
        }
    }

    fn silent() -> Self {
        Self {
            message: None,
            notify: false,
        }
    }
}

/// Per-session alert construction.
pub trait SessionAlert {
    /// Evaluate the current sample against the prior state.
    fn build(&self, state: &WatchState, spot: f64, future: f64, limits: &AlertThresholds)
        -> AlertDecision;

    /// Unconditional status line used by the clock-checkpoint heartbeat when
    /// no alert fired.
    fn summary(&self, label: &str, spot: f64, future: f64) -> String;
}

/// Build the alert strategy for a session. `None` when the market is closed.
#[must_use]
pub fn session_alert(session: Session) -> Option<Box<dyn SessionAlert>> {
    match session {
        Session::Morning => Some(Box::new(MorningAlert)),
        Session::Night => Some(Box::new(NightAlert)),
        Session::Closed => None,
    }
}

/// Morning session builder. Divergence is spot minus futures.
pub struct MorningAlert;

impl MorningAlert {
    fn tail(spot: f64, future: f64) -> String {
        format!(
            "spot-futures divergence: {:.2} pts\nspot: {spot:.2}\nfutures: {future:.2}",
            spot - future
        )
    }

    fn breakout(state: &WatchState, spot: f64, future: f64) -> Option<String> {
        let body = if spot > state.spot_high {
            format!(
                "(trend: up)\nspot new daily high (prev high: {:.2})",
                state.spot_high
            )
        } else if spot < state.spot_low {
            format!(
                "(trend: down)\nspot new daily low (prev low: {:.2})",
                state.spot_low
            )
        } else if future > state.future_high {
            format!(
                "(trend: up)\nfutures new daily high (prev high: {:.2})",
                state.future_high
            )
        } else if future < state.future_low {
            format!(
                "(trend: down)\nfutures new daily low (prev low: {:.2})",
                state.future_low
            )
        } else {
            return None;
        };
        Some(format!("[Morning watch] {body}\n{}", Self::tail(spot, future)))
    }
}

impl SessionAlert for MorningAlert {
    fn build(
        &self,
        state: &WatchState,
        spot: f64,
        future: f64,
        limits: &AlertThresholds,
    ) -> AlertDecision {
        if let Some(message) = Self::breakout(state, spot, future) {
            return AlertDecision::send(message);
        }

        let changed = spot - state.last_spot;
        if changed.abs() > limits.threshold_changed {
            let verb = if changed > 0.0 { "advanced" } else { "declined" };
            return AlertDecision::send(format!(
                "[Morning watch] spot {verb} {:.2} (prev: {:.2})\n{}",
                changed.abs(),
                state.last_spot,
                Self::tail(spot, future)
            ));
        }

        let divergence = spot - future;
        if divergence.abs() > limits.threshold {
            let delta = divergence - state.last_divergence;
            if delta.abs() < limits.threshold_changed {
                info!(
                    divergence,
                    last_divergence = state.last_divergence,
                    "Divergence breach unchanged, suppressing repeat notice"
                );
                return AlertDecision::silent();
            }

            let side = if divergence > 0.0 { "backwardation" } else { "premium" };
            // Widening means moving further from zero on the breached side.
            let widened = if divergence > 0.0 { delta > 0.0 } else { delta < 0.0 };
            let verb = if widened { "widened" } else { "narrowed" };
            return AlertDecision::send(format!(
                "[Morning watch] {side} {verb} by {:.2} (prev: {:.2}, now: {divergence:.2})\n{}",
                delta.abs(),
                state.last_divergence,
                Self::tail(spot, future)
            ));
        }

        debug!(spot, future, divergence, "Morning sample within limits");
        AlertDecision::silent()
    }

    fn summary(&self, label: &str, spot: f64, future: f64) -> String {
        format!("[{label}]\n{}", Self::tail(spot, future))
    }
}

/// Night session builder. The cash market is closed, so divergence is the
/// stored morning close minus the night futures quote.
pub struct NightAlert;

impl NightAlert {
    fn tail(morning_close: f64, future: f64) -> String {
        format!(
            "futures vs morning close: {:.2} pts\nmorning close: {morning_close:.2}\nnight futures: {future:.2}",
            morning_close - future
        )
    }

    fn breakout(state: &WatchState, future: f64) -> Option<String> {
        let body = if future > state.future_high {
            format!(
                "(trend: up)\nfutures new daily high (prev high: {:.2})",
                state.future_high
            )
        } else if future < state.future_low {
            format!(
                "(trend: down)\nfutures new daily low (prev low: {:.2})",
                state.future_low
            )
        } else {
            return None;
        };
        Some(format!(
            "[Night watch] {body}\n{}",
            Self::tail(state.last_spot, future)
        ))
    }

    /// Standalone shift label for a divergence still inside the breach
    /// threshold. A zero divergence counts as the decline side so the four
    /// sign combinations are total.
    fn shift_body(divergence: f64, last: f64, delta: f64) -> String {
        let magnitude = delta.abs();
        match (divergence < 0.0, last < 0.0) {
            (false, false) => {
                let verb = if delta > 0.0 { "widened" } else { "narrowed" };
                format!("night decline {verb} by {magnitude:.2}")
            }
            (true, true) => {
                let verb = if delta < 0.0 { "widened" } else { "narrowed" };
                format!("night rally {verb} by {magnitude:.2}")
            }
            (true, false) => format!("night move reversed upward by {magnitude:.2}"),
            (false, true) => format!("night move reversed downward by {magnitude:.2}"),
        }
    }
}

impl SessionAlert for NightAlert {
    fn build(
        &self,
        state: &WatchState,
        _spot: f64,
        future: f64,
        limits: &AlertThresholds,
    ) -> AlertDecision {
        if let Some(message) = Self::breakout(state, future) {
            return AlertDecision::send(message);
        }

        let divergence = state.last_spot - future;
        let delta = divergence - state.last_divergence;

        if divergence.abs() > limits.threshold {
            if delta.abs() < limits.threshold_changed {
                info!(
                    divergence,
                    last_divergence = state.last_divergence,
                    "Night breach unchanged, suppressing repeat notice"
                );
                return AlertDecision::silent();
            }

            let (side, widened) = if divergence > 0.0 {
                ("night futures below morning close, decline", delta > 0.0)
            } else {
                ("night futures above morning close, rally", delta < 0.0)
            };
            let verb = if widened { "widened" } else { "narrowed" };
            return AlertDecision::send(format!(
                "[Night watch] {side} {verb} by {:.2} (prev: {:.2}, now: {divergence:.2})\n{}",
                delta.abs(),
                state.last_divergence,
                Self::tail(state.last_spot, future)
            ));
        }

        if delta.abs() >= limits.threshold_changed {
            let body = Self::shift_body(divergence, state.last_divergence, delta);
            return AlertDecision::send(format!(
                "[Night watch] {body} (prev: {:.2}, now: {divergence:.2})\n{}",
                state.last_divergence,
                Self::tail(state.last_spot, future)
            ));
        }

        debug!(future, divergence, delta, "Night sample within limits");
        AlertDecision::silent()
    }

    fn summary(&self, label: &str, spot: f64, future: f64) -> String {
        format!("[{label}]\n{}", Self::tail(spot, future))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(threshold: f64, threshold_changed: f64) -> AlertThresholds {
        AlertThresholds {
            threshold,
            threshold_changed,
        }
    }

    fn wide_state(last_spot: f64, last_divergence: f64) -> WatchState {
        let mut state = WatchState::default();
        state.last_spot = last_spot;
        state.last_divergence = last_divergence;
        state.spot_high = 30000.0;
        state.spot_low = 10000.0;
        state.future_high = 30000.0;
        state.future_low = 10000.0;
        state
    }

    #[test]
    fn test_closed_session_has_no_builder() {
        assert!(session_alert(Session::Closed).is_none());
        assert!(session_alert(Session::Morning).is_some());
        assert!(session_alert(Session::Night).is_some());
    }

    #[test]
    fn test_morning_quiet_sample_is_silent() {
        let state = wide_state(20000.0, 5.0);
        let decision = MorningAlert.build(&state, 20002.0, 19998.0, &limits(50.0, 10.0));
        assert!(!decision.notify);
        assert!(decision.message.is_none());
    }

    #[test]
    fn test_morning_breakout_beats_threshold_breach() {
        let mut state = wide_state(20400.0, 0.0);
        state.spot_high = 20100.0;
        // Divergence of -500 would be a premium breach on its own.
        let decision = MorningAlert.build(&state, 20500.0, 21000.0, &limits(50.0, 10.0));
        assert!(decision.notify);
        let message = decision.message.unwrap();
        assert!(message.contains("spot new daily high (prev high: 20100.00)"));
        assert!(message.contains("trend: up"));
        assert!(message.contains("divergence: -500.00"));
    }

    #[test]
    fn test_morning_futures_low_breakout() {
        let mut state = wide_state(20000.0, 0.0);
        state.future_low = 19900.0;
        let decision = MorningAlert.build(&state, 20000.0, 19850.0, &limits(500.0, 500.0));
        assert!(decision.notify);
        let message = decision.message.unwrap();
        assert!(message.contains("futures new daily low (prev low: 19900.00)"));
        assert!(message.contains("trend: down"));
    }

    #[test]
    fn test_morning_trend_move() {
        let state = wide_state(20000.0, 5.0);
        let decision = MorningAlert.build(&state, 20020.0, 20010.0, &limits(50.0, 10.0));
        assert!(decision.notify);
        let message = decision.message.unwrap();
        assert!(message.contains("spot advanced 20.00 (prev: 20000.00)"));

        let decision = MorningAlert.build(&state, 19975.0, 19970.0, &limits(50.0, 10.0));
        assert!(decision.message.unwrap().contains("spot declined 25.00"));
    }

    #[test]
    fn test_morning_breach_suppressed_when_barely_moved() {
        // Breach already notified at 62; now 60, a move of only 2.
        let state = wide_state(20000.0, 62.0);
        let decision = MorningAlert.build(&state, 20000.0, 19940.0, &limits(50.0, 10.0));
        assert!(!decision.notify);
        assert!(decision.message.is_none());
    }

    #[test]
    fn test_morning_breach_narrowed_release() {
        let state = wide_state(20000.0, 80.0);
        let decision = MorningAlert.build(&state, 20000.0, 19940.0, &limits(50.0, 10.0));
        assert!(decision.notify);
        let message = decision.message.unwrap();
        assert!(message.contains("backwardation narrowed by 20.00 (prev: 80.00, now: 60.00)"));
    }

    #[test]
    fn test_morning_backwardation_widened() {
        let state = wide_state(20000.0, 45.0);
        let decision = MorningAlert.build(&state, 20000.0, 19940.0, &limits(50.0, 10.0));
        assert!(decision
            .message
            .unwrap()
            .contains("backwardation widened by 15.00"));
    }

    #[test]
    fn test_morning_premium_side_is_symmetric() {
        // Premium widens as the divergence moves further negative.
        let state = wide_state(19940.0, -45.0);
        let decision = MorningAlert.build(&state, 19940.0, 20000.0, &limits(50.0, 10.0));
        assert!(decision.message.unwrap().contains("premium widened by 15.00"));

        let state = wide_state(19940.0, -80.0);
        let decision = MorningAlert.build(&state, 19940.0, 20000.0, &limits(50.0, 10.0));
        assert!(decision.message.unwrap().contains("premium narrowed by 20.00"));

        let state = wide_state(19940.0, -62.0);
        let decision = MorningAlert.build(&state, 19940.0, 20000.0, &limits(50.0, 10.0));
        assert!(!decision.notify, "2-point move is below the re-notify gate");
    }

    #[test]
    fn test_night_futures_breakout() {
        let mut state = wide_state(20000.0, 0.0);
        state.future_low = 19900.0;
        let decision = NightAlert.build(&state, 20000.0, 19000.0, &limits(5000.0, 5000.0));
        assert!(decision.notify);
        let message = decision.message.unwrap();
        assert!(message.contains("futures new daily low (prev low: 19900.00)"));
        assert!(message.contains("morning close: 20000.00"));
    }

    #[test]
    fn test_night_breach_decline_widened() {
        let state = wide_state(20000.0, 0.0);
        let decision = NightAlert.build(&state, 0.0, 19940.0, &limits(50.0, 10.0));
        assert!(decision.notify);
        let message = decision.message.unwrap();
        assert!(message.contains("night futures below morning close, decline widened by 60.00"));
        assert!(message.contains("night futures: 19940.00"));
    }

    #[test]
    fn test_night_breach_suppressed() {
        let state = wide_state(20000.0, 62.0);
        let decision = NightAlert.build(&state, 0.0, 19940.0, &limits(50.0, 10.0));
        assert!(!decision.notify);
        assert!(decision.message.is_none());
    }

    #[test]
    fn test_night_decline_narrowed_inside_threshold() {
        // Morning closed 104.04 apart; night futures recovered to 47.04,
        // still inside the 100-point breach threshold.
        let state = wide_state(27793.04, 104.04);
        let decision = NightAlert.build(&state, 0.0, 27746.0, &limits(100.0, 50.0));
        assert!(decision.notify);
        let message = decision.message.unwrap();
        assert!(message.contains("night decline narrowed by 57.00 (prev: 104.04, now: 47.04)"));
    }

    #[test]
    fn test_night_move_reversed_upward() {
        // Futures crossed from below the morning close to above it.
        let state = wide_state(27793.04, 49.04);
        let decision = NightAlert.build(&state, 0.0, 27820.0, &limits(100.0, 50.0));
        assert!(decision.notify);
        let message = decision.message.unwrap();
        assert!(message.contains("night move reversed upward by 76.00"));
        assert!(message.contains("now: -26.96"));
    }

    #[test]
    fn test_night_move_reversed_downward() {
        let state = wide_state(20010.0, -20.0);
        let decision = NightAlert.build(&state, 0.0, 20005.0, &limits(50.0, 10.0));
        assert!(decision.notify);
        assert!(decision
            .message
            .unwrap()
            .contains("night move reversed downward by 25.00"));
    }

    #[test]
    fn test_night_rally_widened() {
        let state = wide_state(20000.0, -10.0);
        let decision = NightAlert.build(&state, 0.0, 20040.0, &limits(50.0, 10.0));
        assert!(decision.message.unwrap().contains("night rally widened by 30.00"));
    }

    #[test]
    fn test_night_small_shift_is_silent() {
        let state = wide_state(20000.0, 5.0);
        let decision = NightAlert.build(&state, 0.0, 19998.0, &limits(50.0, 10.0));
        assert!(!decision.notify);
    }

    #[test]
    fn test_summaries_carry_both_quotes() {
        let morning = MorningAlert.summary("Cash market opens (09:00)", 20000.0, 19980.0);
        assert!(morning.starts_with("[Cash market opens (09:00)]"));
        assert!(morning.contains("divergence: 20.00"));

        let night = NightAlert.summary("Futures night session opens (15:00)", 20000.0, 20030.0);
        assert!(night.contains("futures vs morning close: -30.00"));
    }
}

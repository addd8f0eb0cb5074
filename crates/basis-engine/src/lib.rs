//! Alert decision engine.
//!
//! Turns a pair of raw quotes plus previously persisted state into an
//! updated state record and a notify/suppress decision. The engine is a
//! pure, synchronous function of (prior state, current samples, thresholds);
//! all blocking I/O lives in the collaborator crates.
//!
//! Pipeline order within one invocation:
//! 1. fetch-health tracking ([`track_fetch_outcome`])
//! 2. daily range update ([`update_daily_range`])
//! 3. session alert build ([`session_alert`]) against the pre-update state

pub mod alert;
pub mod config;
pub mod health;
pub mod range;

pub use alert::{session_alert, AlertDecision, MorningAlert, NightAlert, SessionAlert};
pub use config::AlertThresholds;
pub use health::{track_fetch_outcome, FAILURE_REMINDER_EVERY};
pub use range::update_daily_range;

//! Core domain types for the basis watcher.
//!
//! This crate provides the fundamental types shared by every stage of the
//! watcher pipeline:
//! - `Session`: trading-window classification for the watched venue
//! - `WatchState`: the persisted snapshot carried across invocations
//! - closed-market calendar helpers

pub mod calendar;
pub mod session;
pub mod state;

pub use calendar::{is_special_date, parse_special_dates};
pub use session::{
    classify_at, classify_now, is_pre_open_at, is_us_standard_time_at, specific_instant_at,
    venue_now, Session, VENUE_TZ,
};
pub use state::WatchState;

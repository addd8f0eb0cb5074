//! Scheduled spot-futures divergence watcher.
//!
//! One invocation per schedule tick:
//! - holiday and session gate
//! - load persisted state
//! - fetch the quote pair (with the night-session cash fallback)
//! - fold the fetch outcome into the health tracker
//! - update the daily range and build the session alert
//! - deliver and persist per the save policy

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::{AppConfig, Credentials};
pub use error::{AppError, AppResult};

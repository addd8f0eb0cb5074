//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] basis_feed::FeedError),

    #[error("Store error: {0}")]
    Store(#[from] basis_store::StoreError),

    #[error("Notify error: {0}")]
    Notify(#[from] basis_notify::NotifyError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] basis_telemetry::TelemetryError),
}

pub type AppResult<T> = Result<T, AppError>;

//! Notifier error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("http client construction failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NotifyError>;

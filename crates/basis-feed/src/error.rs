//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("locator {pointer} matched nothing in response from {url}")]
    Locator { url: String, pointer: String },

    #[error("quote value unparseable: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;

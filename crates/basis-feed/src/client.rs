//! HTTP quote client.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{FeedError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where one instrument's quote lives: an endpoint URL plus a JSON pointer
/// into the response body (RFC 6901, e.g. `/quote/last`).
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteEndpoint {
    pub url: String,
    pub locator: String,
}

/// One polling round's pair of quotes. Each leg carries its own outcome.
#[derive(Debug)]
pub struct PairSample {
    pub spot: Result<f64>,
    pub future: Result<f64>,
}

/// Strip digit grouping and surrounding whitespace before parsing, since
/// quote feeds commonly render values like `"27,746.00"`.
pub fn parse_numeric(raw: &str) -> Result<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| FeedError::Parse(raw.to_string()))
}

pub struct QuoteClient {
    http: reqwest::Client,
}

impl QuoteClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Fetch one instrument's quote.
    pub async fn fetch_value(&self, endpoint: &QuoteEndpoint) -> Result<f64> {
        let body: Value = self
            .http
            .get(&endpoint.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let node = body
            .pointer(&endpoint.locator)
            .ok_or_else(|| FeedError::Locator {
                url: endpoint.url.clone(),
                pointer: endpoint.locator.clone(),
            })?;

        let value = match node {
            Value::Number(n) => n.as_f64().ok_or_else(|| FeedError::Parse(n.to_string()))?,
            Value::String(s) => parse_numeric(s)?,
            other => return Err(FeedError::Parse(other.to_string())),
        };

        debug!(url = %endpoint.url, value, "Fetched quote");
        Ok(value)
    }

    /// Fetch both legs concurrently. Neither leg's failure affects the other.
    pub async fn fetch_pair(&self, spot: &QuoteEndpoint, future: &QuoteEndpoint) -> PairSample {
        let (spot, future) = tokio::join!(self.fetch_value(spot), self.fetch_value(future));
        PairSample { spot, future }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(url: String, locator: &str) -> QuoteEndpoint {
        QuoteEndpoint {
            url,
            locator: locator.to_string(),
        }
    }

    #[test]
    fn test_parse_numeric_handles_grouped_digits() {
        assert_eq!(parse_numeric("27,746.00").unwrap(), 27746.0);
        assert_eq!(parse_numeric(" 19850 ").unwrap(), 19850.0);
        assert_eq!(parse_numeric("-62.5").unwrap(), -62.5);
        assert!(parse_numeric("n/a").is_err());
        assert!(parse_numeric("").is_err());
    }

    #[tokio::test]
    async fn test_fetch_value_numeric_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/quote")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"quote": {"last": 20015.5}}"#)
            .create_async()
            .await;

        let client = QuoteClient::new().unwrap();
        let value = client
            .fetch_value(&endpoint(format!("{}/quote", server.url()), "/quote/last"))
            .await
            .unwrap();
        assert_eq!(value, 20015.5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_value_string_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .with_status(200)
            .with_body(r#"{"last": "27,746.00"}"#)
            .create_async()
            .await;

        let client = QuoteClient::new().unwrap();
        let value = client
            .fetch_value(&endpoint(format!("{}/quote", server.url()), "/last"))
            .await
            .unwrap();
        assert_eq!(value, 27746.0);
    }

    #[tokio::test]
    async fn test_missing_locator_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .with_status(200)
            .with_body(r#"{"last": 1.0}"#)
            .create_async()
            .await;

        let client = QuoteClient::new().unwrap();
        let err = client
            .fetch_value(&endpoint(format!("{}/quote", server.url()), "/nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Locator { .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .with_status(503)
            .create_async()
            .await;

        let client = QuoteClient::new().unwrap();
        let err = client
            .fetch_value(&endpoint(format!("{}/quote", server.url()), "/last"))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_pair_isolates_failures() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/spot")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/future")
            .with_status(200)
            .with_body(r#"{"last": 19940.0}"#)
            .create_async()
            .await;

        let client = QuoteClient::new().unwrap();
        let sample = client
            .fetch_pair(
                &endpoint(format!("{}/spot", server.url()), "/last"),
                &endpoint(format!("{}/future", server.url()), "/last"),
            )
            .await;
        assert!(sample.spot.is_err());
        assert_eq!(sample.future.unwrap(), 19940.0);
    }
}

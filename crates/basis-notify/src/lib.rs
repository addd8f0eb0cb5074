//! Alert delivery over the Telegram bot API.
//!
//! Delivery is best effort per recipient: a rejected or unreachable chat is
//! logged and skipped so the remaining recipients still get the message.
//! Delivery never feeds back into the decision engine.

pub mod error;

use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

pub use error::{NotifyError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    http: reqwest::Client,
    token: String,
    chat_ids: Vec<i64>,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_ids: Vec<i64>) -> Result<Self> {
        Self::with_api_base(token, chat_ids, DEFAULT_API_BASE)
    }

    /// Point the notifier at a different API host, for tests or a proxy.
    pub fn with_api_base(
        token: impl Into<String>,
        chat_ids: Vec<i64>,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            token: token.into(),
            chat_ids,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send `text` to every configured chat. Returns how many deliveries
    /// succeeded. Empty text is refused outright.
    pub async fn send_all(&self, text: &str) -> usize {
        if text.is_empty() {
            warn!("Refusing to send empty message");
            return 0;
        }

        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let mut delivered = 0;

        for chat_id in &self.chat_ids {
            let outcome = self
                .http
                .post(&url)
                .json(&json!({ "chat_id": chat_id, "text": text }))
                .send()
                .await
                .and_then(|resp| resp.error_for_status());

            match outcome {
                Ok(_) => {
                    debug!(chat_id, "Message delivered");
                    delivered += 1;
                }
                Err(err) => warn!(chat_id, error = %err, "Message delivery failed"),
            }
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sends_to_every_chat() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTOKEN/sendMessage")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .expect(2)
            .create_async()
            .await;

        let notifier =
            TelegramNotifier::with_api_base("TOKEN", vec![11, 22], server.url()).unwrap();
        assert_eq!(notifier.send_all("[system] hello").await, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_one_rejection_does_not_block_the_rest() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/botTOKEN/sendMessage")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"chat_id": 11}"#.to_string(),
            ))
            .with_status(403)
            .create_async()
            .await;
        server
            .mock("POST", "/botTOKEN/sendMessage")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"chat_id": 22}"#.to_string(),
            ))
            .with_status(200)
            .create_async()
            .await;

        let notifier =
            TelegramNotifier::with_api_base("TOKEN", vec![11, 22], server.url()).unwrap();
        assert_eq!(notifier.send_all("alert").await, 1);
    }

    #[tokio::test]
    async fn test_empty_text_is_refused() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/botTOKEN/sendMessage")
            .expect(0)
            .create_async()
            .await;

        let notifier = TelegramNotifier::with_api_base("TOKEN", vec![11], server.url()).unwrap();
        assert_eq!(notifier.send_all("").await, 0);
        mock.assert_async().await;
    }
}

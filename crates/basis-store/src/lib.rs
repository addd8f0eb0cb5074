//! Watcher state persistence.
//!
//! The state lives as a single JSON document in a key-value document store
//! behind a small REST API: GET fetches the document, PUT replaces it. A
//! missing document means a fresh deployment and decodes as the default
//! state; anything else undecodable is an error so corrupted state never
//! silently resets the daily range.

pub mod error;

use std::time::Duration;

use basis_core::WatchState;
use tracing::debug;

pub use error::{Result, StoreError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct StateStore {
    http: reqwest::Client,
    base_url: String,
    doc_id: String,
    token: Option<String>,
}

impl StateStore {
    pub fn new(base_url: impl Into<String>, doc_id: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            doc_id: doc_id.into(),
            token,
        })
    }

    fn doc_url(&self) -> String {
        format!("{}/{}", self.base_url, self.doc_id)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Load the persisted state. A 404 yields the default state.
    pub async fn load(&self) -> Result<WatchState> {
        let response = self.authorize(self.http.get(self.doc_url())).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(doc_id = %self.doc_id, "No persisted state, starting fresh");
            return Ok(WatchState::default());
        }
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let state = serde_json::from_str(&body)?;
        Ok(state)
    }

    /// Replace the persisted state.
    pub async fn save(&self, state: &WatchState) -> Result<()> {
        let response = self
            .authorize(self.http.put(self.doc_url()))
            .json(state)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        debug!(doc_id = %self.doc_id, "State saved");
        Ok(())
    }
}

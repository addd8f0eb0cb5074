//! Application orchestration.
//!
//! One `run` call is one schedule tick. The decision engine evaluates the
//! state as loaded (plus health tracking) so breakouts and re-notification
//! suppression compare against the previous tick, while the persisted state
//! already carries the current sample folded in.

use basis_core::{
    classify_at, is_pre_open_at, is_special_date, parse_special_dates, specific_instant_at,
    venue_now, Session, WatchState,
};
use basis_engine::{session_alert, track_fetch_outcome, update_daily_range};
use basis_feed::QuoteClient;
use basis_notify::TelegramNotifier;
use basis_store::StateStore;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, Credentials};
use crate::error::AppResult;

pub struct Application {
    config: AppConfig,
    special_dates: Vec<NaiveDate>,
    quotes: QuoteClient,
    store: StateStore,
    notifier: TelegramNotifier,
}

impl Application {
    pub fn new(config: AppConfig, credentials: Credentials) -> AppResult<Self> {
        let special_dates = parse_special_dates(&config.special_dates);
        let quotes = QuoteClient::new()?;
        let store = StateStore::new(
            &config.store.base_url,
            &config.store.doc_id,
            credentials.store_token,
        )?;
        let notifier = match &config.notify.api_base {
            Some(base) => TelegramNotifier::with_api_base(
                &credentials.telegram_token,
                config.notify.chat_ids.clone(),
                base,
            )?,
            None => {
                TelegramNotifier::new(&credentials.telegram_token, config.notify.chat_ids.clone())?
            }
        };
        Ok(Self {
            config,
            special_dates,
            quotes,
            store,
            notifier,
        })
    }

    /// Run one tick against the current venue clock.
    pub async fn run(&self) -> AppResult<()> {
        self.run_at(venue_now()).await
    }

    /// Run one tick at a given venue-local instant.
    pub async fn run_at(&self, now: DateTime<Tz>) -> AppResult<()> {
        if is_special_date(&self.special_dates, now.date_naive()) {
            info!(date = %now.date_naive(), "Market holiday, skipping tick");
            return Ok(());
        }

        let session = classify_at(now);
        if !session.is_trading() {
            debug!(%session, "Market closed, skipping tick");
            return Ok(());
        }

        let mut state = self.store.load().await?;

        let (spot, future) = match self.resolve_quotes(session, now, &state).await {
            Ok(pair) => pair,
            Err(detail) => {
                warn!(error = %detail, "Quote fetch failed");
                if let Some(notice) = track_fetch_outcome(&mut state, Some(&detail)) {
                    self.notifier.send_all(&notice).await;
                }
                self.persist(&state).await;
                return Ok(());
            }
        };

        let recovery = track_fetch_outcome(&mut state, None);
        if let Some(notice) = &recovery {
            self.notifier.send_all(notice).await;
        }

        // The builder must see the pre-update extrema and last fields.
        let snapshot = state.clone();
        let range_changed = update_daily_range(&mut state, spot, future, session, now);

        // Always present: the session is trading here.
        let builder = match session_alert(session) {
            Some(builder) => builder,
            None => return Ok(()),
        };
        let mut decision = builder.build(&snapshot, spot, future, &self.config.engine);

        // Clock checkpoints always produce a heartbeat, reusing the alert
        // message when one fired in the same tick.
        if let Some(label) = specific_instant_at(now) {
            info!(label, "Clock checkpoint hit");
            if decision.message.is_none() {
                decision.message = Some(builder.summary(label, spot, future));
            }
            decision.notify = true;
        }

        if decision.notify {
            if let Some(message) = &decision.message {
                self.notifier.send_all(message).await;
            }
            self.persist(&state).await;
        } else if range_changed || recovery.is_some() {
            self.persist(&state).await;
        }

        Ok(())
    }

    /// Fetch both legs. When the cash market is not quoting (night session
    /// or before 09:00), a failed spot leg falls back to the stored morning
    /// close once the futures leg resolves, retrying the futures fetch a
    /// configured number of times first.
    async fn resolve_quotes(
        &self,
        session: Session,
        now: DateTime<Tz>,
        state: &WatchState,
    ) -> Result<(f64, f64), String> {
        let sample = self
            .quotes
            .fetch_pair(&self.config.quotes.spot, &self.config.quotes.future)
            .await;
        let mut spot = sample.spot;
        let mut future = sample.future;

        let cash_closed = session == Session::Night || is_pre_open_at(now);
        if spot.is_err() && cash_closed {
            // max_attempts counts retries on top of the initial fetch_pair.
            let retry = &self.config.quotes.retry;
            let mut attempt = 0;
            while future.is_err() && attempt < retry.max_attempts {
                attempt += 1;
                tokio::time::sleep(Duration::from_secs(retry.delay_secs)).await;
                debug!(attempt, "Retrying futures quote");
                future = self.quotes.fetch_value(&self.config.quotes.future).await;
            }
            if future.is_ok() {
                info!(
                    morning_close = state.last_spot,
                    "Cash market closed, substituting morning close"
                );
                spot = Ok(state.last_spot);
            }
        }

        match (spot, future) {
            (Ok(s), Ok(f)) => Ok((s, f)),
            (Err(e), Ok(_)) => Err(format!("spot: {e}")),
            (Ok(_), Err(e)) => Err(format!("futures: {e}")),
            (Err(s), Err(f)) => Err(format!("spot: {s}; futures: {f}")),
        }
    }

    /// Persistence failures are logged, never fatal: the next tick reloads
    /// and recomputes.
    async fn persist(&self, state: &WatchState) {
        if let Err(err) = self.store.save(state).await {
            warn!(error = %err, "State save failed");
        }
    }
}

//! Debounced search loop over a [`WeatherClient`].
//!
//! The controller owns a single [`SearchState`] and publishes every change
//! through a `watch` channel. Lookups are tagged with a sequence number and
//! only the most recently dispatched one may write its result back.

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::Local;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    config::SearchConfig,
    model::{Coordinates, SearchQuery, SearchState},
    provider::WeatherClient,
};

#[derive(Debug, Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Arc<dyn WeatherClient>,
    settings: SearchConfig,
    state: watch::Sender<SearchState>,
    seq: AtomicU64,
    // At most one unfired debounce timer.
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl SearchController {
    pub fn new(client: Arc<dyn WeatherClient>, settings: SearchConfig) -> Self {
        let (state, _) = watch::channel(SearchState::default());

        Self {
            inner: Arc::new(Inner {
                client,
                settings,
                state,
                seq: AtomicU64::new(0),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Record the input text without scheduling a lookup.
    pub fn set_query(&self, text: &str) {
        self.inner.state.send_modify(|s| s.query = text.to_string());
    }

    /// Record the input text and restart the debounce timer.
    ///
    /// Must be called from within a Tokio runtime. Text shorter than the
    /// minimum query length cancels any pending timer without scheduling a
    /// new one.
    pub fn handle_input_change(&self, text: &str) {
        self.set_query(text);

        let mut slot = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = slot.take() {
            pending.abort();
        }

        if text.trim().chars().count() < self.inner.settings.min_query_len {
            return;
        }

        let delay = self.inner.settings.debounce();
        debug!(?delay, "scheduling debounced search");
        *slot = Some(self.spawn_debounced(delay));
    }

    fn spawn_debounced(&self, delay: Duration) -> JoinHandle<()> {
        let controller = self.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach so a later keystroke cannot abort a lookup already in flight.
            tokio::spawn(async move { controller.search().await });
        })
    }

    /// Cancel an unfired debounce timer and run its lookup now, then wait
    /// until no lookup is pending.
    pub async fn flush(&self) {
        let pending = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner).take();

        if let Some(timer) = pending {
            // A timer that already fired is re-dispatched; supersession keeps
            // only this result.
            timer.abort();
            self.search().await;
            return;
        }

        let mut updates = self.subscribe();
        let _ = updates.wait_for(|s| !s.loading).await;
    }

    /// Run a lookup for the current input text.
    pub async fn search(&self) {
        let text = self.inner.state.borrow().query.clone();

        let query = match SearchQuery::parse(&text, self.inner.settings.min_query_len) {
            Ok(query) => query,
            Err(err) => {
                self.inner.state.send_modify(|s| s.error = Some(err.to_string()));
                return;
            }
        };

        // The sequence is bumped under the state lock so that a result check
        // and its write can never straddle a newer dispatch.
        let mut seq = 0;
        self.inner.state.send_modify(|s| {
            seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
            s.reading = None;
            s.forecast.clear();
            s.error = None;
            s.loading = true;
        });

        let result = self.inner.client.fetch_current(query.as_str()).await;
        let outcome = result.as_ref().map(|r| r.coordinates).map_err(|e| e.kind());

        let applied = self.inner.state.send_if_modified(|s| {
            if !self.is_latest(seq) {
                return false;
            }
            match result {
                Ok(reading) => {
                    s.reading = Some(reading);
                    s.error = None;
                    s.last_updated = Some(Local::now().format("%H:%M:%S").to_string());
                }
                Err(err) => {
                    s.reading = None;
                    s.forecast.clear();
                    s.error = Some(err.to_string());
                }
            }
            s.loading = false;
            true
        });
        if !applied {
            debug!(%query, seq, "discarding superseded response");
            return;
        }

        match outcome {
            Ok(Some(coordinates)) if self.inner.settings.forecast => {
                self.load_forecast(seq, coordinates).await;
            }
            Ok(_) => {}
            Err(kind) => warn!(%query, kind, "search failed"),
        }
    }

    async fn load_forecast(&self, seq: u64, at: Coordinates) {
        let items = match self.inner.client.fetch_forecast(at.lat, at.lon).await {
            Ok(items) => items,
            // Reading stays; the forecast list remains empty.
            Err(err) => {
                warn!(kind = err.kind(), cause = %err.cause(), "forecast lookup failed");
                return;
            }
        };

        let applied = self.inner.state.send_if_modified(|s| {
            if !self.is_latest(seq) {
                return false;
            }
            s.forecast = items;
            true
        });
        if !applied {
            debug!(seq, "discarding superseded forecast");
        }
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.inner.seq.load(Ordering::SeqCst) == seq
    }
}

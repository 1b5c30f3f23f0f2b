use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::domain::{DistributionEntry, SessionState, ValueTriple};
use tokio::{
    sync::{broadcast, RwLock},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    bridge::PersistenceBridge,
    chart::{ChartPresentationState, ChartSnapshot},
    error::{CacheError, SubmitError, ValidationError, MSG_SAVED, MSG_SAVE_FAILED},
    history::HistoryStore,
    validator, ClientEvent, Notification,
};

/// Background persist started by [`SubmissionCoordinator::submit`].
///
/// Dropping it detaches the task; the persist still runs to completion and
/// still notifies.
pub struct PendingSubmission {
    pub seq: u64,
    pub triple: ValueTriple,
    handle: JoinHandle<Result<DistributionEntry, SubmitError>>,
}

impl PendingSubmission {
    pub async fn outcome(self) -> Result<DistributionEntry, SubmitError> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(seq = self.seq, "submit: persist task aborted: {err}");
                Err(SubmitError::PersistenceFailed(MSG_SAVE_FAILED.to_string()))
            }
        }
    }
}

/// Runs validate, optimistic display, background persist and reconcile for
/// each submission.
///
/// The chart is updated before the network call and is never rolled back when
/// persisting fails. Submissions are not serialized against each other: the
/// last one to reach the chart wins, and every confirmed entry is prepended,
/// duplicates included. A persist that completes after its session ended is
/// still notified but is not recorded in history.
pub struct SubmissionCoordinator {
    bridge: Arc<dyn PersistenceBridge>,
    history: Arc<HistoryStore>,
    chart: RwLock<ChartPresentationState>,
    session: RwLock<SessionState>,
    events: broadcast::Sender<ClientEvent>,
    next_seq: AtomicU64,
    generation: AtomicU64,
}

impl SubmissionCoordinator {
    pub fn new(
        bridge: Arc<dyn PersistenceBridge>,
        history: Arc<HistoryStore>,
        event_buffer: usize,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Arc::new(Self {
            bridge,
            history,
            chart: RwLock::new(ChartPresentationState::new()),
            session: RwLock::new(SessionState::default()),
            events,
            next_seq: AtomicU64::new(1),
            generation: AtomicU64::new(0),
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub async fn chart(&self) -> ChartPresentationState {
        self.chart.read().await.clone()
    }

    pub async fn session(&self) -> SessionState {
        self.session.read().await.clone()
    }

    /// Installs `session`, restores cached history, then replaces it with the
    /// server snapshot when a token is present. Returns the entry count held
    /// afterwards. Fetch and cache failures are logged, not surfaced.
    pub async fn init_session(&self, session: SessionState) -> usize {
        let token = session.token.clone();
        {
            let mut current = self.session.write().await;
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = session;
        }
        self.update_chart(ChartPresentationState::clear_preview).await;

        match self.history.load_cached_snapshot().await {
            Ok(entries) => info!(entries = entries.len(), "session: restored cached history"),
            Err(err) => warn!("session: cached history unavailable: {err}"),
        }

        if let Some(token) = token {
            match self.bridge.fetch_history(&token).await {
                Ok(entries) => {
                    let count = entries.len();
                    match self.history.replace_all(entries).await {
                        Ok(()) => info!(entries = count, "session: loaded server history"),
                        Err(err) => error!("session: failed to store server history: {err}"),
                    }
                }
                Err(err) => warn!("session: failed to fetch history: {err}"),
            }
        }

        let count = self.history.len().await;
        self.emit(ClientEvent::HistoryChanged { entries: count });
        count
    }

    /// Clears history (memory and cache), then drops the session and the
    /// chart. A failed cache clear leaves the session in place.
    pub async fn teardown_session(&self) -> Result<(), CacheError> {
        {
            // Held across the clear so no confirmed entry lands in between.
            let mut current = self.session.write().await;
            self.history.clear().await?;
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = SessionState::default();
        }
        self.emit(ClientEvent::HistoryChanged { entries: 0 });
        self.update_chart(ChartPresentationState::clear).await;
        info!("session: torn down");
        Ok(())
    }

    /// Shows a valid triple as a preview without persisting it. Invalid input
    /// only withdraws the current preview.
    pub async fn preview(
        &self,
        a_raw: &str,
        b_raw: &str,
        c_raw: &str,
    ) -> Result<ValueTriple, ValidationError> {
        match validator::validate(a_raw, b_raw, c_raw) {
            Ok(triple) => {
                self.update_chart(|chart| chart.show_preview(triple)).await;
                Ok(triple)
            }
            Err(err) => {
                self.update_chart(ChartPresentationState::clear_preview).await;
                Err(err)
            }
        }
    }

    /// Validates and submits one triple.
    ///
    /// Validation failures are notified and returned immediately; sum
    /// mismatches also clear the chart. On success the chart shows the triple
    /// at once and the persist continues in the returned [`PendingSubmission`].
    pub async fn submit(
        self: &Arc<Self>,
        a_raw: &str,
        b_raw: &str,
        c_raw: &str,
    ) -> Result<PendingSubmission, SubmitError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        let triple = match validator::validate(a_raw, b_raw, c_raw) {
            Ok(triple) => triple,
            Err(err) => {
                info!(seq, "submit: rejected: {err}");
                self.notify(Notification::error(err.to_string()));
                if err.is_sum_mismatch() {
                    self.update_chart(ChartPresentationState::clear).await;
                }
                return Err(err.into());
            }
        };

        self.update_chart(|chart| {
            chart.show_confirmed(triple);
            chart.clear_preview();
        })
        .await;
        debug!(seq, a = triple.a, b = triple.b, c = triple.c, "submit: displayed");

        let (token, generation) = {
            let current = self.session.read().await;
            (current.token.clone(), self.generation.load(Ordering::SeqCst))
        };
        let coordinator = Arc::clone(self);
        let handle = tokio::spawn(async move {
            coordinator.persist(seq, triple, token, generation).await
        });

        Ok(PendingSubmission {
            seq,
            triple,
            handle,
        })
    }

    async fn persist(
        &self,
        seq: u64,
        triple: ValueTriple,
        token: Option<String>,
        generation: u64,
    ) -> Result<DistributionEntry, SubmitError> {
        let Some(token) = token else {
            warn!(seq, "submit: no session token; not persisting");
            return Err(self.persistence_failed(MSG_SAVE_FAILED.to_string()));
        };

        match self.bridge.create_entry(triple, &token).await {
            Ok(entry) => {
                info!(seq, entry_id = entry.id.0, "submit: persisted");
                self.record_confirmed(seq, &entry, generation).await;
                self.notify(Notification::success(MSG_SAVED));
                Ok(entry)
            }
            Err(err) => {
                warn!(seq, "submit: persist failed: {err}");
                let message = err.server_message().unwrap_or(MSG_SAVE_FAILED).to_string();
                Err(self.persistence_failed(message))
            }
        }
    }

    async fn record_confirmed(&self, seq: u64, entry: &DistributionEntry, generation: u64) {
        let recorded = {
            let _session = self.session.read().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                info!(seq, "submit: session ended before confirmation; not recording");
                return;
            }
            self.history.prepend(entry.clone()).await
        };
        match recorded {
            Ok(()) => self.emit(ClientEvent::HistoryChanged {
                entries: self.history.len().await,
            }),
            // The server holds the entry; the next history fetch brings it back.
            Err(err) => error!(seq, "submit: failed to record confirmed entry: {err}"),
        }
    }

    fn persistence_failed(&self, message: String) -> SubmitError {
        self.notify(Notification::error(message.clone()));
        SubmitError::PersistenceFailed(message)
    }

    async fn update_chart<F>(&self, apply: F)
    where
        F: FnOnce(&mut ChartPresentationState),
    {
        let snapshot: ChartSnapshot = {
            let mut chart = self.chart.write().await;
            apply(&mut *chart);
            chart.snapshot()
        };
        self.emit(ClientEvent::ChartChanged(snapshot));
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.emit(ClientEvent::Notify(notification));
    }

    fn emit(&self, event: ClientEvent) {
        // No subscribers is fine; events are advisory.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;

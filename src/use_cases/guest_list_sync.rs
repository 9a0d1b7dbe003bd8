// Fetches the full guest collection and publishes it as the current view.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

use crate::domain::GuestStore;
use crate::use_cases::feedback::FeedbackBoard;
use crate::use_cases::view_model::{GuestListView, ViewPhase};

const LOAD_FAILED: &str = "Erro ao carregar a lista de convidados. Tente novamente.";

/// Default pause between a successful write and the follow-up refresh.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(500);

/// Something that can schedule a refresh of the guest list.
pub trait RefreshTrigger: Send + Sync {
    fn schedule_refresh(&self);
}

pub struct GuestListSync {
    store: Arc<dyn GuestStore>,
    feedback: Arc<FeedbackBoard>,
    view_tx: watch::Sender<GuestListView>,
    // Sequence numbers let us spot a slow refresh landing after a newer one.
    issued: AtomicU64,
    applied: AtomicU64,
}

impl GuestListSync {
    pub fn new(store: Arc<dyn GuestStore>, feedback: Arc<FeedbackBoard>) -> Self {
        let (view_tx, _view_rx) = watch::channel(GuestListView::loading());
        Self {
            store,
            feedback,
            view_tx,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> GuestListView {
        self.view_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GuestListView> {
        self.view_tx.subscribe()
    }

    /// Re-fetches the collection and replaces the rendered rows.
    ///
    /// On failure the previous rows stay in place and only the phase moves to
    /// `Error`. Overlapping calls are not coordinated: whichever finishes last
    /// decides the final snapshot.
    #[tracing::instrument(name = "refresh_guests", skip_all, fields(seq))]
    pub async fn refresh(&self) -> GuestListView {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("seq", seq);

        self.view_tx.send_modify(|view| view.phase = ViewPhase::Loading);

        match self.store.list().await {
            Ok(records) => {
                let next = GuestListView::from_records(&records);
                let newest = self.applied.fetch_max(seq, Ordering::SeqCst);
                if newest > seq {
                    tracing::debug!(newest, "older refresh completed after a newer one");
                }
                tracing::info!(
                    fetched = records.len(),
                    rendered = next.guests.len(),
                    "guest list refreshed"
                );
                self.view_tx.send_replace(next);
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch guests");
                self.view_tx.send_modify(|view| view.phase = ViewPhase::Error);
                self.feedback.error(LOAD_FAILED).await;
            }
        }

        self.snapshot()
    }
}

/// Runs a refresh on a detached task after a fixed delay, giving the sheet
/// time to reflect the write.
#[derive(Clone)]
pub struct DelayedRefresh {
    pub sync: Arc<GuestListSync>,
    pub delay: Duration,
}

impl RefreshTrigger for DelayedRefresh {
    fn schedule_refresh(&self) {
        let sync = Arc::clone(&self.sync);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sync.refresh().await;
        });
    }
}

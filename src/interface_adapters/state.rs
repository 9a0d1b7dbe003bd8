use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::domain::{Clock, GuestStore};
use crate::use_cases::{DelayedRefresh, FeedbackBoard, GuestListSync, GuestMutator, ImageNormalizer};

#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub store: Arc<dyn GuestStore>,
    pub sync: Arc<GuestListSync>,
    pub feedback: Arc<FeedbackBoard>,
    pub normalizer: ImageNormalizer,
    pub refresh_delay: Duration,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn GuestStore>,
        clock: Arc<dyn Clock>,
        settings: StateSettings,
    ) -> Self {
        let feedback = Arc::new(FeedbackBoard::new(clock, settings.feedback_display_for));
        let sync = Arc::new(GuestListSync::new(store.clone(), feedback.clone()));
        Self {
            store,
            sync,
            feedback,
            normalizer: settings.normalizer,
            refresh_delay: settings.refresh_delay,
            max_upload_bytes: settings.max_upload_bytes,
        }
    }

    // Build a mutator for one request; it refreshes through the shared sync.
    pub fn mutator(&self) -> GuestMutator<DelayedRefresh> {
        GuestMutator {
            store: self.store.clone(),
            feedback: self.feedback.clone(),
            normalizer: self.normalizer,
            refresh: DelayedRefresh {
                sync: self.sync.clone(),
                delay: self.refresh_delay,
            },
            view: self.sync.subscribe(),
        }
    }
}

// Tunables the state needs; filled from configuration at startup.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub normalizer: ImageNormalizer,
    pub refresh_delay: Duration,
    pub feedback_display_for: Duration,
    pub max_upload_bytes: usize,
}

// System clock adapter used by the feedback board.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

// Transient user-facing messages shown after actions.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::Clock;

/// How long a message stays visible by default.
pub const DEFAULT_DISPLAY_FOR: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackMessage {
    pub kind: FeedbackKind,
    pub text: String,
    pub posted_at_ms: u64,
}

/// Single message slot; each post replaces the previous message.
pub struct FeedbackBoard {
    clock: Arc<dyn Clock>,
    display_for: Duration,
    current: Mutex<Option<FeedbackMessage>>,
}

impl FeedbackBoard {
    pub fn new(clock: Arc<dyn Clock>, display_for: Duration) -> Self {
        Self {
            clock,
            display_for,
            current: Mutex::new(None),
        }
    }

    pub async fn post(&self, kind: FeedbackKind, text: impl Into<String>) -> FeedbackMessage {
        let message = FeedbackMessage {
            kind,
            text: text.into(),
            posted_at_ms: self.clock.now_epoch_millis(),
        };
        *self.current.lock().await = Some(message.clone());
        message
    }

    pub async fn info(&self, text: impl Into<String>) -> FeedbackMessage {
        self.post(FeedbackKind::Info, text).await
    }

    pub async fn success(&self, text: impl Into<String>) -> FeedbackMessage {
        self.post(FeedbackKind::Success, text).await
    }

    pub async fn error(&self, text: impl Into<String>) -> FeedbackMessage {
        self.post(FeedbackKind::Error, text).await
    }

    /// Returns the visible message, dropping it once it has expired.
    pub async fn current(&self) -> Option<FeedbackMessage> {
        let mut slot = self.current.lock().await;
        let now = self.clock.now_epoch_millis();
        let ttl = self.display_for.as_millis() as u64;

        if slot
            .as_ref()
            .is_some_and(|message| now.saturating_sub(message.posted_at_ms) >= ttl)
        {
            *slot = None;
        }
        slot.clone()
    }
}

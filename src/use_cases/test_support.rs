use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{Clock, GuestPatch, GuestRecord, GuestStore, NewGuest, StoreError};
use crate::use_cases::feedback::FeedbackBoard;
use crate::use_cases::guest_list_sync::RefreshTrigger;

// Adjustable time source for deterministic expiry tests.
pub(crate) struct ManualClock(AtomicU64);

impl ManualClock {
    pub(crate) fn new(start_ms: u64) -> Self {
        Self(AtomicU64::new(start_ms))
    }

    pub(crate) fn advance(&self, millis: u64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_epoch_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub list: bool,
    pub create: bool,
    pub update: bool,
}

// Calls observed by the recording store, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreCall {
    List,
    Create(NewGuest),
    Update(String, GuestPatch),
}

// In-memory guest store that behaves like the sheet and records every call.
// When a feedback board is attached, the message visible at each write is kept too.
#[derive(Clone)]
pub(crate) struct RecordingStore {
    rows: Arc<Mutex<Vec<GuestRecord>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<Mutex<FailureFlags>>,
    feedback: Option<Arc<FeedbackBoard>>,
    feedback_at_write: Arc<Mutex<Vec<Option<String>>>>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(FailureFlags::default())),
            feedback: None,
            feedback_at_write: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_feedback(mut self, feedback: Arc<FeedbackBoard>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub(crate) fn feedback_at_write(&self) -> Vec<Option<String>> {
        self.feedback_at_write
            .lock()
            .expect("feedback mutex poisoned")
            .clone()
    }

    pub(crate) fn with_failures(self, failures: FailureFlags) -> Self {
        self.set_failures(failures);
        self
    }

    pub(crate) fn with_rows(self, rows: Vec<GuestRecord>) -> Self {
        self.set_rows(rows);
        self
    }

    pub(crate) fn set_failures(&self, failures: FailureFlags) {
        *self.failures.lock().expect("failures mutex poisoned") = failures;
    }

    pub(crate) fn set_rows(&self, rows: Vec<GuestRecord>) {
        *self.rows.lock().expect("rows mutex poisoned") = rows;
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(crate) fn rows(&self) -> Vec<GuestRecord> {
        self.rows.lock().expect("rows mutex poisoned").clone()
    }

    async fn note_feedback(&self) {
        if let Some(board) = &self.feedback {
            let text = board.current().await.map(|message| message.text);
            self.feedback_at_write
                .lock()
                .expect("feedback mutex poisoned")
                .push(text);
        }
    }

    fn record(&self, call: StoreCall) -> FailureFlags {
        self.calls.lock().expect("calls mutex poisoned").push(call);
        *self.failures.lock().expect("failures mutex poisoned")
    }
}

#[async_trait]
impl GuestStore for RecordingStore {
    async fn list(&self) -> Result<Vec<GuestRecord>, StoreError> {
        if self.record(StoreCall::List).list {
            return Err(StoreError::Upstream { status: 500 });
        }
        Ok(self.rows())
    }

    async fn create(&self, guest: NewGuest) -> Result<(), StoreError> {
        self.note_feedback().await;
        if self.record(StoreCall::Create(guest.clone())).create {
            return Err(StoreError::Transport("connection refused".to_string()));
        }

        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        rows.push(GuestRecord {
            name: Some(guest.name),
            status: Some(guest.status),
            photo: guest.photo,
        });
        Ok(())
    }

    async fn update(&self, name: &str, patch: GuestPatch) -> Result<(), StoreError> {
        self.note_feedback().await;
        if self
            .record(StoreCall::Update(name.to_string(), patch.clone()))
            .update
        {
            return Err(StoreError::Upstream { status: 404 });
        }

        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        for row in rows.iter_mut().filter(|row| row.name.as_deref() == Some(name)) {
            if let Some(status) = patch.status.clone() {
                row.status = Some(status);
            }
            if let Some(photo) = patch.photo.clone() {
                row.photo = Some(photo);
            }
        }
        Ok(())
    }
}

// Refresh trigger that only counts how often a refresh was scheduled.
#[derive(Clone, Default)]
pub(crate) struct CountingRefresh(Arc<AtomicUsize>);

impl CountingRefresh {
    pub(crate) fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl RefreshTrigger for CountingRefresh {
    fn schedule_refresh(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

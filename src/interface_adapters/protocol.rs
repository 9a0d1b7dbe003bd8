use serde::Serialize;

use crate::use_cases::{FeedbackKind, FeedbackMessage, GuestListView, MutationOutcome};

// Snapshot of the list screen plus whatever message is currently visible.
#[derive(Debug, Serialize)]
pub struct GuestListResponse {
    #[serde(flatten)]
    pub view: GuestListView,
    pub message: Option<FeedbackMessage>,
}

// Response payload returned after a create/update action.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: String,
    pub kind: FeedbackKind,
    // Client should clear the add-guest form.
    pub reset_form: bool,
    // Client should close the photo editor.
    pub dismiss_editor: bool,
    pub refresh_scheduled: bool,
}

impl From<MutationOutcome> for MutationResponse {
    fn from(outcome: MutationOutcome) -> Self {
        Self {
            message: outcome.feedback.text,
            kind: outcome.feedback.kind,
            reset_form: outcome.reset_form,
            dismiss_editor: outcome.dismiss_editor,
            refresh_scheduled: outcome.refresh_scheduled,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: Option<FeedbackMessage>,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

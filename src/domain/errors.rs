use thiserror::Error;

// Domain-level errors for guest list workflows.
#[derive(Debug, Error)]
pub enum GuestError {
    // The uploaded file could not be read or decoded as an image.
    #[error("image decode error: {0}")]
    Decode(String),

    // Network failure or non-success response from the guest store.
    #[error("guest store error: {0}")]
    Transport(String),

    // A required field was empty; carries the user-facing message.
    #[error("validation error: {0}")]
    Validation(&'static str),
}

// Failures reported by a guest store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned {status}")]
    Upstream { status: u16 },

    #[error("response decode error: {0}")]
    Decode(String),
}

impl From<StoreError> for GuestError {
    fn from(err: StoreError) -> Self {
        GuestError::Transport(err.to_string())
    }
}

pub mod feedback;
pub mod guest_list_sync;
pub mod guest_mutator;
pub mod image_normalizer;
pub mod view_model;

#[cfg(test)]
pub(crate) mod test_support;

pub use feedback::{FeedbackBoard, FeedbackKind, FeedbackMessage};
pub use guest_list_sync::{DelayedRefresh, GuestListSync, RefreshTrigger};
pub use guest_mutator::{AddGuest, GuestMutator, MutationError, MutationOutcome, PhotoEdit};
pub use image_normalizer::{ImageNormalizer, NormalizedPhoto};
pub use view_model::{GuestEntry, GuestListView, ViewPhase};

pub mod errors;
pub mod guest;
pub mod ports;

// Re-export the domain boundary types and ports.
pub use errors::{GuestError, StoreError};
pub use guest::{
    CONFIRMED_LABEL, GuestPatch, GuestRecord, GuestStatus, NAME_PLACEHOLDER, NewGuest,
    PENDING_LABEL,
};
pub use ports::{Clock, GuestStore};

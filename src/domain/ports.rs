use async_trait::async_trait;

use crate::domain::errors::StoreError;
use crate::domain::guest::{GuestPatch, GuestRecord, NewGuest};

// Port for the remote spreadsheet that owns the guest rows.
// Use cases depend on this trait, not on the HTTP client.
#[async_trait]
pub trait GuestStore: Send + Sync {
    async fn list(&self) -> Result<Vec<GuestRecord>, StoreError>;
    async fn create(&self, guest: NewGuest) -> Result<(), StoreError>;
    async fn update(&self, name: &str, patch: GuestPatch) -> Result<(), StoreError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_millis(&self) -> u64;
}

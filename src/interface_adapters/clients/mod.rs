// Outbound HTTP clients for external services.

pub mod sheet;

pub use sheet::{BodyShape, SheetClient, SheetClientError, SheetSchema};

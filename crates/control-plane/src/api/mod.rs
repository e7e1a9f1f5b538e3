// HTTP API routes
//
// Each submodule handles one resource with its own state struct.

pub mod common;
pub mod events;
pub mod notifications;

// Re-export common types
pub use common::{ErrorResponse, ListResponse};

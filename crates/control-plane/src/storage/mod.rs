// Storage layer for the notification server
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// StorageBackend implements the core traits:
// - NotificationStore: notification persistence and queries
// - UserDirectory: display data for event payloads

pub mod backend;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::Database;

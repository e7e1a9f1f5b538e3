// Notification Pipeline Abstractions
//
// This crate provides the storage- and transport-agnostic half of the
// Taskdeck notification pipeline (event helper -> event bus -> listener).
//
// Key design decisions:
// - Events are a closed enum with one variant per kind, named on the bus
// - The bus is an explicit instance injected into helpers and subscribers
// - Traits (NotificationStore, RealtimePublisher, Mailer, UserDirectory) for pluggable backends
// - Handler failures stay inside the bus; publishers never see them

pub mod bus;
pub mod error;
pub mod event_helper;
pub mod events;
pub mod notification;
pub mod traits;

// Telemetry (tracing-subscriber initialization)
pub mod telemetry;

// Re-exports for convenience
pub use bus::{DispatchReport, EventBus, EventHandler};
pub use error::{Error, Result};
pub use event_helper::NotificationEventHelper;
pub use events::{
    CommentAddedEvent, NotificationEvent, ProjectInviteEvent, TaskAssignedEvent,
    TaskCompletedEvent, TaskDueEvent,
};
pub use notification::{CreateNotification, Notification, NotificationType, DEFAULT_LIST_LIMIT};
pub use traits::{
    Mailer, NotificationStore, OutgoingEmail, RealtimePublisher, UserDirectory, UserProfile,
};

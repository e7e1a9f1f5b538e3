// Services layer for business logic
// Services own business logic, calling storage and transports through the core traits

pub mod activity;
pub mod listener;
pub mod notification;

pub use activity::{ActivityNotifier, ProjectSummary, TaskSummary, DONE_STATUS};
pub use listener::{DeliveryReport, NotificationListener};
pub use notification::NotificationService;

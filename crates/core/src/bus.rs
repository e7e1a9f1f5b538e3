// Event Bus
//
// In-process publish/subscribe keyed by event name. Handlers are registered
// explicitly at startup. Publishing never fails the publisher: handler errors
// and panics are logged and contained, and later handlers still run.

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::error::Result;
use crate::events::NotificationEvent;

// ============================================================================
// EventHandler Trait
// ============================================================================

/// Trait for reacting to published events.
///
/// A handler is subscribed per event name and is invoked once for every
/// event published under that name, after all handlers registered before it.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one event. Errors are logged by the bus and go no further.
    async fn handle(&self, event: &NotificationEvent) -> Result<()>;

    /// Human-readable name for logging/debugging.
    fn name(&self) -> &'static str {
        "EventHandler"
    }
}

// ============================================================================
// DispatchReport
// ============================================================================

/// Outcome of running one event through its handlers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that returned Ok
    pub handled: usize,
    /// Handlers that returned an error or panicked
    pub failed: usize,
}

// ============================================================================
// EventBus
// ============================================================================

type HandlerMap = HashMap<String, Vec<Arc<dyn EventHandler>>>;

/// Name-keyed event bus shared by publishers and subscribers.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<HandlerMap>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event name
    pub fn subscribe(&self, event_name: impl Into<String>, handler: Arc<dyn EventHandler>) {
        let event_name = event_name.into();
        tracing::debug!(
            event_name = %event_name,
            handler = handler.name(),
            "Subscribing event handler"
        );
        self.handlers
            .write()
            .entry(event_name)
            .or_default()
            .push(handler);
    }

    /// Number of handlers registered for an event name
    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.handlers
            .read()
            .get(event_name)
            .map(|h| h.len())
            .unwrap_or(0)
    }

    /// Publish without waiting for handlers.
    ///
    /// Handlers registered at the time of the call run on a spawned task.
    /// Outside a Tokio runtime the event is dropped with a warning.
    pub fn publish(&self, event: NotificationEvent) {
        let handlers = self.snapshot(event.event_name());
        if handlers.is_empty() {
            tracing::debug!(
                event_name = event.event_name(),
                "No handlers subscribed, dropping event"
            );
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    run_handlers(&handlers, &event).await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    event_name = event.event_name(),
                    "No async runtime available, dropping event"
                );
            }
        }
    }

    /// Run all handlers for the event inline and report the outcome
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchReport {
        let handlers = self.snapshot(event.event_name());
        run_handlers(&handlers, event).await
    }

    fn snapshot(&self, event_name: &str) -> Vec<Arc<dyn EventHandler>> {
        self.handlers
            .read()
            .get(event_name)
            .cloned()
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        let mut names: Vec<_> = handlers.keys().collect();
        names.sort();
        f.debug_struct("EventBus").field("event_names", &names).finish()
    }
}

async fn run_handlers(
    handlers: &[Arc<dyn EventHandler>],
    event: &NotificationEvent,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for handler in handlers {
        match AssertUnwindSafe(handler.handle(event)).catch_unwind().await {
            Ok(Ok(())) => report.handled += 1,
            Ok(Err(e)) => {
                report.failed += 1;
                tracing::error!(
                    event_name = event.event_name(),
                    handler = handler.name(),
                    error = %e,
                    "Event handler failed"
                );
            }
            Err(panic) => {
                report.failed += 1;
                let panic_msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                tracing::error!(
                    event_name = event.event_name(),
                    handler = handler.name(),
                    panic_msg = %panic_msg,
                    "Event handler panicked"
                );
            }
        }
    }

    report
}

// ============================================================================
// Tests
// ============================================================================

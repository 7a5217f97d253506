//! Cancellation event bus
//!
//! Decouples the component that decides to cancel a queued run (a
//! button) from the components that must react (status pollers, log
//! streams). The bus is injected per editing session rather than being
//! a process-wide singleton, so concurrent sessions cannot cross-talk.

use std::sync::{Arc, Mutex, Weak};
use tracing::debug;

type CancelHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, CancelHandler)>,
}

/// Publish/subscribe channel for cancellation intents.
///
/// Emitting notifies every subscriber active at emission time exactly
/// once, in subscription order. The event means "a cancellation was
/// requested"; it says nothing about whether the server-side cancel
/// has completed. Cloning the bus shares the same channel.
#[derive(Clone, Default)]
pub struct CancelBus {
    inner: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for CancelBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl CancelBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; the returned guard keeps the subscription
    /// alive and unsubscribes when dropped.
    pub fn on_cancel_requested<F>(&self, handler: F) -> CancelSubscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut registry = self.inner.lock().expect("cancel bus poisoned");
        registry.next_id += 1;
        let id = registry.next_id;
        registry.handlers.push((id, Arc::new(handler)));
        CancelSubscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Publish a cancellation intent for the given ticket.
    ///
    /// Handlers run outside the registry lock, so a handler may
    /// subscribe or unsubscribe without deadlocking.
    pub fn emit_cancel_requested(&self, ticket_id: &str) {
        let snapshot: Vec<CancelHandler> = {
            let registry = self.inner.lock().expect("cancel bus poisoned");
            registry.handlers.iter().map(|(_, h)| h.clone()).collect()
        };
        debug!(ticket_id, subscribers = snapshot.len(), "cancel requested");
        for handler in snapshot {
            handler(ticket_id);
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().expect("cancel bus poisoned").handlers.len()
    }
}

/// Subscription guard returned by [`CancelBus::on_cancel_requested`]
pub struct CancelSubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl CancelSubscription {
    /// Remove the handler now instead of at drop time
    pub fn unsubscribe(self) {}
}

impl Drop for CancelSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().expect("cancel bus poisoned");
            registry.handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

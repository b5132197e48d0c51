// Event bus implementation
//
// Handlers are keyed by the event's `TypeId`. Publishing snapshots the handler list and
// releases the lock before invoking anything, so a handler may publish or subscribe
// without deadlocking.

use super::Event;
use crate::application::panic_guard::{execute_guarded, PanicGuardResult};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::{debug, warn};

type Handler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    handlers: RwLock<HashMap<TypeId, Vec<(u64, Handler)>>>,
}

impl Inner {
    fn remove(&self, type_id: TypeId, id: u64) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = handlers.get_mut(&type_id) {
            list.retain(|(handler_id, _)| *handler_id != id);
            if list.is_empty() {
                handlers.remove(&type_id);
            }
        }
    }
}

/// Cheap to clone; clones share the same subscriber table
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E`
    ///
    /// The handler stays registered for as long as the returned `Subscription` lives.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<E, F>(&self, handler: F) -> Subscription
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let type_id = TypeId::of::<E>();
        let wrapped: Handler = Arc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });

        self.inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_default()
            .push((id, wrapped));

        debug!(event = E::NAME, subscription_id = id, "Subscribed");
        Subscription {
            inner: Arc::downgrade(&self.inner),
            type_id,
            id,
            active: true,
        }
    }

    /// Deliver `event` to every current subscriber of its type, in subscription order
    ///
    /// Returns the number of handlers that completed without panicking.
    pub fn publish<E: Event>(&self, event: E) -> usize {
        let handlers: Vec<Handler> = {
            let table = self
                .inner
                .handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            table
                .get(&TypeId::of::<E>())
                .map(|list| list.iter().map(|(_, handler)| handler.clone()).collect())
                .unwrap_or_default()
        };

        if handlers.is_empty() {
            debug!(event = E::NAME, "Published with no subscribers");
            return 0;
        }

        let mut delivered = 0;
        for handler in &handlers {
            let outcome = execute_guarded(
                E::NAME,
                AssertUnwindSafe(|| handler(&event as &dyn Any)),
            );
            match outcome {
                PanicGuardResult::Success(()) => delivered += 1,
                PanicGuardResult::Panicked(_) => {
                    warn!(event = E::NAME, "Subscriber panicked, continuing with the rest");
                }
            }
        }
        delivered
    }

    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

/// Unsubscribes on drop
pub struct Subscription {
    inner: Weak<Inner>,
    type_id: TypeId,
    id: u64,
    active: bool,
}

impl Subscription {
    /// Unsubscribe now instead of at drop time
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        // Bus already gone means nothing left to unsubscribe from
        if let Some(inner) = self.inner.upgrade() {
            inner.remove(self.type_id, self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}

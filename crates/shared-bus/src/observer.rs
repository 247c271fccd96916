//! # Observer Bus
//!
//! Synchronous multi-listener notification.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// A party interested in events of type `E`.
///
/// Implemented for every `Fn(&E) + Send + Sync` closure, so most callers
/// never name this trait.
pub trait EventListener<E>: Send + Sync {
    /// Called once per published event.
    fn on_event(&self, event: &E);
}

impl<E, F> EventListener<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        self(event)
    }
}

/// Shared handle to a listener. Identity is the handle's allocation.
pub type ListenerHandle<E> = Arc<dyn EventListener<E>>;

fn same_listener<E>(a: &ListenerHandle<E>, b: &ListenerHandle<E>) -> bool {
    // Compare data pointers only; vtable pointers are not unique per type.
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

/// Ordered set of listeners for one event category.
///
/// The bus holds a clone of each handle while subscribed and drops it on
/// unsubscribe. It never outlives the component that owns it.
pub struct ObserverBus<E> {
    listeners: RwLock<Vec<ListenerHandle<E>>>,
    events_published: AtomicU64,
}

impl<E> ObserverBus<E> {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::with_capacity(4)),
            events_published: AtomicU64::new(0),
        }
    }

    /// Subscribe a listener.
    ///
    /// Returns `false` if the listener was already subscribed. That is a
    /// programming error: it fails a debug assertion in debug builds and
    /// leaves the set unchanged in release builds.
    pub fn subscribe(&self, listener: ListenerHandle<E>) -> bool {
        let mut listeners = self.listeners.write();
        let duplicate = listeners.iter().any(|l| same_listener(l, &listener));
        if duplicate {
            drop(listeners);
            warn!(event = std::any::type_name::<E>(), "Duplicate listener subscription ignored");
            debug_assert!(!duplicate, "ObserverBus::subscribe: listener already subscribed");
            return false;
        }
        listeners.push(listener);
        debug!(
            event = std::any::type_name::<E>(),
            listeners = listeners.len(),
            "Listener subscribed"
        );
        true
    }

    /// Wrap a closure in a handle and subscribe it.
    ///
    /// Keep the returned handle to unsubscribe later.
    pub fn subscribe_fn<F>(&self, f: F) -> ListenerHandle<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
        E: 'static,
    {
        let handle: ListenerHandle<E> = Arc::new(f);
        self.subscribe(Arc::clone(&handle));
        handle
    }

    /// Unsubscribe a listener.
    ///
    /// Returns `false` if the listener was not subscribed. Like a duplicate
    /// subscription this trips a debug assertion and is otherwise ignored.
    pub fn unsubscribe(&self, listener: &ListenerHandle<E>) -> bool {
        let mut listeners = self.listeners.write();
        let position = listeners.iter().position(|l| same_listener(l, listener));
        match position {
            Some(index) => {
                listeners.remove(index);
                debug!(
                    event = std::any::type_name::<E>(),
                    listeners = listeners.len(),
                    "Listener unsubscribed"
                );
                true
            }
            None => {
                drop(listeners);
                warn!(event = std::any::type_name::<E>(), "Unsubscribe of unknown listener ignored");
                debug_assert!(position.is_some(), "ObserverBus::unsubscribe: listener not subscribed");
                false
            }
        }
    }

    /// Deliver `event` to every listener subscribed at call time, in
    /// subscription order.
    ///
    /// Returns the number of listeners notified.
    pub fn publish(&self, event: &E) -> usize {
        let snapshot: Vec<ListenerHandle<E>> = self.listeners.read().clone();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        for listener in &snapshot {
            listener.on_event(event);
        }
        snapshot.len()
    }

    /// Whether `listener` is currently subscribed.
    #[must_use]
    pub fn contains(&self, listener: &ListenerHandle<E>) -> bool {
        self.listeners.read().iter().any(|l| same_listener(l, listener))
    }

    /// Number of subscribed listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Total events published on this bus.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl<E> Default for ObserverBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ObserverBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverBus")
            .field("listeners", &self.listener_count())
            .field("events_published", &self.events_published())
            .finish()
    }
}

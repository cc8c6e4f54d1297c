//! Subscription registry and interaction fan-out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tracing::{debug, trace};

use crate::subscription::{Callback, Subscription};

/// Live subscriptions for one scope.
struct Registry {
    subscriptions: Mutex<Vec<Arc<Subscription>>>,
    next_id: AtomicU64,
}

impl Registry {
    fn remove(&self, subscription: &Arc<Subscription>) {
        subscription.clear_timer();
        let mut subscriptions = self
            .subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let before = subscriptions.len();
        subscriptions.retain(|s| !Arc::ptr_eq(s, subscription));
        if subscriptions.len() < before {
            debug!(id = subscription.id(), "subscription removed");
        }
    }
}

/// Owner of all live subscriptions for one scope and fan-out point for
/// interaction signals.
///
/// One dispatcher is shared by an entire subtree of subscribers for as long as
/// the host keeps the scope alive; pass it explicitly to everything that needs
/// to subscribe. Cloning is cheap and clones share the same registry.
///
/// Timers run on the ambient Tokio runtime, so [`Dispatcher::subscribe`] and
/// [`Dispatcher::notify_interaction`] must be called from within one.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create an empty dispatcher. Called once per scope by the host.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                subscriptions: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a new subscription and start its countdown immediately.
    ///
    /// Either callback may be absent; an absent callback is simply skipped at
    /// transition time. The subscription stays registered until
    /// [`SubscriptionHandle::remove`] or [`Dispatcher::dispose_all`] —
    /// dropping the returned handle does not deregister it.
    pub fn subscribe(
        &self,
        timeout: Duration,
        on_active: Option<Callback>,
        on_inactive: Option<Callback>,
    ) -> SubscriptionHandle {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let subscription = Subscription::new(id, timeout, on_active, on_inactive);

        subscription.refresh_timer();
        self.registry
            .subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::clone(&subscription));

        debug!(id, timeout_ms = timeout.as_millis() as u64, "subscription registered");
        SubscriptionHandle {
            registry: Arc::downgrade(&self.registry),
            subscription,
        }
    }

    /// Subscribe for activity transitions only.
    pub fn subscribe_for_activity<F>(&self, timeout: Duration, on_active: F) -> SubscriptionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(timeout, Some(Box::new(on_active)), None)
    }

    /// Subscribe for inactivity transitions only.
    pub fn subscribe_for_inactivity<F>(
        &self,
        timeout: Duration,
        on_inactive: F,
    ) -> SubscriptionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(timeout, None, Some(Box::new(on_inactive)))
    }

    /// Report one raw interaction signal.
    ///
    /// Called by the host's gesture-capture layer exactly once per detected
    /// interaction; the dispatcher knows nothing about the gesture itself.
    /// Fans out to every live subscription: an inactive one is promoted back
    /// to active (firing its activity callback), and every one gets its
    /// countdown restarted. No ordering across subscriptions is guaranteed.
    pub fn notify_interaction(&self) {
        let subscriptions: Vec<Arc<Subscription>> = self
            .registry
            .subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        trace!(live = subscriptions.len(), "interaction signal");
        for subscription in &subscriptions {
            subscription.notify();
        }
    }

    /// Tear down the scope: cancel every live timer and clear the registry.
    ///
    /// No callbacks fire and no timers remain outstanding afterward. Called
    /// once by the host when the owning scope goes away.
    pub fn dispose_all(&self) {
        let drained: Vec<Arc<Subscription>> = {
            let mut subscriptions = self
                .registry
                .subscriptions
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *subscriptions)
        };

        for subscription in &drained {
            subscription.clear_timer();
        }
        debug!(cleared = drained.len(), "dispatcher disposed");
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.registry
            .subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Opaque handle to one registered subscription.
///
/// The only external control over a subscription: callers cannot reach its
/// status or timer, only deregister it.
pub struct SubscriptionHandle {
    registry: Weak<Registry>,
    subscription: Arc<Subscription>,
}

impl SubscriptionHandle {
    /// Cancel the subscription's timer and deregister it.
    ///
    /// Guarantees no callback for this subscription fires afterward, even if
    /// its timer was already due. Idempotent: removing twice, or after
    /// [`Dispatcher::dispose_all`], is a no-op.
    pub fn remove(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.subscription);
        }
    }
}

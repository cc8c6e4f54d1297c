//! Observable activity state for hosts that prefer a value over callbacks.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::dispatcher::{Dispatcher, SubscriptionHandle};

/// User activity state for one timeout window.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityState {
    /// User is currently active (or has not yet been observed idle).
    Active,
    /// User has been idle since the given time.
    Idle { since: DateTime<Utc> },
}

impl ActivityState {
    /// True unless the window has gone idle.
    pub fn is_active(&self) -> bool {
        matches!(self, ActivityState::Active)
    }
}

impl Dispatcher {
    /// Subscribe and observe the window's state on a watch channel instead of
    /// wiring callbacks.
    ///
    /// The receiver starts at [`ActivityState::Active`] and flips to
    /// [`ActivityState::Idle`] when `timeout` elapses without a signal, then
    /// back on the next signal. UI components that render an active/inactive
    /// flag watch the channel and keep no callbacks of their own.
    pub fn watch(&self, timeout: Duration) -> (SubscriptionHandle, watch::Receiver<ActivityState>) {
        let (tx, rx) = watch::channel(ActivityState::Active);
        let tx = Arc::new(tx);

        let on_active = {
            let tx = Arc::clone(&tx);
            Box::new(move || {
                let _ = tx.send(ActivityState::Active);
            }) as crate::Callback
        };
        let on_inactive = Box::new(move || {
            let _ = tx.send(ActivityState::Idle { since: Utc::now() });
        }) as crate::Callback;

        let handle = self.subscribe(timeout, Some(on_active), Some(on_inactive));
        (handle, rx)
    }
}

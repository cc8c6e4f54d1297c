//! Per-subscription timer state machine.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

/// Callback invoked on an activity or inactivity transition.
pub type Callback = Box<dyn Fn() + Send + Sync + 'static>;

/// Lifecycle state of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    /// Timer scheduled, has not fired yet, and no transition has occurred
    /// since creation.
    Pending,
    /// Last observed state is "user is interacting".
    Active,
    /// The timer fired without an intervening refresh.
    Inactive,
}

/// Timer bookkeeping behind the subscription mutex.
struct TimerState {
    status: Status,
    /// Bumped on every reschedule and cancel. A queued fire whose generation
    /// no longer matches is stale and must not transition or run callbacks.
    generation: u64,
    /// At most one outstanding timer task at any instant.
    timer: Option<AbortHandle>,
}

impl TimerState {
    fn is_pending(&self) -> bool {
        matches!(self.status, Status::Pending)
    }
}

/// One independently-timed observer of the interaction signal stream.
///
/// Owned by the dispatcher that created it; external code only holds an opaque
/// handle. Callbacks always run after the internal lock is released, so they
/// may re-enter the dispatcher freely.
pub(crate) struct Subscription {
    id: u64,
    timeout: Duration,
    on_active: Option<Callback>,
    on_inactive: Option<Callback>,
    inner: Mutex<TimerState>,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        timeout: Duration,
        on_active: Option<Callback>,
        on_inactive: Option<Callback>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            timeout,
            on_active,
            on_inactive,
            inner: Mutex::new(TimerState {
                status: Status::Pending,
                generation: 0,
                timer: None,
            }),
        })
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Cancel any outstanding timer and start a fresh countdown.
    ///
    /// Always replaces, never stacks: after N consecutive refreshes at most
    /// one fire is observed, `timeout` after the last refresh.
    pub(crate) fn refresh_timer(self: &Arc<Self>) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        self.schedule_locked(&mut state);
    }

    /// Cancel the outstanding timer, if any, without changing status or
    /// invoking any callback. Used during removal and teardown.
    pub(crate) fn clear_timer(&self) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Handle one interaction signal: promote an inactive subscription back to
    /// active, then restart the countdown.
    ///
    /// The status check and the reschedule happen under one lock acquisition,
    /// so no timer fire can interleave between them. A pending subscription is
    /// only refreshed: it has never gone inactive, so a "became active"
    /// callback would be spurious. An already-active subscription is likewise
    /// only refreshed, keeping the activity callback to one fire per
    /// inactivity period.
    pub(crate) fn notify(self: &Arc<Self>) {
        let became_active = {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let became_active = if state.is_pending() {
                trace!(id = self.id, "signal while pending, refresh only");
                false
            } else if state.status == Status::Inactive {
                state.status = Status::Active;
                true
            } else {
                false
            };
            self.schedule_locked(&mut state);
            became_active
        };

        if became_active {
            debug!(id = self.id, "interaction resumed");
            if let Some(on_active) = &self.on_active {
                on_active();
            }
        }
    }

    /// Replace the outstanding timer with a new one. Caller holds the lock.
    fn schedule_locked(self: &Arc<Self>, state: &mut TimerState) {
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
        let generation = state.generation;

        let subscription = Arc::clone(self);
        let timeout = self.timeout;
        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            subscription.timer_elapsed(generation);
        });
        state.timer = Some(task.abort_handle());
    }

    /// The countdown ran to completion with no intervening refresh.
    fn timer_elapsed(&self, generation: u64) {
        {
            let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            if state.generation != generation {
                // Refreshed or cancelled after this fire was queued.
                return;
            }
            state.timer = None;
            if state.status == Status::Inactive {
                return;
            }
            state.status = Status::Inactive;
        }

        debug!(id = self.id, timeout_ms = self.timeout.as_millis() as u64, "went inactive");
        if let Some(on_inactive) = &self.on_inactive {
            on_inactive();
        }
    }
}

//! Idlewatch - inactivity tracking for event-driven UIs.
//!
//! Detects prolonged absence of user interaction and notifies observers when a
//! configurable period of inactivity elapses, and again when interaction
//! resumes. A [`Dispatcher`] owns any number of independent subscriptions,
//! each with its own timeout and callbacks; the host forwards every raw
//! interaction event to [`Dispatcher::notify_interaction`] and the dispatcher
//! drives each subscription's timer from there.
//!
//! How a gesture is physically captured is the host's business; the dispatcher
//! only needs to hear that one happened. Timers run on the ambient Tokio
//! runtime.
//!
//! ```no_run
//! use idlewatch::Dispatcher;
//! use std::time::Duration;
//!
//! # async fn demo() {
//! let dispatcher = Dispatcher::new();
//! let handle = dispatcher.subscribe_for_inactivity(Duration::from_secs(60), || {
//!     println!("user went idle");
//! });
//!
//! // From the gesture-capture layer, once per raw interaction:
//! dispatcher.notify_interaction();
//!
//! handle.remove();
//! dispatcher.dispose_all();
//! # }
//! ```

mod config;
mod dispatcher;
mod error;
mod state;
mod subscription;

pub use config::TimeoutConfig;
pub use dispatcher::{Dispatcher, SubscriptionHandle};
pub use error::Error;
pub use state::ActivityState;
pub use subscription::Callback;

//! Error types for subscription configuration.

use thiserror::Error;

/// Errors surfaced by the inactivity-tracking API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A timeout was given as a negative number of milliseconds.
    ///
    /// Rejected up front rather than clamped to zero: a negative timeout is
    /// always a caller bug, and clamping would silently turn it into an
    /// immediately-firing subscription.
    #[error("invalid timeout: {0} ms (must be >= 0)")]
    InvalidTimeout(i64),
}

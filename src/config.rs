//! Declarative timeout settings, loadable from host configuration files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Error;

/// Inactivity timeout configuration for one subscription.
///
/// Hosts that read timeouts from configuration (TOML, JSON, ...) deserialize
/// into this struct and call [`TimeoutConfig::timeout`] to obtain a validated
/// [`Duration`] for [`Dispatcher::subscribe`](crate::Dispatcher::subscribe).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Inactivity timeout in milliseconds. Must be >= 0.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: i64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TimeoutConfig {
    /// Validate the configured timeout.
    pub fn validate(&self) -> Result<(), Error> {
        if self.timeout_ms < 0 {
            return Err(Error::InvalidTimeout(self.timeout_ms));
        }
        Ok(())
    }

    /// The configured timeout as a [`Duration`], rejecting negative values.
    pub fn timeout(&self) -> Result<Duration, Error> {
        self.validate()?;
        Ok(Duration::from_millis(self.timeout_ms as u64))
    }
}

/// Default inactivity timeout: one minute.
fn default_timeout_ms() -> i64 {
    60 * 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_one_minute() {
        let cfg = TimeoutConfig::default();
        assert_eq!(cfg.timeout_ms, 60_000);
        assert_eq!(cfg.timeout().unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn missing_field_uses_default() {
        let cfg: TimeoutConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.timeout_ms, 60_000);
    }

    #[test]
    fn parses_explicit_timeout() {
        let cfg: TimeoutConfig = toml::from_str("timeout_ms = 5000").unwrap();
        assert_eq!(cfg.timeout().unwrap(), Duration::from_millis(5000));
    }

    #[test]
    fn zero_timeout_is_valid() {
        let cfg = TimeoutConfig { timeout_ms: 0 };
        assert_eq!(cfg.timeout().unwrap(), Duration::ZERO);
    }

    #[test]
    fn rejects_negative_timeout() {
        let cfg = TimeoutConfig { timeout_ms: -1 };
        assert_eq!(cfg.validate(), Err(Error::InvalidTimeout(-1)));
        assert!(cfg.timeout().is_err());
    }
}

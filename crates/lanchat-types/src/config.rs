//! Application configuration with documented defaults.
//!
//! All operational parameters of the chat core are centralized here.
//! Length limits for nicknames, room names, and messages are fixed by
//! the wire contract and live next to the sanitizer instead.

use serde::{Deserialize, Serialize};

use crate::{LanchatError, Result};

/// Rendezvous tag used when the caller supplies an empty one.
pub const DEFAULT_RENDEZVOUS: &str = "lanchat";

/// Global application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Local-discovery rendezvous tag. Peers only find each other if
    /// their tags match. Empty is replaced by [`DEFAULT_RENDEZVOUS`].
    pub rendezvous: String,

    /// Maximum messages admitted per peer within one rate window.
    pub rate_limit: usize,

    /// Sliding rate window length in seconds.
    pub rate_window_secs: u64,

    /// Settle delay after discovery before the metadata fetch, in
    /// milliseconds. Gives the pubsub session time to form.
    pub settle_delay_ms: u64,

    /// Timeout for a single metadata fetch, in seconds.
    pub metadata_timeout_secs: u64,

    /// Interval of the stale-peer sweep, in seconds.
    pub sweep_interval_secs: u64,

    /// Capacity of the consumer event queue. Producers block when it
    /// is full; events are never dropped.
    pub event_queue_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rendezvous: DEFAULT_RENDEZVOUS.to_string(),
            rate_limit: 20,
            rate_window_secs: 10,
            settle_delay_ms: 500,
            metadata_timeout_secs: 5,
            sweep_interval_secs: 30,
            event_queue_size: 100,
        }
    }
}

impl AppConfig {
    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit == 0 {
            return Err(LanchatError::ConfigError {
                reason: "rate_limit must be greater than 0".into(),
            });
        }
        if self.rate_window_secs == 0 {
            return Err(LanchatError::ConfigError {
                reason: "rate_window_secs must be greater than 0".into(),
            });
        }
        if self.metadata_timeout_secs == 0 {
            return Err(LanchatError::ConfigError {
                reason: "metadata_timeout_secs must be greater than 0".into(),
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(LanchatError::ConfigError {
                reason: "sweep_interval_secs must be greater than 0".into(),
            });
        }
        if self.event_queue_size == 0 {
            return Err(LanchatError::ConfigError {
                reason: "event_queue_size must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Returns the rendezvous tag, substituting the default for empty.
    pub fn rendezvous_or_default(&self) -> &str {
        if self.rendezvous.is_empty() {
            DEFAULT_RENDEZVOUS
        } else {
            &self.rendezvous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn default_values() {
        let config = AppConfig::default();
        assert_eq!(config.rendezvous, "lanchat");
        assert_eq!(config.rate_limit, 20);
        assert_eq!(config.rate_window_secs, 10);
        assert_eq!(config.settle_delay_ms, 500);
        assert_eq!(config.event_queue_size, 100);
    }

    #[test]
    fn zero_rate_limit_rejected() {
        let config = AppConfig {
            rate_limit: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_window_rejected() {
        let config = AppConfig {
            rate_window_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_rendezvous_falls_back() {
        let config = AppConfig {
            rendezvous: String::new(),
            ..AppConfig::default()
        };
        assert_eq!(config.rendezvous_or_default(), DEFAULT_RENDEZVOUS);
    }
}

//! Batch generation settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pause after each synthesis call, in milliseconds.
const fn default_throttle_ms() -> u64 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Delay after every synthesis request to stay under the service rate limit.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
        }
    }
}

impl BatchConfig {
    #[must_use]
    pub const fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = BatchConfig::default();
        assert_eq!(config.throttle_ms, 100);
        assert_eq!(config.throttle(), Duration::from_millis(100));
    }
}

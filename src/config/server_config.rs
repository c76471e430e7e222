use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reconnect policy. Delays are fixed, not exponential: a lost connection is
/// retried after `delay_secs`, except when the disconnect reason indicates
/// login rate limiting, which gets the longer wait.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Reconnect automatically after a disconnect.
    pub enabled: bool,

    /// Maximum reconnect attempts (0 = unlimited).
    pub max_attempts: u32,

    /// Wait after an ordinary disconnect (default: 2 minutes).
    pub delay_secs: u64,

    /// Wait after a throttled disconnect (default: 10 minutes). Spigot-family
    /// servers refuse rapid re-logins with a "Connection throttled!" reason;
    /// retrying on the short delay just burns attempts.
    pub throttled_delay_secs: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 0,
            delay_secs: 120,
            throttled_delay_secs: 600,
        }
    }
}

impl ReconnectConfig {
    /// Pick the backoff delay for a disconnect reason.
    pub fn delay_for_reason(&self, reason: Option<&str>) -> Duration {
        let throttled = reason
            .map(|r| r.to_lowercase().contains("throttle"))
            .unwrap_or(false);
        if throttled {
            Duration::from_secs(self.throttled_delay_secs)
        } else {
            Duration::from_secs(self.delay_secs)
        }
    }

    /// Whether the given attempt number (1-based) is still allowed.
    pub fn should_attempt(&self, attempt: u32) -> bool {
        self.max_attempts == 0 || attempt <= self.max_attempts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 25565,
        }
    }
}

impl std::fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_disconnect_gets_base_delay() {
        let config = ReconnectConfig::default();
        assert_eq!(
            config.delay_for_reason(Some("Internal server error")),
            Duration::from_secs(120)
        );
        assert_eq!(config.delay_for_reason(None), Duration::from_secs(120));
    }

    #[test]
    fn throttle_reason_gets_long_delay() {
        let config = ReconnectConfig::default();
        assert_eq!(
            config.delay_for_reason(Some("Connection throttled! Please wait.")),
            Duration::from_secs(600)
        );
        // case-insensitive
        assert_eq!(
            config.delay_for_reason(Some("THROTTLED")),
            Duration::from_secs(600)
        );
    }

    #[test]
    fn attempt_limit() {
        let unlimited = ReconnectConfig::default();
        assert!(unlimited.should_attempt(10_000));

        let capped = ReconnectConfig {
            max_attempts: 3,
            ..Default::default()
        };
        assert!(capped.should_attempt(3));
        assert!(!capped.should_attempt(4));
    }
}

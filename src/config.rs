use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub presence: PresenceConfig,
    pub telemetry: TelemetryConfig,
}

/// Timing for the presence debounce state machine.
///
/// The observed hardware constants are 30 s / 10 s, but batches and firmware
/// revisions differ, so both stay tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// How long one motion pulse keeps the presence window open.
    pub hold_window_secs: u64,
    /// Grace period after the raw signal drops before presence is released.
    pub release_grace_secs: u64,
}

impl PresenceConfig {
    pub fn hold_window(&self) -> Duration {
        Duration::from_secs(self.hold_window_secs)
    }

    pub fn release_grace(&self) -> Duration {
        Duration::from_secs(self.release_grace_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Minimum seconds between battery attribute reads.
    pub battery_refresh_secs: u64,
}

impl TelemetryConfig {
    pub fn battery_refresh(&self) -> Duration {
        Duration::from_secs(self.battery_refresh_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            presence: PresenceConfig {
                hold_window_secs: 30,
                release_grace_secs: 10,
            },
            telemetry: TelemetryConfig {
                battery_refresh_secs: 30 * 60,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secs) = std::env::var("PRESENCE_HOLD_WINDOW_SECS")
            && let Ok(s) = secs.parse()
        {
            config.presence.hold_window_secs = s;
        }
        if let Ok(secs) = std::env::var("PRESENCE_RELEASE_GRACE_SECS")
            && let Ok(s) = secs.parse()
        {
            config.presence.release_grace_secs = s;
        }
        if let Ok(secs) = std::env::var("BATTERY_REFRESH_SECS")
            && let Ok(s) = secs.parse()
        {
            config.telemetry.battery_refresh_secs = s;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.presence.hold_window(), Duration::from_secs(30));
        assert_eq!(config.presence.release_grace(), Duration::from_secs(10));
        assert_eq!(config.telemetry.battery_refresh(), Duration::from_secs(1800));
    }
}

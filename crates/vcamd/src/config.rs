use std::time::Duration;
use vcam_hw::{DeviceConfig, ModeTimings, RetryPolicy};

/// Daemon configuration, loaded from environment variables.
pub struct Config {
    /// Embedded board name, or a path to a board `.toml` (default: eoco).
    pub board: String,
    /// Overrides the board's `/dev/i2c-N` adapter number.
    pub i2c_adapter: Option<u32>,
    /// Failed transfers tolerated per batch call, shared across both slots.
    pub retry_budget: u32,
    /// Sleep after each failed transfer.
    pub retry_backoff: Duration,
    /// Toggle night mode after every mode change.
    pub nightmode_enabled: bool,
    /// Delay between night mode off and on.
    pub nightmode_delay: Duration,
    /// Run the full init at startup instead of waiting for an Init request.
    pub auto_init: bool,
}

impl Config {
    /// Load configuration from `VCAM_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = RetryPolicy::default();
        Self {
            board: std::env::var("VCAM_BOARD").unwrap_or_else(|_| "eoco".to_string()),
            i2c_adapter: std::env::var("VCAM_I2C_ADAPTER")
                .ok()
                .and_then(|v| v.parse().ok()),
            retry_budget: env_parse("VCAM_RETRY_BUDGET", defaults.budget),
            retry_backoff: env_millis("VCAM_RETRY_BACKOFF_MS", defaults.backoff),
            nightmode_enabled: env_flag("VCAM_NIGHTMODE_ENABLED", true),
            nightmode_delay: env_millis("VCAM_NIGHTMODE_DELAY_MS", vcam_hw::nightmode::DEFAULT_DELAY),
            auto_init: env_flag("VCAM_AUTO_INIT", false),
        }
    }

    pub fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            retry: RetryPolicy {
                budget: self.retry_budget,
                backoff: self.retry_backoff,
                ..RetryPolicy::default()
            },
            nightmode_enabled: self.nightmode_enabled,
            nightmode_delay: self.nightmode_delay,
            timings: ModeTimings::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key).map(|v| v != "0").unwrap_or(default)
}

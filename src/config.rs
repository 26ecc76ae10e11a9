//! System configuration parameters
//!
//! All tunable parameters for the awning controller.
//! Values can be overridden via NVS (non-volatile storage); string
//! defaults come from build-time environment variables.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Link-quality telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
    /// Remote snapshot poll interval (milliseconds)
    pub feed_poll_interval_ms: u32,

    // --- Remote store ---
    /// Realtime database base URL, e.g. `https://<project>.firebaseio.com`
    pub database_url: String<96>,
    /// Database auth token appended as `?auth=`
    pub database_auth: String<64>,

    // --- Wi-Fi ---
    pub wifi_ssid: String<32>,
    pub wifi_password: String<64>,
}

fn build_env<const N: usize>(value: Option<&str>) -> String<N> {
    value
        .and_then(|v| String::try_from(v).ok())
        .unwrap_or_default()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            control_loop_interval_ms: 50,  // 20 Hz
            telemetry_interval_secs: 900,  // 15 min
            feed_poll_interval_ms: 1000,   // 1 Hz

            // Remote store
            database_url: build_env(option_env!("AWNING_DATABASE_URL")),
            database_auth: build_env(option_env!("AWNING_DATABASE_AUTH")),

            // Wi-Fi
            wifi_ssid: build_env(option_env!("AWNING_WIFI_SSID")),
            wifi_password: build_env(option_env!("AWNING_WIFI_PASSWORD")),
        }
    }
}

impl SystemConfig {
    /// Telemetry interval in milliseconds.
    pub fn telemetry_interval_ms(&self) -> u64 {
        u64::from(self.telemetry_interval_secs) * 1000
    }

    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=1000).contains(&self.control_loop_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be 10–1000",
            ));
        }
        if !(10..=86_400).contains(&self.telemetry_interval_secs) {
            return Err(ConfigError::ValidationFailed(
                "telemetry_interval_secs must be 10–86400",
            ));
        }
        if !(100..=60_000).contains(&self.feed_poll_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "feed_poll_interval_ms must be 100–60000",
            ));
        }
        if self.feed_poll_interval_ms < self.control_loop_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "feed_poll_interval_ms must not be shorter than the control loop",
            ));
        }
        if !self.database_url.is_empty()
            && !(self.database_url.starts_with("https://") || self.database_url.starts_with("http://"))
        {
            return Err(ConfigError::ValidationFailed(
                "database_url must start with http:// or https://",
            ));
        }
        if self.database_url.ends_with('/') {
            return Err(ConfigError::ValidationFailed(
                "database_url must not end with '/'",
            ));
        }
        if !self.wifi_ssid.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
            return Err(ConfigError::ValidationFailed(
                "wifi_ssid must be printable ASCII",
            ));
        }
        if !self.wifi_password.is_empty() && self.wifi_password.len() < 8 {
            return Err(ConfigError::ValidationFailed(
                "wifi_password must be empty or at least 8 bytes",
            ));
        }
        Ok(())
    }
}

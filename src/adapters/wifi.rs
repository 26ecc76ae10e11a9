//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] for association management and
//! [`LinkQualityPort`] so the telemetry ticker can read the AP's RSSI.
//!
//! ## cfg gating
//!
//! - **`espidf`**: `esp_idf_svc::wifi::BlockingWifi` over `EspWifi`; RSSI
//!   via `esp_wifi_sta_get_ap_info`.
//! - **host**: a simulated radio with injectable link drops and RSSI.
//!
//! ## Reconnection policy
//!
//! On disconnect the adapter waits an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s) between attempts.  [`ConnectivityPort::poll`]
//! is called once per loop iteration and never blocks unless an attempt
//! is due.

use core::fmt;
use log::{error, info, warn};

#[cfg(feature = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

use super::utils::is_printable_ascii;
use crate::app::ports::LinkQualityPort;

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

pub trait ConnectivityPort {
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Detect drops and run due reconnect attempts.
    fn poll(&mut self, now_ms: u64);
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Reconnecting { attempt: u32 },
}

const INITIAL_BACKOFF_MS: u32 = 2_000;
const MAX_BACKOFF_MS: u32 = 60_000;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Simulated radio (host)
// ───────────────────────────────────────────────────────────────

#[cfg(not(feature = "espidf"))]
#[derive(Debug)]
struct SimRadio {
    link_up: bool,
    rssi: i8,
    failures_left: u32,
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff_ms: u32,
    next_attempt_ms: u64,
    #[cfg(feature = "espidf")]
    driver: BlockingWifi<EspWifi<'static>>,
    #[cfg(not(feature = "espidf"))]
    sim: SimRadio,
}

impl WifiAdapter {
    #[cfg(feature = "espidf")]
    pub fn new(driver: BlockingWifi<EspWifi<'static>>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_ms: INITIAL_BACKOFF_MS,
            next_attempt_ms: 0,
            driver,
        }
    }

    #[cfg(not(feature = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_ms: INITIAL_BACKOFF_MS,
            next_attempt_ms: 0,
            sim: SimRadio {
                link_up: false,
                rssi: -60,
                failures_left: 0,
            },
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    fn schedule_retry(&mut self, now_ms: u64, attempt: u32) {
        self.state = WifiState::Reconnecting { attempt };
        self.next_attempt_ms = now_ms + u64::from(self.backoff_ms);
        self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(feature = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let cfg = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        });
        let fail = |e: esp_idf_svc::sys::EspError| {
            warn!("WiFi(espidf): {}", e);
            ConnectivityError::ConnectionFailed
        };
        self.driver.set_configuration(&cfg).map_err(fail)?;
        if !self.driver.is_started().map_err(fail)? {
            self.driver.start().map_err(fail)?;
        }
        self.driver.connect().map_err(fail)?;
        self.driver.wait_netif_up().map_err(fail)?;
        Ok(())
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        if self.sim.failures_left > 0 {
            self.sim.failures_left -= 1;
            warn!("WiFi(sim): simulated association failure");
            return Err(ConnectivityError::ConnectionFailed);
        }
        self.sim.link_up = true;
        Ok(())
    }

    #[cfg(feature = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.driver.disconnect() {
            warn!("WiFi(espidf): disconnect failed: {}", e);
        }
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim.link_up = false;
    }

    #[cfg(feature = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver.is_connected().unwrap_or(false)
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim.link_up
    }

    #[cfg(feature = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        // SAFETY: ap_info is a plain C struct; the call only writes into it.
        let mut ap_info: esp_idf_svc::sys::wifi_ap_record_t = unsafe { core::mem::zeroed() };
        let ret = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap_info) };
        (ret == esp_idf_svc::sys::ESP_OK).then_some(ap_info.rssi)
    }

    #[cfg(not(feature = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        self.sim.link_up.then_some(self.sim.rssi)
    }

    // ── Simulation controls ───────────────────────────────────

    /// Drop the simulated link as if the AP went away.
    #[cfg(not(feature = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.sim.link_up = false;
    }

    #[cfg(not(feature = "espidf"))]
    pub fn sim_set_rssi(&mut self, rssi: i8) {
        self.sim.rssi = rssi;
    }

    /// Make the next `n` association attempts fail.
    #[cfg(not(feature = "espidf"))]
    pub fn sim_fail_connects(&mut self, n: u32) {
        self.sim.failures_left = n;
    }
}

#[cfg(not(feature = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        match self.platform_connect() {
            Ok(()) => {
                self.state = WifiState::Connected;
                self.backoff_ms = INITIAL_BACKOFF_MS;
                info!("WiFi: connected (RSSI={:?})", self.platform_rssi());
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed: {}", e);
                self.schedule_retry(0, 0);
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_connected()
    }

    fn poll(&mut self, now_ms: u64) {
        match self.state {
            WifiState::Reconnecting { attempt } if now_ms >= self.next_attempt_ms => {
                info!("WiFi: reconnect attempt {}", attempt + 1);
                match self.platform_connect() {
                    Ok(()) => {
                        self.state = WifiState::Connected;
                        self.backoff_ms = INITIAL_BACKOFF_MS;
                        info!("WiFi: reconnected (RSSI={:?})", self.platform_rssi());
                    }
                    Err(_) => self.schedule_retry(now_ms, attempt + 1),
                }
            }
            WifiState::Connected if !self.platform_is_connected() => {
                warn!("WiFi: connection lost, entering reconnect");
                self.schedule_retry(now_ms, 0);
            }
            _ => {}
        }
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|()| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password.push_str(password).map_err(|()| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// LinkQualityPort
// ───────────────────────────────────────────────────────────────

impl LinkQualityPort for WifiAdapter {
    fn rssi_dbm(&self) -> Option<i8> {
        if self.is_connected() {
            self.platform_rssi()
        } else {
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

//! Awning Controller Firmware: Main Entry Point
//!
//! Hexagonal architecture around a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   MonotonicClock  │
//! │  (OutputPort)      (EventSink)    (ConfigPort)                 │
//! │  WifiAdapter            RtdbAdapter                            │
//! │  (Connectivity+Link)    (RemotePort+FeedPort)                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  ActuatorStateMachine · Mailbox · Outbox · Telemetry   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{AnyOutputPin, PinDriver};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{debug, info, warn};

use awning::adapters::hardware::HardwareAdapter;
use awning::adapters::log_sink::LogEventSink;
use awning::adapters::nvs::NvsAdapter;
use awning::adapters::rtdb::RtdbAdapter;
use awning::adapters::time::MonotonicClock;
use awning::adapters::wifi::{ConnectivityPort, WifiAdapter};
use awning::app::ports::{ConfigPort, FeedPort};
use awning::app::service::AppService;
use awning::config::SystemConfig;
use awning::drivers::motor::MotorDriver;
use awning::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Awning controller v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 2. Motor outputs LOW before anything else ─────────────
    // SAFETY: CLOSE_GPIO and OPEN_GPIO are claimed only here.
    let close = PinDriver::output(unsafe { AnyOutputPin::new(pins::CLOSE_GPIO) })?;
    let open = PinDriver::output(unsafe { AnyOutputPin::new(pins::OPEN_GPIO) })?;
    let mut hw = HardwareAdapter::new(MotorDriver::new(close, open)?);

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new(nvs_partition.clone()).and_then(|nvs| nvs.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };

    // ── 4. Application core ───────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(&config);
    app.start(&mut hw, &mut sink);

    // ── 5. Network ────────────────────────────────────────────
    let driver = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?,
        sysloop,
    )?;
    let mut wifi = WifiAdapter::new(driver);
    match wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        Ok(()) => {
            if let Err(e) = wifi.connect() {
                warn!("WiFi: initial connect failed ({}), will retry", e);
            }
        }
        Err(e) => warn!("WiFi: {} - running offline", e),
    }
    let mut rtdb = RtdbAdapter::new(&config)?;

    // ── 6. Control loop ───────────────────────────────────────
    let clock = MonotonicClock::new();
    let period = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    info!("System ready. Entering control loop ({}ms).", config.control_loop_interval_ms);

    loop {
        let now_ms = clock.uptime_ms();

        wifi.poll(now_ms);
        rtdb.set_link_up(wifi.is_connected());

        match rtdb.poll_snapshot(now_ms) {
            Ok(Some(snapshot)) => {
                // A rejected snapshot is logged by the service; fields keep
                // their prior values.
                let _ = app.on_field_changed("/", &snapshot);
            }
            Ok(None) => {}
            Err(e) => debug!("Feed: poll failed: {}", e),
        }

        app.tick(now_ms, &mut hw, &mut rtdb, &wifi, &mut sink);

        std::thread::sleep(period);
    }
}

//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | outputs LOW, awaiting snapshot");
            }
            AppEvent::FieldChanged { path, value } => {
                info!("FIELD | {} = {}", path.full(), value);
            }
            AppEvent::MotionStarted {
                from,
                to,
                duration_ms,
            } => {
                info!("MOTION | {} -> {} | {}ms", from, to, duration_ms);
            }
            AppEvent::Progress { target, percent } => {
                debug!("MOTION | {} {}%", target, percent);
            }
            AppEvent::Committed { status, kind } => {
                info!("COMMIT | status={} ({:?})", status, kind);
            }
            AppEvent::MotionBlocked(reason) => {
                warn!("BLOCK | {:?}", reason);
            }
            AppEvent::PushFailed { path, error } => {
                warn!("PUSH | {} failed: {}", path.full(), error);
            }
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | rssi={}dBm | status={} | up={}s",
                    t.rssi_dbm,
                    t.status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                    t.uptime_secs,
                );
            }
        }
    }
}

//! Interval timers for the control loop.
//!
//! The loop runs at a fixed cadence; periodic side jobs (feed polling,
//! link-quality telemetry) hang off [`IntervalGate`]s checked once per
//! iteration against the monotonic clock.
//!
//! ```text
//!   now_ms ──▶ IntervalGate::poll ──▶ true  → run the job, re-arm
//!                                 └─▶ false → skip this iteration
//! ```

use log::debug;

use crate::app::ports::LinkQualityPort;

// ═══════════════════════════════════════════════════════════════
//  Interval gate
// ═══════════════════════════════════════════════════════════════

/// Fires when at least `interval_ms` has elapsed since it last fired.
/// A gate that never fired is considered elapsed, so the first poll
/// after boot fires immediately.
#[derive(Debug, Clone)]
pub struct IntervalGate {
    interval_ms: u64,
    last_fired_ms: Option<u64>,
}

impl IntervalGate {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
        }
    }

    /// Whether the interval has elapsed at `now_ms`, without consuming it.
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.last_fired_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms)
    }

    /// Consume the gate if due.  Returns `true` when the caller should run.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.is_due(now_ms) {
            self.last_fired_ms = Some(now_ms);
            true
        } else {
            false
        }
    }

    /// Change the interval without resetting the last-fired timestamp.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_fired_ms(&self) -> Option<u64> {
        self.last_fired_ms
    }
}

// ═══════════════════════════════════════════════════════════════
//  Telemetry ticker
// ═══════════════════════════════════════════════════════════════

/// Link-quality reporting on an [`IntervalGate`].
///
/// The gate is consumed only when an RSSI reading is available, so a
/// report missed while Wi-Fi is down goes out as soon as the link returns.
#[derive(Debug, Clone)]
pub struct TelemetryTicker {
    gate: IntervalGate,
}

impl TelemetryTicker {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            gate: IntervalGate::new(interval_ms),
        }
    }

    /// Returns the RSSI to report when a report is due.
    pub fn poll(&mut self, now_ms: u64, link: &impl LinkQualityPort) -> Option<i8> {
        if !self.gate.is_due(now_ms) {
            return None;
        }
        let Some(rssi) = link.rssi_dbm() else {
            debug!("Telemetry: due but no link, deferring");
            return None;
        };
        self.gate.poll(now_ms);
        Some(rssi)
    }

    pub fn interval_ms(&self) -> u64 {
        self.gate.interval_ms()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLink(Option<i8>);

    impl LinkQualityPort for FixedLink {
        fn rssi_dbm(&self) -> Option<i8> {
            self.0
        }
    }

    #[test]
    fn gate_fires_on_first_poll() {
        let mut g = IntervalGate::new(1_000);
        assert!(g.poll(0));
        assert_eq!(g.last_fired_ms(), Some(0));
    }

    #[test]
    fn gate_waits_full_interval() {
        let mut g = IntervalGate::new(1_000);
        assert!(g.poll(500));
        assert!(!g.poll(1_000));
        assert!(!g.poll(1_499));
        assert!(g.poll(1_500));
        assert!(!g.poll(1_501));
    }

    #[test]
    fn gate_tolerates_clock_behind_last_fire() {
        let mut g = IntervalGate::new(100);
        assert!(g.poll(1_000));
        assert!(!g.poll(900));
    }

    #[test]
    fn telemetry_reports_at_boot_then_every_interval() {
        let link = FixedLink(Some(-61));
        let mut t = TelemetryTicker::new(900_000);
        assert_eq!(t.poll(0, &link), Some(-61));
        assert_eq!(t.poll(899_999, &link), None);
        assert_eq!(t.poll(900_000, &link), Some(-61));
    }

    #[test]
    fn telemetry_deferred_while_link_down() {
        let mut t = TelemetryTicker::new(1_000);
        assert_eq!(t.poll(0, &FixedLink(None)), None);
        assert_eq!(t.poll(50, &FixedLink(Some(-70))), Some(-70));
        assert_eq!(t.poll(100, &FixedLink(Some(-70))), None);
    }
}

//! Mock adapters for integration tests.
//!
//! Records every output change, remote write and event so tests can
//! assert on the full history without touching GPIO or the network.

use awning::app::events::AppEvent;
use awning::app::ports::{EventSink, LinkQualityPort, OutputPort, RemotePort};
use awning::error::{ActuatorError, TransportError};
use awning::fsm::status::Drive;
use awning::remote::paths::RemotePath;

// ── MockHardware ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Drive(Drive),
    AllOff,
}

pub struct MockHardware {
    pub calls: Vec<OutputCall>,
    drive: Drive,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            drive: Drive::Idle,
        }
    }

    /// `(close, open)` line levels right now.
    pub fn levels(&self) -> (bool, bool) {
        self.drive.levels()
    }

    pub fn current_drive(&self) -> Drive {
        self.drive
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for MockHardware {
    fn drive(&mut self, drive: Drive) -> Result<(), ActuatorError> {
        self.calls.push(OutputCall::Drive(drive));
        self.drive = drive;
        Ok(())
    }

    fn all_off(&mut self) {
        self.calls.push(OutputCall::AllOff);
        self.drive = Drive::Idle;
    }

    fn current(&self) -> Drive {
        self.drive
    }
}

// ── MockRemote ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRemote {
    pub writes: Vec<(RemotePath, i64)>,
    pub failure: Option<TransportError>,
}

#[allow(dead_code)]
impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes_to(&self, path: RemotePath) -> Vec<i64> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == path)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl RemotePort for MockRemote {
    fn push(&mut self, path: RemotePath, value: i64) -> Result<(), TransportError> {
        if let Some(e) = self.failure {
            return Err(e);
        }
        self.writes.push((path, value));
        Ok(())
    }
}

// ── MockLink ──────────────────────────────────────────────────

pub struct MockLink(pub Option<i8>);

impl LinkQualityPort for MockLink {
    fn rssi_dbm(&self) -> Option<i8> {
        self.0
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

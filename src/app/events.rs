//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, count in a test, etc.

use crate::error::TransportError;
use crate::fsm::context::{BlockReason, CommitKind};
use crate::fsm::status::ActuatorStatus;
use crate::remote::paths::RemotePath;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started; outputs are LOW.
    Started,

    /// A mirrored field took a new value from the feed.
    FieldChanged { path: RemotePath, value: i64 },

    /// A motion segment started or changed direction.
    MotionStarted {
        from: ActuatorStatus,
        to: ActuatorStatus,
        duration_ms: u32,
    },

    /// Percentage of the running segment (0–100).
    Progress { target: ActuatorStatus, percent: u8 },

    /// A segment ended and `status` was committed.
    Committed {
        status: ActuatorStatus,
        kind: CommitKind,
    },

    /// Outputs held LOW for the given reason.  Emitted on change only.
    MotionBlocked(BlockReason),

    /// A remote write failed and stays queued.
    PushFailed {
        path: RemotePath,
        error: TransportError,
    },

    /// Periodic link-quality report.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub rssi_dbm: i8,
    pub status: Option<ActuatorStatus>,
    pub uptime_secs: u64,
}

impl AppEvent {
    /// Helper for constructing the value of [`AppEvent::FieldChanged`].
    pub(crate) fn field_changed(update: super::commands::FieldUpdate) -> Self {
        use super::commands::FieldUpdate;
        let value = match update {
            FieldUpdate::Status(s) | FieldUpdate::RequestedStatus(s) => s.to_wire(),
            FieldUpdate::Duration(ms)
            | FieldUpdate::OpeningDuration(ms)
            | FieldUpdate::ClosingDuration(ms) => i64::from(ms),
        };
        Self::FieldChanged {
            path: update.path(),
            value,
        }
    }
}

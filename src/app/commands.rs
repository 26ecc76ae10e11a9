//! Inbound field updates to the application service.
//!
//! These represent remote-store changes delivered by the feed adapter.
//! They are queued in the [`Mailbox`](crate::remote::mailbox::Mailbox)
//! and applied to [`SyncedFields`] at the start of the next tick.

use crate::fsm::context::SyncedFields;
use crate::fsm::status::ActuatorStatus;
use crate::remote::paths::RemotePath;

/// A decoded change to one mirrored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    Status(ActuatorStatus),
    RequestedStatus(ActuatorStatus),
    Duration(u32),
    OpeningDuration(u32),
    ClosingDuration(u32),
}

impl FieldUpdate {
    /// Remote path this update came from.
    pub fn path(self) -> RemotePath {
        match self {
            Self::Status(_) => RemotePath::Status,
            Self::RequestedStatus(_) => RemotePath::RequestedStatus,
            Self::Duration(_) => RemotePath::Duration,
            Self::OpeningDuration(_) => RemotePath::OpeningDuration,
            Self::ClosingDuration(_) => RemotePath::ClosingDuration,
        }
    }

    /// Write into `fields`.  Returns `true` if the value changed.
    pub fn apply(self, fields: &mut SyncedFields) -> bool {
        fn set<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }
        match self {
            Self::Status(s) => set(&mut fields.status, Some(s)),
            Self::RequestedStatus(s) => set(&mut fields.requested, Some(s)),
            Self::Duration(ms) => set(&mut fields.duration_ms, ms),
            Self::OpeningDuration(ms) => set(&mut fields.opening_duration_ms, ms),
            Self::ClosingDuration(ms) => set(&mut fields.closing_duration_ms, ms),
        }
    }
}

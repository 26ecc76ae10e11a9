//! Mirrored remote fields and per-step outputs.
//!
//! `SyncedFields` is the single owned struct the feed adapter writes and
//! the state machine reads.  Both run inside the same loop iteration, one
//! after the other, so it needs no locking.

use super::status::{ActuatorStatus, Drive};

// ---------------------------------------------------------------------------
// Mirrored fields (written by the feed, read by the state machine)
// ---------------------------------------------------------------------------

/// Local mirror of the remote `status` / `requested_status` / duration keys.
///
/// `None` means "not received yet"; the only time a field is unknown is
/// before the first snapshot arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncedFields {
    /// Last committed position state.
    pub status: Option<ActuatorStatus>,
    /// Desired target state.
    pub requested: Option<ActuatorStatus>,
    /// Full traversal time in ms.  0 = unknown.
    pub duration_ms: u32,
    /// Traversal time when opening; 0 = fall back to `duration_ms`.
    pub opening_duration_ms: u32,
    /// Traversal time when closing; 0 = fall back to `duration_ms`.
    pub closing_duration_ms: u32,
}

impl SyncedFields {
    /// Duration governing a motion towards `target`.
    pub fn duration_for(&self, target: ActuatorStatus) -> u32 {
        let specific = match target {
            ActuatorStatus::Opening => self.opening_duration_ms,
            ActuatorStatus::Closing => self.closing_duration_ms,
            ActuatorStatus::Stopped => 0,
        };
        if specific > 0 { specific } else { self.duration_ms }
    }

    /// Both status fields have been received and agree.
    pub fn is_settled(&self) -> bool {
        matches!((self.status, self.requested), (Some(s), Some(r)) if s == r)
    }
}

// ---------------------------------------------------------------------------
// Step outcome (written by the state machine, consumed by the service)
// ---------------------------------------------------------------------------

/// Why a step declined to drive the motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// `status` or `requested_status` not received yet.
    Unsynced,
    /// Motion requested but the applicable duration is 0.
    UnknownDuration,
}

/// How a motion segment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    /// Elapsed time reached the duration.
    Completed,
    /// A STOP request short-circuited the segment.
    Halted,
    /// The feed made `status == requested` while a segment was running.
    Reverted,
}

/// Everything one [`step`](super::ActuatorStateMachine::step) decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Output pattern to apply this tick.
    pub drive: Drive,
    /// Progress percentage to push, if moving.
    pub progress: Option<u8>,
    /// Status to push at `status`, if the segment ended.
    pub commit: Option<(ActuatorStatus, CommitKind)>,
    /// Set when the step was a no-op.
    pub blocked: Option<BlockReason>,
    /// A motion segment started, or changed direction, on this step.
    pub started: Option<ActuatorStatus>,
}

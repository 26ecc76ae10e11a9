//! Actuator synchronization state machine.
//!
//! Reconciles the mirrored `(status, requested, duration)` triple against
//! a monotonic millisecond clock and decides, every tick, the motor output
//! pattern, the motion progress, and whether the segment is complete.
//!
//! ```text
//!              status != requested, duration > 0
//!   SETTLED ─────────────────────────────────────▶ MOVING(requested)
//!      ▲                                              │
//!      │  elapsed >= duration  → commit requested     │
//!      ├──────────────────────────────────────────────┤
//!      │  requested = Stopped  → rewind 2×duration,   │
//!      │                          commit same tick    │
//!      ├──────────────────────────────────────────────┤
//!      │  feed makes status == requested → commit     │
//!      └──────────────────────────────────────────────┘
//!
//!   any ──[status/requested unknown]──▶ BLOCKED(Unsynced)
//!   any ──[duration == 0, requested != Stopped]──▶ BLOCKED(UnknownDuration)
//! ```
//!
//! The state machine is pure: it never touches pins or the network.  The
//! [`AppService`](crate::app::service::AppService) applies the returned
//! [`StepOutcome`].

pub mod context;
pub mod status;

use context::{BlockReason, CommitKind, StepOutcome, SyncedFields};
use log::{debug, info, warn};
use status::{ActuatorStatus, Drive};

/// Coarse state for queries and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    /// `status == requested`; outputs LOW.
    Settled,
    /// A segment towards the given status is running.
    Moving(ActuatorStatus),
    /// Outputs held LOW until the reason clears.
    Blocked(BlockReason),
}

pub struct ActuatorStateMachine {
    /// Reference time of the running segment (ms).  Signed because a STOP
    /// rewind can move it before boot.  `None` = not moving.
    motion_ref_ms: Option<i64>,
    /// Direction of the running segment.
    target: Option<ActuatorStatus>,
    drive: Drive,
    blocked: Option<BlockReason>,
}

impl Default for ActuatorStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorStateMachine {
    pub fn new() -> Self {
        Self {
            motion_ref_ms: None,
            target: None,
            drive: Drive::Idle,
            blocked: Some(BlockReason::Unsynced),
        }
    }

    /// Advance by one tick.
    ///
    /// On completion the committed status is written into `fields.status`
    /// immediately so the settled invariant holds without waiting for the
    /// remote echo.
    pub fn step(&mut self, now_ms: u64, fields: &mut SyncedFields) -> StepOutcome {
        let (Some(status), Some(requested)) = (fields.status, fields.requested) else {
            return self.block(BlockReason::Unsynced);
        };

        if status == requested {
            self.drive = Drive::Idle;
            self.blocked = None;
            self.target = None;
            let commit = self.motion_ref_ms.take().map(|_| {
                info!("FSM: segment reverted, settled at {}", status);
                (status, CommitKind::Reverted)
            });
            return StepOutcome {
                drive: Drive::Idle,
                commit,
                ..StepOutcome::default()
            };
        }

        let duration = fields.duration_for(requested);
        if duration == 0 && requested != ActuatorStatus::Stopped {
            if self.blocked != Some(BlockReason::UnknownDuration) {
                warn!("FSM: {} requested but duration unknown, holding", requested);
            }
            return self.block(BlockReason::UnknownDuration);
        }
        self.blocked = None;

        // STOP raises no line and commits on this step, so it needs no
        // known duration; 1 ms keeps the progress division defined.
        let duration = i64::from(duration.max(1));
        let now = now_ms as i64;

        let reference = self.motion_ref_ms.get_or_insert(now);
        if requested == ActuatorStatus::Stopped {
            // Pushes elapsed past the duration so the segment commits below.
            *reference -= 2 * duration;
        }
        let elapsed = (now - *reference).max(0);

        let mut started = None;
        if self.target != Some(requested) {
            info!("FSM: {} -> {} over {}ms", status, requested, duration);
            self.target = Some(requested);
            started = Some(requested);
        }

        let progress = (elapsed * 100 / duration).min(100) as u8;
        debug!("FSM: {} {}% ({}ms/{}ms)", requested, progress, elapsed, duration);

        if elapsed >= duration {
            let kind = if requested == ActuatorStatus::Stopped {
                CommitKind::Halted
            } else {
                CommitKind::Completed
            };
            info!("FSM: commit {} ({:?})", requested, kind);
            self.motion_ref_ms = None;
            self.target = None;
            self.drive = Drive::Idle;
            fields.status = Some(requested);
            return StepOutcome {
                drive: Drive::Idle,
                progress: Some(progress),
                commit: Some((requested, kind)),
                blocked: None,
                started,
            };
        }

        self.drive = requested.drive();
        StepOutcome {
            drive: self.drive,
            progress: Some(progress),
            commit: None,
            blocked: None,
            started,
        }
    }

    pub fn phase(&self) -> MotionPhase {
        match (self.blocked, self.target) {
            (Some(reason), _) => MotionPhase::Blocked(reason),
            (None, Some(target)) => MotionPhase::Moving(target),
            (None, None) => MotionPhase::Settled,
        }
    }

    /// Output pattern decided by the last step.
    pub fn drive(&self) -> Drive {
        self.drive
    }

    pub fn is_moving(&self) -> bool {
        self.motion_ref_ms.is_some()
    }

    fn block(&mut self, reason: BlockReason) -> StepOutcome {
        self.motion_ref_ms = None;
        self.target = None;
        self.drive = Drive::Idle;
        self.blocked = Some(reason);
        StepOutcome {
            drive: Drive::Idle,
            blocked: Some(reason),
            ..StepOutcome::default()
        }
    }
}

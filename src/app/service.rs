//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the state machine, the mirrored fields, the feed
//! mailbox, the pending-push outbox and the telemetry ticker.  All I/O
//! flows through port traits injected at call sites, making the whole
//! service testable with mock adapters.
//!
//! ```text
//!  feed ──▶ on_field_changed ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                                │       AppService       │
//!  OutputPort ◀──────────────────│  FSM · Mailbox · Outbox│──▶ RemotePort
//!                                └────────────────────────┘
//! ```
//!
//! One [`tick`](AppService::tick) runs, in order: drain the mailbox,
//! step the state machine, drive the outputs, stage progress/commit,
//! check the telemetry gate, flush the outbox.  Pin state never waits on
//! a push, and an unpushed commit is authoritative over the feed.

use log::{debug, info, warn};
use serde_json::Value;

use crate::config::SystemConfig;
use crate::error::{DecodeError, TransportError};
use crate::fsm::context::{BlockReason, StepOutcome, SyncedFields};
use crate::fsm::status::{ActuatorStatus, Drive};
use crate::fsm::{ActuatorStateMachine, MotionPhase};
use crate::remote::feed;
use crate::remote::mailbox::Mailbox;
use crate::remote::outbox::Outbox;
use crate::remote::paths::RemotePath;
use crate::scheduler::TelemetryTicker;

use super::commands::FieldUpdate;
use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, LinkQualityPort, OutputPort, RemotePort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    fsm: ActuatorStateMachine,
    fields: SyncedFields,
    mailbox: Mailbox,
    outbox: Outbox,
    telemetry: TelemetryTicker,
    /// Last reported block reason, for change-only events.
    last_blocked: Option<BlockReason>,
    /// Last push failure, for change-only events.
    push_error: Option<TransportError>,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the outputs; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            fsm: ActuatorStateMachine::new(),
            fields: SyncedFields::default(),
            mailbox: Mailbox::new(),
            outbox: Outbox::new(),
            telemetry: TelemetryTicker::new(config.telemetry_interval_ms()),
            last_blocked: None,
            push_error: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive both outputs LOW before the first tick.
    pub fn start(&mut self, hw: &mut impl OutputPort, sink: &mut impl EventSink) {
        hw.all_off();
        sink.emit(&AppEvent::Started);
        info!("AppService started, outputs LOW, waiting for first snapshot");
    }

    // ── Feed ingress ──────────────────────────────────────────

    /// Feed callback: decode `(path, value)` and queue the resulting
    /// updates for the next tick.  Returns how many were queued.
    ///
    /// On error nothing is queued and the mirrored fields keep their
    /// prior values.
    pub fn on_field_changed(&mut self, path: &str, value: &Value) -> Result<usize, DecodeError> {
        let batch = feed::decode_event(path, value).inspect_err(|e| {
            warn!("Feed: rejected {} ({})", path, e);
        })?;
        let n = batch.len();
        for update in batch {
            self.mailbox.post(update);
        }
        Ok(n)
    }

    /// Queue an already-decoded update.
    pub fn deliver(&mut self, update: FieldUpdate) {
        self.mailbox.post(update);
    }

    // ── Per-tick orchestration ────────────────────────────────

    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut impl OutputPort,
        remote: &mut impl RemotePort,
        link: &impl LinkQualityPort,
        sink: &mut impl EventSink,
    ) -> StepOutcome {
        self.tick_count += 1;

        // 1. Apply every queued feed update before the step reads fields.
        //    While a commit is unpushed the store still holds the old
        //    status; a snapshot echoing it must not undo the commit.
        let unpushed = self.outbox.pending(RemotePath::Status);
        let fields = &mut self.fields;
        self.mailbox.drain(|update| {
            if let (FieldUpdate::Status(s), Some(committed)) = (update, unpushed) {
                if s.to_wire() != committed {
                    debug!("Feed: ignoring status {} until commit is pushed", s);
                    return;
                }
            }
            if update.apply(fields) {
                sink.emit(&AppEvent::field_changed(update));
            }
        });

        // 2. State machine.
        let before = self.fields.status;
        let out = self.fsm.step(now_ms, &mut self.fields);

        // 3. Outputs follow the local decision regardless of push state.
        self.apply_outputs(out.drive, hw);

        // 4. Motion side effects.
        self.report_motion(&out, before, sink);

        // 5. Telemetry.
        if let Some(rssi) = self.telemetry.poll(now_ms, link) {
            self.outbox.stage(RemotePath::Network, i64::from(rssi));
            sink.emit(&AppEvent::Telemetry(TelemetryData {
                rssi_dbm: rssi,
                status: self.fields.status,
                uptime_secs: now_ms / 1000,
            }));
        }

        // 6. Push whatever is pending.
        self.flush(remote, sink);

        out
    }

    // ── Queries ───────────────────────────────────────────────

    /// Last committed status, `None` before the first snapshot.
    pub fn status(&self) -> Option<ActuatorStatus> {
        self.fields.status
    }

    pub fn requested(&self) -> Option<ActuatorStatus> {
        self.fields.requested
    }

    pub fn fields(&self) -> &SyncedFields {
        &self.fields
    }

    pub fn phase(&self) -> MotionPhase {
        self.fsm.phase()
    }

    pub fn drive(&self) -> Drive {
        self.fsm.drive()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Value waiting to be written at `path`, if any.
    pub fn pending_push(&self, path: RemotePath) -> Option<i64> {
        self.outbox.pending(path)
    }

    /// Feed updates evicted from a full mailbox since boot.
    pub fn dropped_updates(&self) -> u32 {
        self.mailbox.dropped()
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_outputs(&self, drive: Drive, hw: &mut impl OutputPort) {
        if hw.current() == drive {
            return;
        }
        if let Err(e) = hw.drive(drive) {
            warn!("Outputs: {} while applying {:?}, forcing LOW", e, drive);
            hw.all_off();
        }
    }

    fn report_motion(
        &mut self,
        out: &StepOutcome,
        before: Option<ActuatorStatus>,
        sink: &mut impl EventSink,
    ) {
        if let (Some(to), Some(from)) = (out.started, before) {
            sink.emit(&AppEvent::MotionStarted {
                from,
                to,
                duration_ms: self.fields.duration_for(to),
            });
        }

        if let (Some(percent), Some(target)) = (out.progress, self.fields.requested) {
            self.outbox.stage(RemotePath::Progress, i64::from(percent));
            sink.emit(&AppEvent::Progress { target, percent });
        }

        if let Some((status, kind)) = out.commit {
            self.outbox.stage(RemotePath::Status, status.to_wire());
            sink.emit(&AppEvent::Committed { status, kind });
        }

        if out.blocked != self.last_blocked {
            if let Some(reason) = out.blocked {
                sink.emit(&AppEvent::MotionBlocked(reason));
            }
            self.last_blocked = out.blocked;
        }
    }

    fn flush(&mut self, remote: &mut impl RemotePort, sink: &mut impl EventSink) {
        match self.outbox.flush(remote) {
            Ok(sent) => {
                if sent > 0 && self.push_error.take().is_some() {
                    info!("Outbox: link recovered");
                }
            }
            Err((path, error)) => {
                if self.push_error != Some(error) {
                    sink.emit(&AppEvent::PushFailed { path, error });
                } else {
                    debug!("Outbox: {} still failing ({})", path.full(), error);
                }
                self.push_error = Some(error);
            }
        }
    }
}

//! End-to-end actuator flows: feed → AppService → outputs / remote writes.

use awning::app::events::AppEvent;
use awning::app::service::AppService;
use awning::config::SystemConfig;
use awning::error::TransportError;
use awning::fsm::MotionPhase;
use awning::fsm::context::{BlockReason, CommitKind};
use awning::fsm::status::{ActuatorStatus, Drive};
use awning::remote::paths::RemotePath;
use serde_json::json;

use super::mock_hw::{MockHardware, MockLink, MockRemote, OutputCall, RecordingSink};

struct Rig {
    app: AppService,
    hw: MockHardware,
    remote: MockRemote,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let mut rig = Self {
            app: AppService::new(&SystemConfig::default()),
            hw: MockHardware::new(),
            remote: MockRemote::new(),
            sink: RecordingSink::new(),
        };
        rig.app.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    fn feed(&mut self, path: &str, value: serde_json::Value) {
        self.app.on_field_changed(path, &value).unwrap();
    }

    fn tick(&mut self, now_ms: u64) {
        self.app
            .tick(now_ms, &mut self.hw, &mut self.remote, &MockLink(None), &mut self.sink);
    }
}

#[test]
fn open_then_close_cycle() {
    let mut r = Rig::new();
    assert_eq!(r.hw.calls, [OutputCall::AllOff]);

    r.feed("/", json!({ "status": 0, "requested_status": 2, "duration": 4000 }));
    r.tick(0);
    assert_eq!(r.hw.levels(), (false, true));
    r.tick(2_000);
    r.tick(4_000);
    assert_eq!(r.hw.levels(), (false, false));
    assert_eq!(r.app.status(), Some(ActuatorStatus::Opening));
    assert_eq!(r.remote.writes_to(RemotePath::Progress), [0, 50, 100]);
    assert_eq!(r.remote.writes_to(RemotePath::Status), [2]);

    // Echo of our own commit changes nothing.
    let before = r.sink.events.len();
    r.feed("/status", json!(2));
    r.tick(4_050);
    assert_eq!(r.sink.events.len(), before);

    r.feed("/requested_status", json!(1));
    r.tick(5_000);
    assert_eq!(r.hw.levels(), (true, false));
    r.tick(9_000);
    assert_eq!(r.hw.levels(), (false, false));
    assert_eq!(r.app.status(), Some(ActuatorStatus::Closing));
    assert_eq!(r.remote.writes_to(RemotePath::Status), [2, 1]);
}

#[test]
fn stop_request_halts_mid_motion() {
    let mut r = Rig::new();
    r.feed("/", json!({ "status": 0, "requested_status": 2, "duration": 10000 }));
    r.tick(0);
    r.tick(3_000);
    assert_eq!(r.hw.current_drive(), Drive::Open);

    r.feed("/requested_status", json!(0));
    r.tick(3_050);
    assert_eq!(r.hw.levels(), (false, false));
    assert_eq!(r.app.status(), Some(ActuatorStatus::Stopped));
    assert_eq!(r.remote.writes_to(RemotePath::Status), [0]);
    assert_eq!(r.remote.writes_to(RemotePath::Progress), [0, 30, 100]);
    assert!(r.sink.events.contains(&AppEvent::Committed {
        status: ActuatorStatus::Stopped,
        kind: CommitKind::Halted,
    }));
}

#[test]
fn reverted_request_ends_segment() {
    let mut r = Rig::new();
    r.feed("/", json!({ "status": 0, "requested_status": 2, "duration": 10000 }));
    r.tick(0);
    r.tick(1_000);
    r.remote.clear();

    // Another client puts requested back to the settled value.
    r.feed("/requested_status", json!(0));
    r.tick(1_050);
    assert_eq!(r.hw.levels(), (false, false));
    assert_eq!(r.app.phase(), MotionPhase::Settled);
    assert_eq!(r.remote.writes, [(RemotePath::Status, 0)]);

    // Settled ticks are silent.
    r.tick(1_100);
    r.tick(5_000);
    assert_eq!(r.remote.writes.len(), 1);
}

#[test]
fn unknown_duration_holds_until_known() {
    let mut r = Rig::new();
    r.feed("/", json!({ "status": 0, "requested_status": 1 }));
    r.tick(0);
    r.tick(50);
    assert_eq!(r.hw.levels(), (false, false));
    assert!(r.remote.writes.is_empty());
    assert_eq!(
        r.sink
            .count(|e| *e == AppEvent::MotionBlocked(BlockReason::UnknownDuration)),
        1
    );

    r.feed("/duration", json!(2000));
    r.tick(100);
    assert_eq!(r.hw.levels(), (true, false));
    assert_eq!(r.remote.writes_to(RemotePath::Progress), [0]);
}

#[test]
fn direction_specific_duration() {
    let mut r = Rig::new();
    r.feed(
        "/",
        json!({ "status": 1, "requested_status": 2, "duration": 10000, "opening_duration": 2000 }),
    );
    r.tick(0);
    r.tick(1_000);
    r.tick(2_000);
    assert_eq!(r.remote.writes_to(RemotePath::Progress), [0, 50, 100]);
    assert_eq!(r.app.status(), Some(ActuatorStatus::Opening));
    assert!(r.sink.events.contains(&AppEvent::MotionStarted {
        from: ActuatorStatus::Closing,
        to: ActuatorStatus::Opening,
        duration_ms: 2000,
    }));
}

#[test]
fn outage_does_not_stop_local_timing() {
    let mut r = Rig::new();
    r.remote.failure = Some(TransportError::Timeout);
    r.feed("/", json!({ "status": 0, "requested_status": 2, "duration": 4000 }));

    r.tick(0);
    assert_eq!(r.hw.levels(), (false, true));
    r.tick(4_000);
    assert_eq!(r.hw.levels(), (false, false));
    assert_eq!(r.app.status(), Some(ActuatorStatus::Opening));
    assert_eq!(r.app.pending_push(RemotePath::Status), Some(2));
    assert_eq!(
        r.sink.count(|e| matches!(e, AppEvent::PushFailed { .. })),
        1
    );

    r.remote.failure = None;
    r.tick(4_050);
    assert_eq!(
        r.remote.writes,
        [(RemotePath::Progress, 100), (RemotePath::Status, 2)]
    );
}

#[test]
fn outputs_never_both_high_across_reversal() {
    let mut r = Rig::new();
    r.feed("/", json!({ "status": 0, "requested_status": 2, "duration": 10000 }));
    r.tick(0);
    r.feed("/requested_status", json!(1));
    r.tick(100);
    r.feed("/requested_status", json!(2));
    r.tick(200);
    for call in &r.hw.calls {
        if let OutputCall::Drive(d) = call {
            let (close, open) = d.levels();
            assert!(!(close && open));
        }
    }
    assert_eq!(r.hw.current_drive(), Drive::Open);
}

#[test]
fn stop_commits_with_only_direction_duration() {
    let mut r = Rig::new();
    r.feed(
        "/",
        json!({ "status": 1, "requested_status": 2, "opening_duration": 10000 }),
    );
    r.tick(0);
    r.tick(3_000);
    assert_eq!(r.hw.current_drive(), Drive::Open);

    r.feed("/requested_status", json!(0));
    r.tick(3_050);
    assert_eq!(r.hw.levels(), (false, false));
    assert_eq!(r.app.status(), Some(ActuatorStatus::Stopped));
    assert_eq!(r.app.phase(), MotionPhase::Settled);
    assert_eq!(r.remote.writes_to(RemotePath::Status), [0]);

    r.tick(10_000);
    assert_eq!(r.remote.writes_to(RemotePath::Status), [0]);
}

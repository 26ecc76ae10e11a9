//! Remote sync through the simulated realtime-database adapter.

use awning::adapters::rtdb::RtdbAdapter;
use awning::app::commands::FieldUpdate;
use awning::app::events::AppEvent;
use awning::app::ports::FeedPort;
use awning::app::service::AppService;
use awning::config::SystemConfig;
use awning::error::{DecodeError, TransportError};
use awning::fsm::status::ActuatorStatus;
use awning::remote::mailbox::MAILBOX_DEPTH;
use awning::remote::paths::RemotePath;
use serde_json::json;

use super::mock_hw::{MockHardware, MockLink, RecordingSink};

fn poll_into(app: &mut AppService, db: &mut RtdbAdapter, now_ms: u64) -> Option<usize> {
    let snapshot = db.poll_snapshot(now_ms).unwrap()?;
    Some(app.on_field_changed("/", &snapshot).unwrap())
}

#[test]
fn snapshot_drives_motion_and_commit_lands_in_store() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let mut db = RtdbAdapter::new(&config).unwrap();
    let (mut hw, mut sink) = (MockHardware::new(), RecordingSink::new());
    let link = MockLink(Some(-58));

    db.sim_set(RemotePath::Status, 0);
    db.sim_set(RemotePath::RequestedStatus, 2);
    db.sim_set(RemotePath::Duration, 3000);

    app.start(&mut hw, &mut sink);
    assert_eq!(poll_into(&mut app, &mut db, 0), Some(3));
    app.tick(0, &mut hw, &mut db, &link, &mut sink);
    assert_eq!(db.sim_get(RemotePath::Progress), Some(0));
    assert_eq!(db.sim_get(RemotePath::Network), Some(-58));

    app.tick(3_000, &mut hw, &mut db, &link, &mut sink);
    assert_eq!(db.sim_get(RemotePath::Status), Some(2));
    assert_eq!(db.sim_get(RemotePath::Progress), Some(100));

    // Next poll sees our own writes; progress and network are not mirrored.
    assert_eq!(poll_into(&mut app, &mut db, 3_000), Some(3));
    let before = sink.events.len();
    app.tick(3_050, &mut hw, &mut db, &link, &mut sink);
    assert_eq!(sink.events.len(), before);
    assert_eq!(hw.levels(), (false, false));
}

#[test]
fn invalid_remote_values_keep_prior_state() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let (mut hw, mut sink) = (MockHardware::new(), RecordingSink::new());
    let mut db = RtdbAdapter::new(&config).unwrap();
    let link = MockLink(None);

    app.on_field_changed("/", &json!({ "status": 2, "requested_status": 2, "duration": 5000 }))
        .unwrap();
    app.tick(0, &mut hw, &mut db, &link, &mut sink);

    assert_eq!(
        app.on_field_changed("/requested_status", &json!(9)),
        Err(DecodeError::InvalidStatus(9))
    );
    assert_eq!(
        app.on_field_changed("/duration", &json!(-5)),
        Err(DecodeError::InvalidDuration(-5))
    );
    assert_eq!(
        app.on_field_changed("/", &json!([1, 2])),
        Err(DecodeError::NotAnObject)
    );
    assert_eq!(app.on_field_changed("/progress", &json!(77)), Ok(0));

    app.tick(50, &mut hw, &mut db, &link, &mut sink);
    assert_eq!(app.requested(), Some(ActuatorStatus::Opening));
    assert_eq!(app.fields().duration_ms, 5000);
    assert_eq!(hw.levels(), (false, false));
}

#[test]
fn null_leaf_keeps_prior_value() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let (mut hw, mut sink) = (MockHardware::new(), RecordingSink::new());
    let mut db = RtdbAdapter::new(&config).unwrap();

    app.on_field_changed("/duration", &json!(7000)).unwrap();
    assert_eq!(app.on_field_changed("/duration", &serde_json::Value::Null), Ok(0));
    app.tick(0, &mut hw, &mut db, &MockLink(None), &mut sink);
    assert_eq!(app.fields().duration_ms, 7000);
}

#[test]
fn mailbox_overflow_keeps_newest() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let (mut hw, mut sink) = (MockHardware::new(), RecordingSink::new());
    let mut db = RtdbAdapter::new(&config).unwrap();

    let total = MAILBOX_DEPTH as u32 + 4;
    for ms in 1..=total {
        app.deliver(FieldUpdate::Duration(ms));
    }
    assert_eq!(app.dropped_updates(), 4);

    app.tick(0, &mut hw, &mut db, &MockLink(None), &mut sink);
    assert_eq!(app.fields().duration_ms, total);
}

#[test]
fn link_down_defers_pushes_until_reconnect() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let (mut hw, mut sink) = (MockHardware::new(), RecordingSink::new());
    let mut db = RtdbAdapter::new(&config).unwrap();

    app.on_field_changed("/", &json!({ "status": 1, "requested_status": 2, "duration": 1000 }))
        .unwrap();
    db.set_link_up(false);
    app.tick(0, &mut hw, &mut db, &MockLink(None), &mut sink);
    app.tick(500, &mut hw, &mut db, &MockLink(None), &mut sink);
    app.tick(1_000, &mut hw, &mut db, &MockLink(None), &mut sink);
    assert!(db.sim_writes().is_empty());
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::PushFailed {
                error: TransportError::NotConnected,
                ..
            }
        )),
        1
    );

    db.set_link_up(true);
    app.tick(1_050, &mut hw, &mut db, &MockLink(Some(-70)), &mut sink);
    assert_eq!(
        db.sim_writes(),
        &[
            (RemotePath::Progress, 100),
            (RemotePath::Status, 2),
            (RemotePath::Network, -70)
        ]
    );
}

#[test]
fn stale_snapshot_after_outage_keeps_commit() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let mut db = RtdbAdapter::new(&config).unwrap();
    let (mut hw, mut sink) = (MockHardware::new(), RecordingSink::new());
    let link = MockLink(None);

    db.sim_set(RemotePath::Status, 1);
    db.sim_set(RemotePath::RequestedStatus, 2);
    db.sim_set(RemotePath::Duration, 1000);

    // Same order as the firmware loop: poll the feed, then tick.
    assert_eq!(poll_into(&mut app, &mut db, 0), Some(3));
    app.tick(0, &mut hw, &mut db, &link, &mut sink);
    assert_eq!(hw.levels(), (false, true));

    db.set_link_up(false);
    app.tick(1_000, &mut hw, &mut db, &link, &mut sink);
    assert_eq!(app.status(), Some(ActuatorStatus::Opening));
    assert_eq!(db.sim_get(RemotePath::Status), Some(1));

    // First snapshot after reconnect still carries the old status.
    db.set_link_up(true);
    assert!(poll_into(&mut app, &mut db, 2_000).is_some());
    app.tick(2_000, &mut hw, &mut db, &link, &mut sink);
    assert_eq!(hw.levels(), (false, false));
    assert_eq!(app.status(), Some(ActuatorStatus::Opening));
    assert_eq!(db.sim_get(RemotePath::Status), Some(2));

    assert!(poll_into(&mut app, &mut db, 3_000).is_some());
    app.tick(3_000, &mut hw, &mut db, &link, &mut sink);
    assert_eq!(hw.levels(), (false, false));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::MotionStarted { .. })),
        1
    );
}

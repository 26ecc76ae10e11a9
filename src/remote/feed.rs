//! Change-feed decoding.
//!
//! The realtime database reports changes as `(path, value)` pairs where
//! `path` is relative to the subscribed `/awning` root.  A root-level
//! event (`"/"`) carries the whole object; anything else carries a single
//! leaf.  Values are decoded into [`FieldUpdate`]s here so nothing past
//! this boundary handles raw JSON.
//!
//! Invalid values are rejected with a [`DecodeError`] and leave the
//! mirrored field unchanged.  Paths the controller writes itself
//! (`progress`, `network`) and unknown keys are ignored.

use heapless::Vec;
use log::{debug, warn};
use serde_json::Value;

use crate::app::commands::FieldUpdate;
use crate::error::DecodeError;
use crate::fsm::status::ActuatorStatus;

use super::paths::{RemotePath, is_root};

/// Upper bound on updates one event can carry (one per inbound key).
pub const MAX_UPDATES: usize = 5;

pub type UpdateBatch = Vec<FieldUpdate, MAX_UPDATES>;

/// Decode one feed event.
///
/// A root snapshot updates every inbound key it contains; keys that are
/// absent or `null` keep their prior value.  A snapshot with some invalid
/// entries still applies the valid ones.  A single-leaf event with an
/// invalid value returns the error.
pub fn decode_event(path: &str, value: &Value) -> Result<UpdateBatch, DecodeError> {
    let mut batch = UpdateBatch::new();

    if is_root(path) {
        let obj = match value {
            Value::Object(obj) => obj,
            // Root deleted: nothing to mirror.
            Value::Null => return Ok(batch),
            _ => return Err(DecodeError::NotAnObject),
        };
        for (key, leaf) in obj {
            let Some(field) = RemotePath::from_key(key) else {
                debug!("Feed: ignoring unknown key '{}'", key);
                continue;
            };
            match decode_leaf(field, leaf) {
                Ok(Some(update)) => {
                    // Capacity equals the number of inbound keys.
                    let _ = batch.push(update);
                }
                Ok(None) => {}
                Err(e) => warn!("Feed: rejected {} = {}: {}", field.full(), leaf, e),
            }
        }
        return Ok(batch);
    }

    let Some(field) = RemotePath::from_feed_path(path) else {
        debug!("Feed: ignoring path '{}'", path);
        return Ok(batch);
    };
    if let Some(update) = decode_leaf(field, value)? {
        let _ = batch.push(update);
    }
    Ok(batch)
}

/// Decode a raw JSON body, as returned by a REST poll of the root.
pub fn decode_body(path: &str, body: &[u8]) -> Result<UpdateBatch, DecodeError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| DecodeError::Malformed)?;
    decode_event(path, &value)
}

/// Decode the value of one leaf.  `Ok(None)` for outbound-only paths and
/// for `null` (key deleted).
pub fn decode_leaf(path: RemotePath, value: &Value) -> Result<Option<FieldUpdate>, DecodeError> {
    if !path.is_inbound() || value.is_null() {
        return Ok(None);
    }
    let raw = as_integer(value)?;
    let update = match path {
        RemotePath::Status => FieldUpdate::Status(ActuatorStatus::from_wire(raw)?),
        RemotePath::RequestedStatus => {
            FieldUpdate::RequestedStatus(ActuatorStatus::from_wire(raw)?)
        }
        RemotePath::Duration => FieldUpdate::Duration(as_duration(raw)?),
        RemotePath::OpeningDuration => FieldUpdate::OpeningDuration(as_duration(raw)?),
        RemotePath::ClosingDuration => FieldUpdate::ClosingDuration(as_duration(raw)?),
        RemotePath::Progress | RemotePath::Network => return Ok(None),
    };
    Ok(Some(update))
}

/// Integers arrive as JSON numbers.  Integral floats (`10000.0`) are
/// accepted; anything fractional or non-numeric is not.
fn as_integer(value: &Value) -> Result<i64, DecodeError> {
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    if value.as_u64().is_some() {
        // Larger than i64::MAX.
        return Err(DecodeError::InvalidDuration(i64::MAX));
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        _ => Err(DecodeError::NotAnInteger),
    }
}

fn as_duration(raw: i64) -> Result<u32, DecodeError> {
    u32::try_from(raw).map_err(|_| DecodeError::InvalidDuration(raw))
}

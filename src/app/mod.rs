//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the orchestration rules for the awning
//! controller: feed ingress, state-machine stepping, output control,
//! telemetry and remote writes.  All interaction with hardware and the
//! network happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

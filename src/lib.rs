//! Awning controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(feature = "espidf")]`
//! within each adapter.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod remote;
pub mod scheduler;

pub mod adapters;
pub mod drivers;

//! Remote key-value store boundary.
//!
//! ```text
//!   feed event ──▶ feed::decode_event ──▶ Mailbox ──▶ AppService::tick
//!                                                          │
//!   RemotePort::push ◀── Outbox::flush ◀───────────────────┘
//! ```
//!
//! Everything here is transport-agnostic; the HTTP client lives in
//! [`adapters::rtdb`](crate::adapters::rtdb).

pub mod feed;
pub mod mailbox;
pub mod outbox;
pub mod paths;

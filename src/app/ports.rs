//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (motor outputs, remote store, link quality, event
//! sinks, config storage) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches a pin or a socket directly.

use crate::config::SystemConfig;
use crate::error::{ActuatorError, TransportError};
use crate::fsm::status::Drive;
use crate::remote::paths::RemotePath;

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → motor lines)
// ───────────────────────────────────────────────────────────────

/// The two digital lines that move the awning.
///
/// Implementations MUST NOT leave both lines HIGH at any point, including
/// while switching from one direction to the other.
pub trait OutputPort {
    /// Apply an output pattern.
    fn drive(&mut self, drive: Drive) -> Result<(), ActuatorError>;

    /// Force both lines LOW.  Best effort; never fails.
    fn all_off(&mut self);

    /// Pattern currently applied.
    fn current(&self) -> Drive;
}

// ───────────────────────────────────────────────────────────────
// Remote store ports (driven adapter: domain ↔ realtime database)
// ───────────────────────────────────────────────────────────────

/// Write side of the remote key-value store.
pub trait RemotePort {
    /// Write one integer value at `path`.  A failure leaves remote state
    /// unchanged; the caller retries later.
    fn push(&mut self, path: RemotePath, value: i64) -> Result<(), TransportError>;
}

/// Read side of the remote key-value store.
///
/// Adapters without a push stream poll the `/awning` root and return the
/// whole object; the domain treats it as a root-level change event.
pub trait FeedPort {
    /// Fetch the current `/awning` object if a poll is due.
    ///
    /// `Ok(None)` means "not due yet".
    fn poll_snapshot(&mut self, now_ms: u64) -> Result<Option<serde_json::Value>, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Link quality port (driven adapter: Wi-Fi → domain)
// ───────────────────────────────────────────────────────────────

pub trait LinkQualityPort {
    /// Received signal strength of the current AP in dBm, `None` when not
    /// associated.
    fn rssi_dbm(&self) -> Option<i8>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST call [`SystemConfig::validate`] before persisting
/// and reject invalid values with [`ConfigError::ValidationFailed`]
/// instead of clamping them.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::NotFound => Self::Config("not found"),
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::StorageFull => Self::Config("storage full"),
            ConfigError::IoError => Self::Config("storage I/O"),
        }
    }
}

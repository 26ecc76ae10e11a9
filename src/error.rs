//! Unified error types for the awning firmware.
//!
//! Every subsystem error converts into [`Error`], keeping the top-level
//! loop's handling uniform.  All variants are `Copy` so they can be
//! carried in events and outbox entries without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A push to, or poll of, the remote store failed.
    Transport(TransportError),
    /// A motor output could not be driven.
    Actuator(ActuatorError),
    /// A remote value could not be decoded into a domain type.
    Decode(DecodeError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Remote store push/poll failures.  Always recoverable: the caller keeps
/// its prior state and retries on the next tick or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No network link (Wi-Fi down or not yet associated).
    NotConnected,
    /// The request did not complete in time.
    Timeout,
    /// The server answered with a non-2xx status.
    Http(u16),
    /// Socket / TLS / client-level I/O failure.
    Io,
    /// The response body could not be parsed.
    BadResponse,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Timeout => write!(f, "timed out"),
            Self::Http(code) => write!(f, "HTTP status {code}"),
            Self::Io => write!(f, "I/O error"),
            Self::BadResponse => write!(f, "malformed response"),
        }
    }
}

impl core::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Setting the CLOSE output failed.
    CloseOutputFailed,
    /// Setting the OPEN output failed.
    OpenOutputFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CloseOutputFailed => write!(f, "CLOSE output write failed"),
            Self::OpenOutputFailed => write!(f, "OPEN output write failed"),
        }
    }
}

impl core::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Decode errors (remote boundary)
// ---------------------------------------------------------------------------

/// A remote value was rejected at the boundary; the mirrored field keeps
/// its prior value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Status integer outside `0..=2`.
    InvalidStatus(i64),
    /// Duration negative or wider than `u32`.
    InvalidDuration(i64),
    /// The value is not an integer.
    NotAnInteger,
    /// A root snapshot that is not a JSON object.
    NotAnObject,
    /// Feed payload was not valid JSON.
    Malformed,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStatus(v) => write!(f, "invalid status value {v}"),
            Self::InvalidDuration(v) => write!(f, "invalid duration {v}"),
            Self::NotAnInteger => write!(f, "value is not an integer"),
            Self::NotAnObject => write!(f, "snapshot is not an object"),
            Self::Malformed => write!(f, "malformed payload"),
        }
    }
}

impl core::error::Error for DecodeError {}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

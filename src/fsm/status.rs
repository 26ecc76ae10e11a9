//! Actuator status variants and their wire encoding.
//!
//! The remote store carries these as small integers; they are decoded
//! into [`ActuatorStatus`] at the boundary so the core never handles raw
//! integers.

use core::fmt;

use crate::error::DecodeError;

/// Committed (settled) or requested actuator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActuatorStatus {
    Stopped = 0,
    Closing = 1,
    Opening = 2,
}

impl ActuatorStatus {
    pub const ALL: [Self; 3] = [Self::Stopped, Self::Closing, Self::Opening];

    /// Decode the integer carried at the remote boundary.
    pub fn from_wire(raw: i64) -> Result<Self, DecodeError> {
        match raw {
            0 => Ok(Self::Stopped),
            1 => Ok(Self::Closing),
            2 => Ok(Self::Opening),
            other => Err(DecodeError::InvalidStatus(other)),
        }
    }

    /// Integer written back to the remote store.
    pub const fn to_wire(self) -> i64 {
        self as i64
    }

    /// Pin pattern that moves the awning towards this status.
    pub const fn drive(self) -> Drive {
        match self {
            Self::Stopped => Drive::Idle,
            Self::Closing => Drive::Close,
            Self::Opening => Drive::Open,
        }
    }
}

impl fmt::Display for ActuatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Closing => write!(f, "closing"),
            Self::Opening => write!(f, "opening"),
        }
    }
}

/// Output pattern for the two motor lines.  There is no variant with both
/// lines HIGH, so mutual exclusion holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Drive {
    /// Both outputs LOW (idle / braked).
    #[default]
    Idle,
    /// CLOSE = HIGH, OPEN = LOW.
    Close,
    /// CLOSE = LOW, OPEN = HIGH.
    Open,
}

impl Drive {
    /// `(close, open)` output levels, `true` = HIGH.
    pub const fn levels(self) -> (bool, bool) {
        match self {
            Self::Idle => (false, false),
            Self::Close => (true, false),
            Self::Open => (false, true),
        }
    }
}

//! Two-line awning motor driver (CLOSE / OPEN relay inputs).
//!
//! Both lines are active-HIGH.  The motor controller shorts if both are
//! HIGH at once, so every transition lowers the releasing line before
//! raising the engaging one.
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal::digital::OutputPin`.  On ESP-IDF the pins
//! are `esp_idf_svc::hal::gpio::PinDriver` outputs; on host/test they are
//! [`SimPin`]s that only track their level.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::warn;

use crate::error::ActuatorError;
use crate::fsm::status::Drive;

pub struct MotorDriver<C, O> {
    close: C,
    open: O,
    drive: Drive,
}

impl<C: OutputPin, O: OutputPin> MotorDriver<C, O> {
    /// Take ownership of both lines and drive them LOW.
    pub fn new(close: C, open: O) -> Result<Self, ActuatorError> {
        let mut m = Self {
            close,
            open,
            drive: Drive::Idle,
        };
        m.close.set_low().map_err(|_| ActuatorError::CloseOutputFailed)?;
        m.open.set_low().map_err(|_| ActuatorError::OpenOutputFailed)?;
        Ok(m)
    }

    pub fn set(&mut self, drive: Drive) -> Result<(), ActuatorError> {
        let result = self.write(drive);
        match result {
            Ok(()) => self.drive = drive,
            Err(e) => {
                warn!("Motor: {} applying {:?}", e, drive);
                self.stop();
            }
        }
        result
    }

    /// Both lines LOW.  Keeps going if one write fails.
    pub fn stop(&mut self) {
        let close = self.close.set_low();
        let open = self.open.set_low();
        if close.is_err() || open.is_err() {
            warn!("Motor: stop incomplete (close ok={}, open ok={})", close.is_ok(), open.is_ok());
        }
        self.drive = Drive::Idle;
    }

    pub fn drive(&self) -> Drive {
        self.drive
    }

    pub fn into_inner(self) -> (C, O) {
        (self.close, self.open)
    }

    fn write(&mut self, drive: Drive) -> Result<(), ActuatorError> {
        let (close, open) = drive.levels();
        // Release first so the two lines never overlap HIGH.
        if !close {
            self.close.set_low().map_err(|_| ActuatorError::CloseOutputFailed)?;
        }
        if !open {
            self.open.set_low().map_err(|_| ActuatorError::OpenOutputFailed)?;
        }
        if close {
            self.close.set_high().map_err(|_| ActuatorError::CloseOutputFailed)?;
        }
        if open {
            self.open.set_high().map_err(|_| ActuatorError::OpenOutputFailed)?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Host pin
// ───────────────────────────────────────────────────────────────

/// In-memory output pin for host builds and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimPin {
    high: bool,
}

impl SimPin {
    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

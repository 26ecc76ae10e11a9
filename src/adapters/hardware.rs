//! Hardware adapter: bridges the motor driver to the domain port.
//!
//! Owns the [`MotorDriver`] and exposes it through [`OutputPort`].  This
//! is the only module in the system that writes the motor lines.  On
//! host builds the driver runs over [`SimPin`]s.

use embedded_hal::digital::OutputPin;

use crate::app::ports::OutputPort;
use crate::drivers::motor::{MotorDriver, SimPin};
use crate::error::ActuatorError;
use crate::fsm::status::Drive;

/// Concrete adapter that puts the motor lines behind [`OutputPort`].
pub struct HardwareAdapter<C, O> {
    motor: MotorDriver<C, O>,
}

impl<C: OutputPin, O: OutputPin> HardwareAdapter<C, O> {
    pub fn new(motor: MotorDriver<C, O>) -> Self {
        Self { motor }
    }

    pub fn into_inner(self) -> MotorDriver<C, O> {
        self.motor
    }
}

/// Host-side adapter with in-memory pins.
pub type SimHardware = HardwareAdapter<SimPin, SimPin>;

impl SimHardware {
    pub fn simulated() -> Self {
        // SimPin writes are infallible.
        match MotorDriver::new(SimPin::default(), SimPin::default()) {
            Ok(motor) => Self::new(motor),
            Err(e) => unreachable!("sim pins failed: {e}"),
        }
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<C: OutputPin, O: OutputPin> OutputPort for HardwareAdapter<C, O> {
    fn drive(&mut self, drive: Drive) -> Result<(), ActuatorError> {
        self.motor.set(drive)
    }

    fn all_off(&mut self) {
        self.motor.stop();
    }

    fn current(&self) -> Drive {
        self.motor.drive()
    }
}

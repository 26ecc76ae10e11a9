//! GPIO pin assignments for the awning controller board.
//!
//! Single source of truth: the motor driver and `main` reference these
//! rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Motor relay outputs (active HIGH, never both HIGH)
// ---------------------------------------------------------------------------

/// Digital output: HIGH drives the awning towards closed.
pub const CLOSE_GPIO: i32 = 5;
/// Digital output: HIGH drives the awning towards open.
pub const OPEN_GPIO: i32 = 4;

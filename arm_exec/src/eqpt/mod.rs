//! # Equipment interfaces
//!
//! Arm control talks to the hardware through two small interfaces, one for
//! reading the arm's position and one for commanding its motor. Both can fail
//! with a communications timeout.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Simulated arm, implementing both interfaces over a simple kinematic model.
pub mod sim;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Source of the arm's position.
pub trait PositionSensor {
    /// Read the current position as a fraction of the sensor's range.
    ///
    /// Readings are not range checked, values outside [0, 1] are returned
    /// as-is.
    fn read(&mut self) -> Result<f64, CommsFault>;
}

/// Motor controller driving the arm.
pub trait ActuatorDriver {
    /// Command the motor at a normalised speed between -1 and +1.
    ///
    /// The motor keeps running at the last commanded speed until it is sent a
    /// new one.
    fn command(&mut self, speed: f64) -> Result<(), CommsFault>;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Communication failure with the arm's equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommsFault {
    #[error("Timed out reading the arm position")]
    SensorTimeout,

    #[error("Timed out sending a command to the arm motor")]
    ActuatorTimeout,
}

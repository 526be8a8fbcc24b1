//! Arm control module
//!
//! Closed loop position control of the arm's single actuator. Arm control
//! reads the arm's potentiometer and either seeks a target position, ramping
//! the motor speed up and then braking as the target approaches, or passes a
//! manual speed straight through to the motor.
//!
//! Outside of manual override the motor is never driven past the configured
//! travel limits.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod ramp;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use ramp::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Lower limit ({lower}) must be below the upper limit ({upper})")]
    InvalidLimits { lower: f64, upper: f64 },

    #[error("Parameter {0} must be finite, found {1}")]
    NonFiniteParam(&'static str, f64),

    #[error("Ramp parameter {0} must be positive, found {1}")]
    NonPositiveRampParam(&'static str, f64),

    #[error(
        "Arrival tolerance ({arrival}) must be smaller than the deceleration threshold ({decel})"
    )]
    ToleranceAboveThreshold { arrival: f64, decel: f64 },

    #[error("Recieved a seek to an invalid target: {0}")]
    InvalidTarget(f64),

    #[error("Recieved an invalid manual speed {0}, expected a value between -1 and +1")]
    InvalidManualSpeed(f64),
}

//! # Arm library.
//!
//! This library allows the arm executable, and its tests, to access the arm control modules and
//! equipment interfaces.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control module - seeks presets and drives the arm's actuator within its travel limits
pub mod arm_ctrl;

/// Global data store for the executable
pub mod data_store;

/// Equipment interfaces - the arm's position sensor and motor driver
pub mod eqpt;

/// Executable parameters
pub mod params;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Target period of one cycle.
pub const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
pub const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

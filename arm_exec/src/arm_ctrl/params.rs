//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::tc::arm_ctrl::ArmPreset;
use serde::{Deserialize, Serialize};

use super::ArmCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
///
/// All positions are fractions of the potentiometer's single turn, the same
/// unit the position sensor reports in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    // ---- LIMITS ----
    /// Highest position the arm may be driven to outside of manual override.
    pub upper_limit: f64,

    /// Lowest position the arm may be driven to outside of manual override.
    pub lower_limit: f64,

    // ---- PRESETS ----
    /// Named target positions.
    pub presets: Presets,

    // ---- RAMPING ----
    /// Tuning of the ramp up/brake profile used when seeking a target.
    #[serde(default)]
    pub ramp: RampParams,
}

/// The named preset positions of the arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Presets {
    pub home: f64,
    pub troll: f64,
    pub high: f64,
    pub mid: f64,
    pub low: f64,
}

/// Tuning of the seek profile.
///
/// These values were tuned on the real arm, there is no model behind them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampParams {
    /// Speed added to the commanded speed on each cycle while ramping up.
    pub ramp_up_increment: f64,

    /// Once the ramped speed exceeds this value it jumps to full speed.
    pub full_speed_threshold: f64,

    /// Distance to the target below which the arm starts braking.
    pub decel_threshold: f64,

    /// Distance to the target below which the arm is considered arrived.
    pub arrival_tolerance: f64,

    /// While braking the commanded speed is the distance to the target divided
    /// by this value.
    pub braking_divisor: f64,

    /// Lowest speed commanded while braking, keeps the motor from stalling
    /// before it arrives.
    pub min_braking_speed: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RampParams {
    fn default() -> Self {
        Self {
            ramp_up_increment: 0.05,
            full_speed_threshold: 0.95,
            decel_threshold: 0.08,
            arrival_tolerance: 0.005,
            braking_divisor: 0.08,
            min_braking_speed: 0.5,
        }
    }
}

impl Presets {
    /// Get the position of the given preset.
    pub fn get(&self, preset: ArmPreset) -> f64 {
        match preset {
            ArmPreset::Home => self.home,
            ArmPreset::Troll => self.troll,
            ArmPreset::High => self.high,
            ArmPreset::Mid => self.mid,
            ArmPreset::Low => self.low,
        }
    }
}

impl Params {
    /// Check that the parameters describe a usable controller.
    pub fn validate(&self) -> Result<(), ArmCtrlError> {
        check_finite("upper_limit", self.upper_limit)?;
        check_finite("lower_limit", self.lower_limit)?;

        if self.lower_limit >= self.upper_limit {
            return Err(ArmCtrlError::InvalidLimits {
                lower: self.lower_limit,
                upper: self.upper_limit,
            });
        }

        for preset in ArmPreset::ALL.iter() {
            check_finite(preset.name(), self.presets.get(*preset))?;
        }

        let r = &self.ramp;
        for (name, val) in [
            ("ramp_up_increment", r.ramp_up_increment),
            ("full_speed_threshold", r.full_speed_threshold),
            ("decel_threshold", r.decel_threshold),
            ("arrival_tolerance", r.arrival_tolerance),
            ("braking_divisor", r.braking_divisor),
            ("min_braking_speed", r.min_braking_speed),
        ]
        .iter()
        {
            check_finite(*name, *val)?;
            if *val <= 0.0 {
                return Err(ArmCtrlError::NonPositiveRampParam(*name, *val));
            }
        }

        if r.arrival_tolerance >= r.decel_threshold {
            return Err(ArmCtrlError::ToleranceAboveThreshold {
                arrival: r.arrival_tolerance,
                decel: r.decel_threshold,
            });
        }

        Ok(())
    }

    /// Returns true if `pos` lies strictly between the travel limits.
    pub fn within_limits(&self, pos: f64) -> bool {
        pos > self.lower_limit && pos < self.upper_limit
    }

    /// Apply the travel limits to a motor command.
    ///
    /// `speed` is in the motor's convention, where a negative speed raises the
    /// arm. A zero speed, or any speed while the arm is past either limit,
    /// results in zero. Sitting exactly on a limit only blocks motion further
    /// into it. Any other speed is returned unmodified.
    pub fn clamp_to_limits(&self, pos: f64, speed: f64) -> f64 {
        if speed == 0.0 || pos > self.upper_limit || pos < self.lower_limit {
            0.0
        } else if (pos > self.lower_limit && speed > 0.0) || (pos < self.upper_limit && speed < 0.0)
        {
            speed
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_finite(name: &'static str, val: f64) -> Result<(), ArmCtrlError> {
    if val.is_finite() {
        Ok(())
    } else {
        Err(ArmCtrlError::NonFiniteParam(name, val))
    }
}

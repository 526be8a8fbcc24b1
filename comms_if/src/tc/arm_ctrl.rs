//! # Arm control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use structopt::{clap::AppSettings, StructOpt};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be completed by arm control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
pub enum ArmCmd {
    /// Move the arm to one of the named preset positions.
    ///
    /// The arm ramps up to full speed, then brakes as it approaches the preset.
    #[structopt(name = "preset")]
    Preset {
        /// Name of the preset (home, troll, high, mid or low).
        preset: ArmPreset,
    },

    /// Move the arm to an arbitrary position using the same ramping as a preset.
    #[structopt(name = "seek", setting = AppSettings::AllowNegativeNumbers)]
    Seek {
        /// Target position as a fraction of the potentiometer's single turn.
        target: f64,
    },

    /// Manual override, drive the motor at the given speed ignoring the travel limits.
    #[structopt(name = "manual", setting = AppSettings::AllowNegativeNumbers)]
    Manual {
        /// Normalised speed between -1 and +1.
        speed: f64,
    },

    /// Abandon any preset in progress and hold the arm still.
    #[structopt(name = "stop")]
    Stop,
}

/// The named preset positions of the arm.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmPreset {
    Home,
    Troll,
    High,
    Mid,
    Low,
}

/// Error returned when a preset name is not recognised.
#[derive(Debug, Error)]
#[error("Unknown arm preset \"{0}\", expected one of home, troll, high, mid or low")]
pub struct ParsePresetError(String);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ArmPreset {
    /// All presets, in the order they're listed in parameter files.
    pub const ALL: [ArmPreset; 5] = [
        ArmPreset::Home,
        ArmPreset::Troll,
        ArmPreset::High,
        ArmPreset::Mid,
        ArmPreset::Low,
    ];

    /// The lowercase name of the preset.
    pub fn name(&self) -> &'static str {
        match self {
            ArmPreset::Home => "home",
            ArmPreset::Troll => "troll",
            ArmPreset::High => "high",
            ArmPreset::Mid => "mid",
            ArmPreset::Low => "low",
        }
    }
}

impl FromStr for ArmPreset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArmPreset::ALL
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParsePresetError(s.to_string()))
    }
}

impl fmt::Display for ArmPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Simulated arm
//!
//! A single turn potentiometer on an arm driven by a motor with no inertia. The
//! arm moves at a rate proportional to the last motor command, a negative
//! command raising the arm, and stops dead against its mechanical end stops.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::RefCell, rc::Rc};

use log::trace;
use serde::{Deserialize, Serialize};

use super::{ActuatorDriver, CommsFault, PositionSensor};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the simulated arm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    /// Position of the arm at the start of the simulation.
    pub initial_pos: f64,

    /// Rate the arm moves at under a full speed command.
    ///
    /// Units: fraction of travel/second
    pub full_speed_rate_s: f64,

    /// Position of the lower mechanical end stop.
    #[serde(default)]
    pub min_pos: f64,

    /// Position of the upper mechanical end stop.
    #[serde(default = "default_max_pos")]
    pub max_pos: f64,

    /// If set every Nth position read times out.
    #[serde(default)]
    pub fault_every_n_reads: Option<u32>,
}

/// The simulated arm.
///
/// The sensor and motor handles share the arm, the simulation is advanced by
/// calling [`SimArm::step`] once per cycle.
pub struct SimArm {
    model: Rc<RefCell<Model>>,
}

/// Potentiometer of the simulated arm.
pub struct SimPot {
    model: Rc<RefCell<Model>>,
}

/// Motor controller of the simulated arm.
pub struct SimMotor {
    model: Rc<RefCell<Model>>,
}

struct Model {
    params: SimParams,
    pos: f64,
    speed: f64,
    num_reads: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimArm {
    /// Create a new simulated arm at its initial position.
    pub fn new(params: SimParams) -> Self {
        let pos = params.initial_pos.max(params.min_pos).min(params.max_pos);

        Self {
            model: Rc::new(RefCell::new(Model {
                params,
                pos,
                speed: 0.0,
                num_reads: 0,
            })),
        }
    }

    /// Get a handle to the arm's potentiometer.
    pub fn pot(&self) -> SimPot {
        SimPot {
            model: self.model.clone(),
        }
    }

    /// Get a handle to the arm's motor.
    pub fn motor(&self) -> SimMotor {
        SimMotor {
            model: self.model.clone(),
        }
    }

    /// True position of the arm.
    pub fn pos(&self) -> f64 {
        self.model.borrow().pos
    }

    /// Speed the motor is currently running at.
    pub fn speed(&self) -> f64 {
        self.model.borrow().speed
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&self, dt_s: f64) {
        let mut m = self.model.borrow_mut();

        let new_pos = m.pos - m.speed * m.params.full_speed_rate_s * dt_s;
        m.pos = new_pos.max(m.params.min_pos).min(m.params.max_pos);

        trace!("SimArm at {:.4} (speed {:.3})", m.pos, m.speed);
    }
}

impl PositionSensor for SimPot {
    fn read(&mut self) -> Result<f64, CommsFault> {
        let mut m = self.model.borrow_mut();
        m.num_reads += 1;

        if let Some(n) = m.params.fault_every_n_reads {
            if n > 0 && m.num_reads % n as u64 == 0 {
                return Err(CommsFault::SensorTimeout);
            }
        }

        Ok(m.pos)
    }
}

impl ActuatorDriver for SimMotor {
    fn command(&mut self, speed: f64) -> Result<(), CommsFault> {
        // The real controller saturates out of range demands
        self.model.borrow_mut().speed = if speed.is_nan() {
            0.0
        } else {
            speed.max(-1.0).min(1.0)
        };

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn default_max_pos() -> f64 {
    1.0
}

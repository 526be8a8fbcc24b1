//! Speed ramping used while seeking a target position

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::{Deserialize, Serialize};

// Internal
use super::RampParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Speed profile of a seek.
///
/// A seek starts from `Idle`, ramps the speed up towards full speed, and once
/// the arm is inside the deceleration threshold brakes proportionally to the
/// remaining distance. Arrival returns the ramp to `Idle`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Ramp {
    state: RampState,

    /// Commanded speed magnitude, between 0 and 1.
    speed: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Phase of the seek speed profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RampState {
    /// No seek in progress, the next step starts ramping up.
    Idle,

    /// Accelerating, or holding at full speed.
    RampingUp,

    /// Braking towards the target.
    RampingDown,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RampState {
    fn default() -> Self {
        RampState::Idle
    }
}

impl Ramp {
    /// Current phase of the ramp.
    pub fn state(&self) -> RampState {
        self.state
    }

    /// Current commanded speed magnitude.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Return to `Idle` with no speed.
    pub fn reset(&mut self) {
        self.state = RampState::Idle;
        self.speed = 0.0;
    }

    /// Advance the ramp by one cycle given the current distance to the target.
    ///
    /// Returns the new speed magnitude. The ramp is back in `Idle` (and the
    /// speed zero) if the target was reached on this step.
    pub fn step(&mut self, dist: f64, params: &RampParams) -> f64 {
        self.state = match self.state {
            RampState::Idle | RampState::RampingUp => {
                self.speed += params.ramp_up_increment;
                if self.speed > params.full_speed_threshold {
                    self.speed = 1.0;
                }
                RampState::RampingUp
            }
            RampState::RampingDown => {
                self.speed = (dist / params.braking_divisor)
                    .max(params.min_braking_speed)
                    .min(1.0);
                RampState::RampingDown
            }
        };

        if dist < params.arrival_tolerance {
            debug!("Arrived, {:.4} from target", dist);
            self.reset();
        } else if dist < params.decel_threshold && self.state != RampState::RampingDown {
            debug!("Braking, {:.4} from target", dist);
            self.state = RampState::RampingDown;
        }

        self.speed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_ramp_up_saturates() {
        let params = RampParams::default();
        let mut ramp = Ramp::default();
        assert_eq!(ramp.state(), RampState::Idle);

        let mut prev = 0.0;
        let mut saturated_after = None;

        for i in 1..=40 {
            let speed = ramp.step(0.5, &params);
            assert_eq!(ramp.state(), RampState::RampingUp);
            assert!(speed <= 1.0);
            assert!(speed >= prev);

            if speed < 1.0 {
                assert!((speed - 0.05 * i as f64).abs() < EPS);
            } else if saturated_after.is_none() {
                saturated_after = Some(i);
            }
            prev = speed;
        }

        // 0.05 steps pass 0.95 on the 19th or 20th step depending on rounding
        let n = saturated_after.unwrap();
        assert!(n == 19 || n == 20, "Saturated after {} steps", n);
        assert_eq!(ramp.speed(), 1.0);
    }

    #[test]
    fn test_brake_inside_threshold() {
        let params = RampParams::default();
        let mut ramp = Ramp::default();

        // The first step inside the threshold still ramps, but switches state
        let speed = ramp.step(0.07, &params);
        assert!((speed - 0.05).abs() < EPS);
        assert_eq!(ramp.state(), RampState::RampingDown);

        // Then the braking law applies, floored at the minimum braking speed
        for dist in [0.07, 0.06, 0.05, 0.04, 0.03, 0.02, 0.01, 0.006].iter() {
            let speed = ramp.step(*dist, &params);
            assert_eq!(ramp.state(), RampState::RampingDown);
            assert!((speed - (dist / 0.08).max(0.5)).abs() < EPS);
        }
    }

    #[test]
    fn test_brake_never_exceeds_full_speed() {
        let params = RampParams::default();
        let mut ramp = Ramp::default();
        ramp.step(0.07, &params);

        // Pushed back out of the threshold while braking
        let speed = ramp.step(0.2, &params);
        assert_eq!(ramp.state(), RampState::RampingDown);
        assert_eq!(speed, 1.0);
    }

    #[test]
    fn test_arrival_resets() {
        let params = RampParams::default();
        let mut ramp = Ramp::default();

        for _ in 0..10 {
            ramp.step(0.3, &params);
        }
        ramp.step(0.05, &params);
        ramp.step(0.02, &params);

        assert_eq!(ramp.step(0.004, &params), 0.0);
        assert_eq!(ramp.state(), RampState::Idle);

        // A step at zero distance from idle never moves
        assert_eq!(ramp.step(0.0, &params), 0.0);
        assert_eq!(ramp.state(), RampState::Idle);

        // The next seek ramps up from scratch
        assert!((ramp.step(0.3, &params) - 0.05).abs() < EPS);
    }

    #[test]
    fn test_reset() {
        let params = RampParams::default();
        let mut ramp = Ramp::default();
        ramp.step(0.07, &params);
        ramp.step(0.07, &params);
        assert_eq!(ramp.state(), RampState::RampingDown);

        ramp.reset();
        assert_eq!(ramp, Ramp::default());
    }
}

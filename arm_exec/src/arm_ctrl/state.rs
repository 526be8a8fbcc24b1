//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

// Internal
use super::{ArmCtrlError, Params, Ramp, RampState};
use crate::eqpt::{ActuatorDriver, CommsFault, PositionSensor};
use comms_if::tc::arm_ctrl::{ArmCmd, ArmPreset};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
///
/// Owns the arm's position sensor and motor driver, and is the only thing
/// which commands the motor.
pub struct ArmCtrl<S, D> {
    params: Params,

    sensor: S,

    driver: D,

    ramp: Ramp,

    running_preset: bool,

    current_cmd: Option<ActiveCmd>,

    report: StatusReport,
    arch_report: Archiver,

    output: OutputData,
    arch_output: Archiver,
}

/// Input data to Arm Control.
#[derive(Debug, Default, Clone)]
pub struct InputData {
    /// The command to be executed, or `None` if there is no new command on
    /// this cycle.
    pub cmd: Option<ArmCmd>,
}

/// Output of one cycle of arm control.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputData {
    /// The speed sent to the motor this cycle, or `None` if nothing was sent.
    pub motor_cmd: Option<f64>,
}

/// Status report for ArmCtrl processing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Phase of the seek ramp.
    pub ramp_state: RampState,

    /// Magnitude of the ramped seek speed.
    pub commanded_speed: f64,

    /// True while a seek is in progress.
    pub running_preset: bool,

    /// Position read this cycle, if it could be read.
    pub position: Option<f64>,

    /// A read or command timed out this cycle.
    pub comms_fault: bool,

    /// The motor was stopped by the travel limits this cycle.
    pub limit_stopped: bool,
}

/// Result of one cycle of a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekStatus {
    /// Still moving towards the target.
    Seeking,

    /// Within the arrival tolerance of the target, the ramp is idle.
    Arrived,

    /// The position couldn't be read, nothing was done this cycle.
    Faulted,
}

/// The command arm control is currently carrying out.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ActiveCmd {
    Seek {
        target: f64,
        preset: Option<ArmPreset>,
    },
    Manual {
        speed: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<S, D> State for ArmCtrl<S, D>
where
    S: PositionSensor,
    D: ActuatorDriver,
{
    type InitData = &'static str;
    type InitError = ArchiveError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// Expected init data is the directory, relative to the session's archive
    /// root, to write the archives into.
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        self.arch_report =
            Archiver::from_path(session, format!("{}/status_report.csv", init_data))?;
        self.arch_output = Archiver::from_path(session, format!("{}/output.csv", init_data))?;

        Ok(())
    }

    /// Perform cyclic processing of Arm Control.
    ///
    /// A new command replaces the current one. Seeks run until the target is
    /// reached, manual speeds until they are replaced. With no command the arm
    /// is held still.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report and output
        self.report = StatusReport::default();
        self.output = OutputData::default();

        // Check to see if there's a new command
        if let Some(cmd) = &input_data.cmd {
            debug!("New ArmCtrl ArmCmd::{:?}", cmd);
            self.accept_cmd(cmd)?;
        }

        match self.current_cmd {
            Some(ActiveCmd::Seek { target, preset }) => {
                if self.seek_preset(target) == SeekStatus::Arrived {
                    match preset {
                        Some(p) => info!("Arm arrived at preset {} ({:.3})", p, target),
                        None => info!("Arm arrived at {:.3}", target),
                    }
                    self.current_cmd = None;
                }
            }
            Some(ActiveCmd::Manual { speed }) => {
                self.manual_move(speed);
            }
            None => {
                self.drive(0.0);
            }
        }

        self.fill_report();

        Ok((self.output, self.report))
    }
}

impl<S, D> Archived for ArmCtrl<S, D> {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)?;
        self.arch_output.serialise(self.output)?;

        Ok(())
    }
}

impl<S, D> ArmCtrl<S, D>
where
    S: PositionSensor,
    D: ActuatorDriver,
{
    /// Create a new arm controller, in the idle state, from the given
    /// parameters and equipment.
    pub fn new(params: Params, sensor: S, driver: D) -> Result<Self, ArmCtrlError> {
        params.validate()?;

        for preset in ArmPreset::ALL.iter() {
            let pos = params.presets.get(*preset);
            if !params.within_limits(pos) {
                warn!(
                    "Preset {} ({}) is outside the travel limits ({} to {}) and cannot be reached",
                    preset, pos, params.lower_limit, params.upper_limit
                );
            }
        }

        Ok(Self {
            params,
            sensor,
            driver,
            ramp: Ramp::default(),
            running_preset: false,
            current_cmd: None,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            output: OutputData::default(),
            arch_output: Archiver::default(),
        })
    }

    /// Read the current position of the arm.
    pub fn get_pos(&mut self) -> Result<f64, CommsFault> {
        self.sensor.read()
    }

    /// Perform one cycle of a seek towards `target`.
    ///
    /// Must be called once per cycle until it returns `Arrived`. The first call
    /// after construction, arrival or [`ArmCtrl::stop`] starts a new ramp.
    ///
    /// If the position can't be read nothing is changed and nothing is sent to
    /// the motor, the next call retries.
    pub fn seek_preset(&mut self, target: f64) -> SeekStatus {
        let pos = match self.sensor.read() {
            Ok(p) => p,
            Err(e) => {
                self.on_fault(e);
                return SeekStatus::Faulted;
            }
        };
        self.report.position = Some(pos);

        let dist = (pos - target).abs();
        let going_down = pos - target > 0.0;

        self.running_preset = true;

        let speed = self.ramp.step(dist, &self.params.ramp);

        let status = match self.ramp.state() {
            RampState::Idle => {
                self.running_preset = false;
                SeekStatus::Arrived
            }
            _ => SeekStatus::Seeking,
        };

        trace!(
            "Seeking {:.3} from {:.3}: {:?} at {:.3}",
            target,
            pos,
            self.ramp.state(),
            speed
        );

        let speed = if going_down { -speed } else { speed };
        self.drive_at(pos, speed);

        status
    }

    /// Drive the arm at `speed`, respecting the travel limits.
    ///
    /// Positive speeds raise the arm. The motor is stopped if `speed` is zero
    /// or the arm is at or beyond either limit.
    ///
    /// Returns the speed sent to the motor, or `None` if the position couldn't
    /// be read or the motor couldn't be commanded.
    pub fn drive(&mut self, speed: f64) -> Option<f64> {
        match self.sensor.read() {
            Ok(pos) => {
                self.report.position = Some(pos);
                self.drive_at(pos, speed)
            }
            Err(e) => {
                self.on_fault(e);
                None
            }
        }
    }

    /// Manual override, drive the arm at `speed` ignoring the travel limits.
    ///
    /// Does not affect any seek in progress. Returns the speed sent to the
    /// motor, or `None` if it couldn't be commanded.
    pub fn manual_move(&mut self, speed: f64) -> Option<f64> {
        self.send(-speed)
    }

    /// Function called when entering safe mode.
    ///
    /// Must result in no motion of the arm.
    pub fn make_safe(&mut self) -> StatusReport {
        self.report = StatusReport::default();
        self.output = OutputData::default();

        if self.current_cmd.take().is_some() {
            info!("ArmCtrl made safe, current command dropped");
        }
        self.stop();
        self.drive(0.0);

        self.fill_report();
        self.report
    }

    /// Position of the given preset.
    pub fn preset_pos(&self, preset: ArmPreset) -> f64 {
        self.params.presets.get(preset)
    }
}

impl<S, D> ArmCtrl<S, D> {
    /// Abandon any seek in progress.
    ///
    /// The ramp returns to idle and the next seek starts from scratch. Nothing
    /// is sent to the motor, the next `drive(0.0)` stops it.
    pub fn stop(&mut self) {
        if self.ramp.state() != RampState::Idle || self.running_preset {
            debug!("Stopping seek in {:?}", self.ramp.state());
        }

        self.ramp.reset();
        self.running_preset = false;
    }

    /// The parameters this controller was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// True while a seek is in progress.
    pub fn is_running_preset(&self) -> bool {
        self.running_preset
    }

    /// True while there is a command being carried out, i.e. a seek that
    /// hasn't arrived or a manual override.
    pub fn is_busy(&self) -> bool {
        self.current_cmd.is_some()
    }

    /// Current phase of the seek ramp.
    pub fn ramp_state(&self) -> RampState {
        self.ramp.state()
    }

    /// Current magnitude of the seek speed.
    pub fn commanded_speed(&self) -> f64 {
        self.ramp.speed()
    }

    /// The most recent status report.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// The position sensor.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Mutable access to the position sensor.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// The motor driver, for diagnostics.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the motor driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn fill_report(&mut self) {
        self.report.ramp_state = self.ramp.state();
        self.report.commanded_speed = self.ramp.speed();
        self.report.running_preset = self.running_preset;
    }
}

impl<S, D> ArmCtrl<S, D>
where
    D: ActuatorDriver,
{
    /// Validate a new command and make it the current one.
    fn accept_cmd(&mut self, cmd: &ArmCmd) -> Result<(), ArmCtrlError> {
        let new_cmd = match *cmd {
            ArmCmd::Preset { preset } => Some(ActiveCmd::Seek {
                target: self.params.presets.get(preset),
                preset: Some(preset),
            }),
            ArmCmd::Seek { target } => {
                if !target.is_finite() {
                    return Err(ArmCtrlError::InvalidTarget(target));
                }
                Some(ActiveCmd::Seek {
                    target,
                    preset: None,
                })
            }
            ArmCmd::Manual { speed } => {
                if !(-1.0..=1.0).contains(&speed) {
                    return Err(ArmCtrlError::InvalidManualSpeed(speed));
                }
                Some(ActiveCmd::Manual { speed })
            }
            ArmCmd::Stop => None,
        };

        // Whatever was running before is abandoned
        self.stop();
        self.current_cmd = new_cmd;

        Ok(())
    }

    /// Apply the travel limits to `speed` at position `pos` and send it.
    ///
    /// The motor is wired so that a negative command raises the arm, the sign
    /// is flipped here.
    fn drive_at(&mut self, pos: f64, speed: f64) -> Option<f64> {
        let motor_speed = -speed;
        let limited = self.params.clamp_to_limits(pos, motor_speed);

        if limited != motor_speed {
            self.report.limit_stopped = true;
            debug!(
                "Arm at {:.3} is outside the limits ({} to {}), stopping",
                pos, self.params.lower_limit, self.params.upper_limit
            );
        }

        self.send(limited)
    }

    fn send(&mut self, motor_speed: f64) -> Option<f64> {
        match self.driver.command(motor_speed) {
            Ok(()) => {
                self.output.motor_cmd = Some(motor_speed);
                Some(motor_speed)
            }
            Err(e) => {
                self.on_fault(e);
                None
            }
        }
    }

    fn on_fault(&mut self, fault: CommsFault) {
        warn!("ArmCtrl communications fault: {}", fault);
        self.report.comms_fault = true;
    }
}

#[cfg(test)]
mod test {
    use super::super::params::test::test_params;
    use super::*;

    const EPS: f64 = 1e-9;

    /// Potentiometer stand-in, reports whatever position it's given.
    struct FakePot {
        pos: f64,
        fail: bool,
        num_reads: usize,
    }

    /// Motor stand-in, records every command.
    #[derive(Default)]
    struct FakeMotor {
        cmds: Vec<f64>,
        fail: bool,
    }

    impl PositionSensor for FakePot {
        fn read(&mut self) -> Result<f64, CommsFault> {
            self.num_reads += 1;
            if self.fail {
                Err(CommsFault::SensorTimeout)
            } else {
                Ok(self.pos)
            }
        }
    }

    impl ActuatorDriver for FakeMotor {
        fn command(&mut self, speed: f64) -> Result<(), CommsFault> {
            if self.fail {
                return Err(CommsFault::ActuatorTimeout);
            }
            self.cmds.push(speed);
            Ok(())
        }
    }

    fn arm_at(pos: f64) -> ArmCtrl<FakePot, FakeMotor> {
        ArmCtrl::new(
            test_params(),
            FakePot {
                pos,
                fail: false,
                num_reads: 0,
            },
            FakeMotor::default(),
        )
        .unwrap()
    }

    fn last_cmd(arm: &ArmCtrl<FakePot, FakeMotor>) -> Option<f64> {
        arm.driver().cmds.last().copied()
    }

    #[test]
    fn test_new_rejects_bad_limits() {
        let mut params = test_params();
        params.upper_limit = 0.1;

        let res = ArmCtrl::new(
            params,
            FakePot {
                pos: 0.5,
                fail: false,
                num_reads: 0,
            },
            FakeMotor::default(),
        );
        assert!(matches!(res, Err(ArmCtrlError::InvalidLimits { .. })));
    }

    #[test]
    fn test_drive_within_limits() {
        for pos in [0.11, 0.3, 0.5, 0.89].iter() {
            let mut arm = arm_at(*pos);
            for speed in [-1.0, -0.2, 0.05, 0.7].iter() {
                assert_eq!(arm.drive(*speed), Some(-speed));
                assert_eq!(last_cmd(&arm), Some(-speed));
            }
        }
    }

    #[test]
    fn test_drive_at_limits() {
        // Raising the arm at or past the upper limit is stopped
        for pos in [0.9, 0.95].iter() {
            let mut arm = arm_at(*pos);
            assert_eq!(arm.drive(0.5), Some(0.0));
            assert!(arm.report().limit_stopped);
        }

        // Lowering the arm at or past the lower limit is stopped
        for pos in [0.1, 0.0].iter() {
            let mut arm = arm_at(*pos);
            assert_eq!(arm.drive(-0.5), Some(0.0));
            assert!(arm.report().limit_stopped);
        }

        // Zero is always sent as zero
        for pos in [-0.5, 0.1, 0.5, 0.9, 1.5].iter() {
            let mut arm = arm_at(*pos);
            assert_eq!(arm.drive(0.0), Some(0.0));
        }
    }

    #[test]
    fn test_drive_away_from_limits() {
        // Sitting exactly on a limit the arm can still leave it
        let mut arm = arm_at(0.9);
        assert_eq!(arm.drive(-0.5), Some(0.5));
        assert!(!arm.report().limit_stopped);

        let mut arm = arm_at(0.1);
        assert_eq!(arm.drive(0.5), Some(-0.5));
        assert!(!arm.report().limit_stopped);

        // A seek starting on the upper limit moves off it and arrives
        let mut arm = arm_at(0.9);
        for _ in 0..5 {
            assert_eq!(arm.seek_preset(0.6), SeekStatus::Seeking);
            assert!(last_cmd(&arm).unwrap() > 0.0);
        }
        arm.sensor_mut().pos = 0.6;
        assert_eq!(arm.seek_preset(0.6), SeekStatus::Arrived);
    }

    #[test]
    fn test_manual_move_ignores_limits() {
        let mut arm = arm_at(0.95);
        assert_eq!(arm.manual_move(0.4), Some(-0.4));
        assert_eq!(arm.manual_move(-0.3), Some(0.3));
        assert_eq!(arm.driver().cmds, vec![-0.4, 0.3]);

        // No position read is needed, and the ramp is untouched
        assert_eq!(arm.sensor().num_reads, 0);
        assert_eq!(arm.ramp_state(), RampState::Idle);
        assert!(!arm.is_running_preset());
    }

    #[test]
    fn test_seek_first_tick_down() {
        let mut arm = arm_at(0.5);

        assert_eq!(arm.seek_preset(0.1), SeekStatus::Seeking);
        assert_eq!(arm.ramp_state(), RampState::RampingUp);
        assert!((arm.commanded_speed() - 0.05).abs() < EPS);
        assert!(arm.is_running_preset());

        // Going down is a positive motor command
        assert!((last_cmd(&arm).unwrap() - 0.05).abs() < EPS);
    }

    #[test]
    fn test_seek_ramps_then_brakes() {
        let mut arm = arm_at(0.2);
        let target = 0.8;

        // Far from the target the speed ramps up and holds at full speed
        let mut prev = 0.0;
        for _ in 0..30 {
            arm.seek_preset(target);
            assert_eq!(arm.ramp_state(), RampState::RampingUp);
            assert!(arm.commanded_speed() >= prev);
            assert!(arm.commanded_speed() <= 1.0);
            prev = arm.commanded_speed();

            // Going up is a negative motor command
            assert_eq!(last_cmd(&arm), Some(-arm.commanded_speed()));
        }
        assert_eq!(arm.commanded_speed(), 1.0);

        // Inside the deceleration threshold the arm brakes
        arm.sensor_mut().pos = 0.75;
        arm.seek_preset(target);
        assert_eq!(arm.ramp_state(), RampState::RampingDown);

        for pos in [0.76, 0.77, 0.78, 0.79, 0.794].iter() {
            arm.sensor_mut().pos = *pos;
            assert_eq!(arm.seek_preset(target), SeekStatus::Seeking);
            assert_eq!(arm.ramp_state(), RampState::RampingDown);

            let expected = ((target - pos).abs() / 0.08).max(0.5);
            assert!((arm.commanded_speed() - expected).abs() < EPS);
        }

        // Then arrives
        arm.sensor_mut().pos = 0.797;
        assert_eq!(arm.seek_preset(target), SeekStatus::Arrived);
        assert_eq!(arm.ramp_state(), RampState::Idle);
        assert_eq!(arm.commanded_speed(), 0.0);
        assert!(!arm.is_running_preset());
        assert_eq!(last_cmd(&arm), Some(0.0));
    }

    #[test]
    fn test_seek_already_there() {
        let mut arm = arm_at(0.6);

        assert_eq!(arm.seek_preset(0.6), SeekStatus::Arrived);
        assert_eq!(arm.ramp_state(), RampState::Idle);
        assert_eq!(arm.commanded_speed(), 0.0);
        assert!(!arm.is_running_preset());
        assert_eq!(arm.driver().cmds, vec![0.0]);
    }

    #[test]
    fn test_seek_up_to_upper_limit() {
        let mut arm = arm_at(0.85);

        // Below the limit the commands pass straight through
        arm.seek_preset(0.9);
        assert!(last_cmd(&arm).unwrap() < 0.0);
        assert!(!arm.report().limit_stopped);

        // At the limit any further raise is stopped
        arm.sensor_mut().pos = 0.9;
        arm.seek_preset(0.95);
        assert_eq!(last_cmd(&arm), Some(0.0));
        assert!(arm.report().limit_stopped);
    }

    #[test]
    fn test_seek_sensor_fault() {
        let mut arm = arm_at(0.5);
        arm.seek_preset(0.2);
        arm.seek_preset(0.2);
        let speed = arm.commanded_speed();
        let num_cmds = arm.driver().cmds.len();

        // Nothing is sent and nothing changes
        arm.sensor_mut().fail = true;
        assert_eq!(arm.seek_preset(0.2), SeekStatus::Faulted);
        assert_eq!(arm.driver().cmds.len(), num_cmds);
        assert_eq!(arm.commanded_speed(), speed);
        assert_eq!(arm.ramp_state(), RampState::RampingUp);
        assert!(arm.report().comms_fault);

        // The next cycle picks up where it left off
        arm.sensor_mut().fail = false;
        assert_eq!(arm.seek_preset(0.2), SeekStatus::Seeking);
        assert!((arm.commanded_speed() - speed - 0.05).abs() < EPS);
        assert_eq!(arm.driver().cmds.len(), num_cmds + 1);
    }

    #[test]
    fn test_driver_fault() {
        let mut arm = arm_at(0.5);
        arm.driver_mut().fail = true;

        assert_eq!(arm.drive(0.3), None);
        assert_eq!(arm.manual_move(0.3), None);
        assert!(arm.report().comms_fault);
        assert!(arm.driver().cmds.is_empty());
    }

    #[test]
    fn test_stop() {
        let mut arm = arm_at(0.5);
        for _ in 0..5 {
            arm.seek_preset(0.1);
        }
        arm.sensor_mut().pos = 0.15;
        arm.seek_preset(0.1);
        assert_eq!(arm.ramp_state(), RampState::RampingDown);

        let num_cmds = arm.driver().cmds.len();
        arm.stop();
        assert_eq!(arm.ramp_state(), RampState::Idle);
        assert_eq!(arm.commanded_speed(), 0.0);
        assert!(!arm.is_running_preset());

        // Stopping doesn't command the motor itself
        assert_eq!(arm.driver().cmds.len(), num_cmds);

        // A new seek ramps up from the start
        arm.sensor_mut().pos = 0.5;
        arm.seek_preset(0.1);
        assert_eq!(arm.ramp_state(), RampState::RampingUp);
        assert!((arm.commanded_speed() - 0.05).abs() < EPS);
    }

    #[test]
    fn test_proc_commands() {
        let mut arm = arm_at(0.5);

        // Idle holds the arm still
        let (output, report) = arm.proc(&InputData::default()).unwrap();
        assert_eq!(output.motor_cmd, Some(0.0));
        assert_eq!(report.position, Some(0.5));
        assert!(!arm.is_busy());

        // A preset seeks until it is replaced
        let high = arm.preset_pos(ArmPreset::High);
        let (output, report) = arm
            .proc(&InputData {
                cmd: Some(ArmCmd::Preset {
                    preset: ArmPreset::High,
                }),
            })
            .unwrap();
        assert!(high > 0.5);
        assert!(output.motor_cmd.unwrap() < 0.0);
        assert!(report.running_preset);
        assert_eq!(report.ramp_state, RampState::RampingUp);
        assert!(arm.is_busy());

        arm.proc(&InputData::default()).unwrap();
        assert!((arm.commanded_speed() - 0.1).abs() < EPS);

        // Manual replaces the seek
        let (output, report) = arm
            .proc(&InputData {
                cmd: Some(ArmCmd::Manual { speed: 0.25 }),
            })
            .unwrap();
        assert_eq!(output.motor_cmd, Some(-0.25));
        assert!(!report.running_preset);
        assert_eq!(report.ramp_state, RampState::Idle);

        // Stop goes back to holding
        let (output, _) = arm
            .proc(&InputData {
                cmd: Some(ArmCmd::Stop),
            })
            .unwrap();
        assert_eq!(output.motor_cmd, Some(0.0));
        assert!(!arm.is_busy());
    }

    #[test]
    fn test_proc_rejects_bad_commands() {
        let mut arm = arm_at(0.5);
        arm.proc(&InputData {
            cmd: Some(ArmCmd::Seek { target: 0.3 }),
        })
        .unwrap();

        let res = arm.proc(&InputData {
            cmd: Some(ArmCmd::Manual { speed: 1.5 }),
        });
        assert!(matches!(res, Err(ArmCtrlError::InvalidManualSpeed(_))));

        let res = arm.proc(&InputData {
            cmd: Some(ArmCmd::Seek {
                target: std::f64::NAN,
            }),
        });
        assert!(matches!(res, Err(ArmCtrlError::InvalidTarget(_))));

        // The seek carries on regardless
        arm.proc(&InputData::default()).unwrap();
        assert!(arm.is_busy());
        assert!(arm.is_running_preset());
    }

    #[test]
    fn test_proc_arrival_clears_command() {
        let mut arm = arm_at(0.5);
        arm.proc(&InputData {
            cmd: Some(ArmCmd::Seek { target: 0.502 }),
        })
        .unwrap();

        assert!(!arm.is_busy());
        assert_eq!(arm.report().ramp_state, RampState::Idle);
    }

    #[test]
    fn test_make_safe() {
        let mut arm = arm_at(0.5);
        arm.proc(&InputData {
            cmd: Some(ArmCmd::Preset {
                preset: ArmPreset::Low,
            }),
        })
        .unwrap();
        assert!(arm.is_busy());

        let report = arm.make_safe();
        assert!(!arm.is_busy());
        assert!(!report.running_preset);
        assert_eq!(report.ramp_state, RampState::Idle);
        assert_eq!(last_cmd(&arm), Some(0.0));
    }
}

//! # Data Store

use log::{info, warn};

use crate::arm_ctrl;

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the arm has been put into safe mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SafeModeCause {
    MakeSafeTc,
    ConsecutiveCommsFaults,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time
    pub elapsed_s: f64,

    // Safe mode variables
    /// Determines if the arm is in safe mode.
    pub safe: bool,

    /// Gives the reason for the arm being in safe mode.
    pub safe_cause: Option<SafeModeCause>,

    // ArmCtrl
    pub arm_ctrl_input: arm_ctrl::InputData,
    pub arm_ctrl_output: arm_ctrl::OutputData,
    pub arm_ctrl_status_rpt: arm_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of consecutive cycles in which ArmCtrl reported a communications fault
    pub num_consec_comms_faults: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Puts the arm into safe mode with the given cause.
    ///
    /// Any pending ArmCtrl command is dropped. The caller is responsible for making ArmCtrl
    /// itself safe.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if !self.safe {
            warn!("Make safe requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);
        }

        self.arm_ctrl_input = arm_ctrl::InputData::default();
    }

    /// Attempts to disable the safe mode by clearing the given cause.
    ///
    /// Returns `true` if safe mode is no longer enabled. To remove safe mode the provided cause
    /// must match the initial reason for safe mode being enabled.
    pub fn make_unsafe(&mut self, cause: SafeModeCause) -> bool {
        if !self.safe {
            return true;
        }

        match self.safe_cause {
            Some(root_cause) if root_cause != cause => {
                info!(
                    "Make unsafe requested, root cause ({:?}) differs from {:?}, rejected",
                    root_cause, cause
                );
                false
            }
            _ => {
                self.safe = false;
                self.safe_cause = None;
                info!("Make unsafe requested, root cause match, safe mode disabled");
                true
            }
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.arm_ctrl_input = arm_ctrl::InputData::default();
        self.arm_ctrl_output = arm_ctrl::OutputData::default();
        self.arm_ctrl_status_rpt = arm_ctrl::StatusReport::default();

        self.elapsed_s = util::session::get_elapsed_seconds();
    }

    /// Perform actions required at the end of a cycle.
    ///
    /// Tracks consecutive communications faults, entering safe mode once more than
    /// `max_consec_comms_faults` have been seen in a row and leaving it on the first cycle
    /// without one.
    pub fn cycle_end(&mut self, max_consec_comms_faults: u64) {
        if self.arm_ctrl_status_rpt.comms_fault {
            self.num_consec_comms_faults += 1;

            if self.num_consec_comms_faults > max_consec_comms_faults {
                if !self.safe {
                    warn!(
                        "Maximum number of consecutive communications faults ({}) exceeded",
                        max_consec_comms_faults
                    );
                }
                self.make_safe(SafeModeCause::ConsecutiveCommsFaults);
            }
        } else {
            self.num_consec_comms_faults = 0;

            // Communications are back, leave safe mode if they were the cause
            self.make_unsafe(SafeModeCause::ConsecutiveCommsFaults);
        }

        self.num_cycles += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::arm_ctrl::ArmCmd;

    #[test]
    fn test_safe_mode_causes() {
        let mut ds = DataStore::default();
        ds.arm_ctrl_input.cmd = Some(ArmCmd::Manual { speed: 0.2 });

        ds.make_safe(SafeModeCause::ConsecutiveCommsFaults);
        assert!(ds.safe);
        assert!(ds.arm_ctrl_input.cmd.is_none());

        // A second request doesn't replace the root cause
        ds.make_safe(SafeModeCause::MakeSafeTc);
        assert_eq!(ds.safe_cause, Some(SafeModeCause::ConsecutiveCommsFaults));

        assert!(!ds.make_unsafe(SafeModeCause::MakeSafeTc));
        assert!(ds.safe);

        assert!(ds.make_unsafe(SafeModeCause::ConsecutiveCommsFaults));
        assert!(!ds.safe);
        assert_eq!(ds.safe_cause, None);

        // Already unsafe
        assert!(ds.make_unsafe(SafeModeCause::MakeSafeTc));
    }

    #[test]
    fn test_consecutive_comms_faults() {
        let mut ds = DataStore::default();

        for _ in 0..3 {
            ds.arm_ctrl_status_rpt.comms_fault = true;
            ds.cycle_end(3);
        }
        assert!(!ds.safe);

        // A good cycle resets the count
        ds.arm_ctrl_status_rpt.comms_fault = false;
        ds.cycle_end(3);
        assert_eq!(ds.num_consec_comms_faults, 0);

        for _ in 0..4 {
            ds.arm_ctrl_status_rpt.comms_fault = true;
            ds.cycle_end(3);
        }
        assert!(ds.safe);
        assert_eq!(ds.safe_cause, Some(SafeModeCause::ConsecutiveCommsFaults));
        assert_eq!(ds.num_cycles, 8);

        ds.arm_ctrl_status_rpt.comms_fault = false;
        ds.cycle_end(3);
        assert!(!ds.safe);
    }

    #[test]
    fn test_cycle_start() {
        let mut ds = DataStore::default();
        ds.arm_ctrl_input.cmd = Some(ArmCmd::Stop);
        ds.arm_ctrl_status_rpt.comms_fault = true;

        ds.cycle_start(50.0);
        assert!(ds.is_1_hz_cycle);
        assert!(ds.arm_ctrl_input.cmd.is_none());
        assert!(!ds.arm_ctrl_status_rpt.comms_fault);

        ds.num_cycles = 1;
        ds.cycle_start(50.0);
        assert!(!ds.is_1_hz_cycle);
    }
}

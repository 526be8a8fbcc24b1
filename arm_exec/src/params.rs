//! # Arm Executable Parameters
//!
//! This module provide parameters for the arm executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::eqpt::sim::SimParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmExecParams {
    /// Number of consecutive cycles with a communications fault after which safe mode is entered
    #[serde(default = "default_max_consec_comms_faults")]
    pub max_consec_comms_faults: u64,

    /// Simulated arm the executable drives
    pub sim: SimParams,
}

fn default_max_consec_comms_faults() -> u64 {
    10
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file() {
        let params: ArmExecParams =
            util::params::from_str(include_str!("../../params/arm_exec.toml")).unwrap();

        assert!(params.max_consec_comms_faults > 0);
        assert!(params.sim.full_speed_rate_s > 0.0);
        assert!(params.sim.min_pos < params.sim.max_pos);
    }

    #[test]
    fn test_defaults() {
        let params: ArmExecParams = util::params::from_str(
            r#"
            [sim]
            initial_pos = 0.5
            full_speed_rate_s = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(params.max_consec_comms_faults, 10);
        assert_eq!(params.sim.fault_every_n_reads, None);
    }
}

//! # Telecommand processor module
//!
//! The telecommand processor handles TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use arm_lib::data_store::{DataStore, SafeModeCause};
use comms_if::tc::{Tc, TcResponse};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules. While in safe mode only
/// `MakeUnsafe` is executed, everything else gets `CannotExecute`.
pub(crate) fn exec(ds: &mut DataStore, tc: &Tc) -> TcResponse {
    if ds.safe {
        match tc {
            Tc::MakeUnsafe | Tc::Heartbeat => (),
            _ => {
                warn!("In safe mode, rejecting {:?}", tc);
                return TcResponse::CannotExecute;
            }
        }
    }

    // Handle different Tcs
    match tc {
        Tc::Heartbeat => {
            debug!("Recieved Heartbeat");
        }
        Tc::MakeSafe => {
            debug!("Recieved MakeSafe command");
            ds.make_safe(SafeModeCause::MakeSafeTc);
        }
        Tc::MakeUnsafe => {
            debug!("Recieved MakeUnsafe command");
            if !ds.make_unsafe(SafeModeCause::MakeSafeTc) {
                return TcResponse::CannotExecute;
            }
        }
        Tc::ArmCtrl(cmd) => ds.arm_ctrl_input.cmd = Some(cmd.clone()),
    }

    TcResponse::Ok
}

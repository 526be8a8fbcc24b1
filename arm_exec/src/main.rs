//! Main arm executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Telecommand collection, from a script or the command line
//!         - Telecommand processing and handling
//!         - Arm control processing
//!         - Archiving
//!         - Simulated arm update
//!
//! # Usage
//!
//! ```text
//! arm_exec script scripts/presets.ascr
//! arm_exec --timeout-s 20 cmd preset high
//! arm_exec cmd manual -0.3
//! ```

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use arm_lib::{
    arm_ctrl::{self, ArmCtrl},
    data_store::DataStore,
    eqpt::sim::SimArm,
    params::ArmExecParams,
    CYCLE_FREQUENCY_HZ, CYCLE_PERIOD_S,
};
use comms_if::tc::{arm_ctrl::ArmCmd, Tc, TcResponse};

mod tc_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use structopt::StructOpt;

// Internal
use util::{
    archive::Archived,
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
    time,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Arm position controller, driving a simulated arm.
#[derive(Debug, StructOpt)]
#[structopt(name = "arm_exec")]
struct Opt {
    /// Stop after this many seconds even if the arm is still moving
    #[structopt(long)]
    timeout_s: Option<f64>,

    #[structopt(subcommand)]
    source: SourceOpt,
}

/// Where telecommands come from.
#[derive(Debug, StructOpt)]
enum SourceOpt {
    /// Run a timed telecommand script
    Script {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
    },

    /// Run a single arm command until it completes
    Cmd {
        #[structopt(subcommand)]
        cmd: ArmCmd,
    },
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("arm_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Executable\n");
    info!(
        "Running on: {}",
        host::get_hostname().unwrap_or_else(|| String::from("unknown host"))
    );
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let exec_params: ArmExecParams =
        util::params::load("arm_exec.toml").wrap_err("Could not load exec params")?;
    let arm_ctrl_params: arm_ctrl::Params =
        util::params::load("arm_ctrl.toml").wrap_err("Could not load ArmCtrl params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    let mut tc_source = match opt.source {
        SourceOpt::Script { path } => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(&path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_tcs()
            );

            TcSource::Script(si)
        }
        SourceOpt::Cmd { cmd } => {
            info!("Running single command {:?}\n", cmd);
            TcSource::Single(Some(cmd))
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    let sim = SimArm::new(exec_params.sim.clone());
    info!("Simulated arm initialised at {:.3}", sim.pos());

    let mut arm_ctrl = ArmCtrl::new(arm_ctrl_params, sim.pot(), sim.motor())
        .wrap_err("Failed to create ArmCtrl")?;
    arm_ctrl
        .init("arm_ctrl", &session)
        .wrap_err("Failed to initialise ArmCtrl")?;
    info!("ArmCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut tcs_done = false;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- TELECOMMAND PROCESSING ----

        let tcs = match tc_source {
            TcSource::Script(ref mut si) => match si.get_pending_tcs(ds.elapsed_s) {
                PendingTcs::None => vec![],
                PendingTcs::Some(tc_vec) => tc_vec,
                PendingTcs::EndOfScript => {
                    if !tcs_done {
                        info!("End of TC script reached");
                        tcs_done = true;
                    }
                    vec![]
                }
            },
            TcSource::Single(ref mut cmd) => {
                tcs_done = true;
                cmd.take().map(Tc::ArmCtrl).into_iter().collect()
            }
        };

        for tc in tcs.iter() {
            match tc_processor::exec(&mut ds, tc) {
                TcResponse::Ok => (),
                r => warn!("Could not execute {:?}: {:?}", tc, r),
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        if ds.safe {
            ds.arm_ctrl_status_rpt = arm_ctrl.make_safe();
        } else {
            match arm_ctrl.proc(&ds.arm_ctrl_input) {
                Ok((o, r)) => {
                    ds.arm_ctrl_output = o;
                    ds.arm_ctrl_status_rpt = r;
                }
                // ArmCtrl errors usually just mean you sent the wrong TC, so just issue the
                // warning and continue.
                Err(e) => warn!("Error during ArmCtrl processing: {}", e),
            }
        }

        if ds.is_1_hz_cycle {
            debug!(
                "Arm at {:.3}, {:?} at {:.2}",
                sim.pos(),
                ds.arm_ctrl_status_rpt.ramp_state,
                ds.arm_ctrl_status_rpt.commanded_speed
            );
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = arm_ctrl.write() {
            warn!("Could not write ArmCtrl archives: {}", e);
        }

        // ---- SIMULATION ----

        sim.step(CYCLE_PERIOD_S);

        // ---- CYCLE MANAGEMENT ----

        ds.cycle_end(exec_params.max_consec_comms_faults);

        if tcs_done && !arm_ctrl.is_busy() {
            info!("All commands complete, arm at {:.3}", sim.pos());
            break;
        }

        if let Some(timeout_s) = opt.timeout_s {
            if ds.elapsed_s > timeout_s {
                warn!("Timeout of {} s reached with the arm still busy", timeout_s);
                break;
            }
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match time::seconds_to_std(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    let final_status = arm_ctrl.make_safe();
    session.save("arm_ctrl/final_status.json", final_status);

    info!(
        "End of execution after {} cycles, final status: {:?}",
        ds.num_cycles, final_status
    );

    session.exit();

    Ok(())
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the telecommands incoming to the exec.
enum TcSource {
    /// A timed script of TCs
    Script(ScriptInterpreter),

    /// A single command, taken on the first cycle
    Single(Option<ArmCmd>),
}

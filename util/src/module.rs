//! Cyclic module interface
//!
//! The arm executable runs its modules from a fixed period loop. A module is
//! built once, initialised against the session (which is where it opens its
//! archives), then has `proc` called exactly once per cycle with that cycle's
//! input. Anything which has to survive between cycles, a seek in progress for
//! example, lives inside the module.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// A module driven by the executable's cycle.
pub trait State {
    /// Data required during initialisation, e.g. the archive directory.
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Data required for cyclic processing, usually the command received
    /// this cycle, if any.
    type InputData;
    /// Data produced by cyclic processing.
    type OutputData;
    /// A report on the status of the cyclic processing.
    type StatusReport;
    /// An error which can occur during cyclic processing.
    type ProcError;

    /// Initialise the module against the current session.
    ///
    /// Called once, before the first `proc`. Modules which are never
    /// initialised must still run, just without archiving.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Process one cycle.
    ///
    /// Returns what was produced this cycle and a report on how it went. An
    /// error means the input was rejected, the module keeps whatever it was
    /// doing before and can be called again next cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}

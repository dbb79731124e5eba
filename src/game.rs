//! Game-economy layer.
//!
//! Implements the idle music-career rules on top of the ledger:
//! - Player state snapshot (money, fans, levels, costs)
//! - Economic actions with funds gating and cost doubling
//! - The economy recorder, which mines one ledger block per action and
//!   persists snapshots through the chain client
//! - Invariant checks over state and ledger

mod invariants;
mod recorder;
mod state;

pub use invariants::{InvariantViolation, check_invariants};
pub use recorder::{EconomyRecorder, RecorderError};
pub use state::{Action, PlayerData};

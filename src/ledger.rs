//! Local proof-of-work ledger.
//!
//! An append-only, hash-linked chain of blocks used as a tamper-evident
//! audit log for monetary actions:
//! - Transactions (immutable amounts)
//! - Blocks (batched transactions, mined against a difficulty target)
//! - The chain itself (linkage and proof-of-work validation)
//!
//! This is a single-writer local ledger, not a distributed blockchain:
//! there is no consensus, no propagation, and no fork resolution.

mod block;
mod chain;
mod transaction;

pub use block::{Block, BlockHash};
pub use chain::{Ledger, LedgerError};
pub use transaction::Transaction;

// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Encore: an idle music-career economy recorded on a local proof-of-work
//! ledger.
//!
//! Every economic action the player takes is committed as one mined block
//! on an append-only, hash-linked chain, then mirrored out through an
//! asynchronous chain client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Economy Recorder             │
//! ├─────────────────────────────────────┤
//! │      Proof-of-Work Ledger           │
//! ├─────────────────────────────────────┤
//! │   Chain Client (async boundary)     │
//! └─────────────────────────────────────┘
//! ```

pub mod client;
pub mod game;
pub mod ledger;

// Re-export key types at crate root for convenience
pub use client::{ChainClient, ClientError, ErrorReporter, MemoryChainClient, generate_address};
pub use game::{Action, EconomyRecorder, PlayerData, RecorderError};
pub use ledger::{Block, BlockHash, Ledger, LedgerError, Transaction};

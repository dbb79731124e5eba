//! External collaborators: the remote chain client, the player-facing
//! error reporter, and address generation.
//!
//! The core depends only on the traits here; production and test
//! implementations are two variants behind the same interface.

mod chain;
mod memory;
mod reporter;

pub use chain::{ChainClient, ClientError, generate_address};
pub use memory::{MemoryChainClient, Transfer};
pub use reporter::{ErrorReporter, PanelReporter, TracingReporter};

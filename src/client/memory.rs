//! In-process chain client.
//!
//! Backs the CLI and the test suites; the remote network client is the
//! other variant behind [`ChainClient`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client::chain::{ChainClient, ClientError};

/// Record of a token transfer issued through the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Token contract the transfer ran against.
    pub contract_address: String,
    /// Receiving player address.
    pub player_address: String,
    /// Token amount moved.
    pub amount: u64,
}

#[derive(Debug, Default)]
struct Inner {
    snapshots: Mutex<HashMap<String, String>>,
    balances: Mutex<HashMap<(String, String), u64>>,
    transfers: Mutex<Vec<Transfer>>,
}

/// Chain client holding everything in process memory.
///
/// Clones share state, so a test can keep a handle and observe what the
/// recorder persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryChainClient {
    inner: Arc<Inner>,
}

impl MemoryChainClient {
    /// Create an empty in-memory client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stablecoin balance for a (contract, player) pair.
    pub fn set_balance(&self, contract_address: &str, player_address: &str, amount: u64) {
        if let Ok(mut balances) = self.inner.balances.lock() {
            balances.insert(
                (contract_address.to_string(), player_address.to_string()),
                amount,
            );
        }
    }

    /// The snapshot most recently saved for a player, if any.
    #[must_use]
    pub fn saved_snapshot(&self, player_id: &str) -> Option<String> {
        self.inner.snapshots.lock().ok()?.get(player_id).cloned()
    }

    /// Every transfer issued through this client, in order.
    #[must_use]
    pub fn transfers(&self) -> Vec<Transfer> {
        self.inner
            .transfers
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    fn lock_failed() -> ClientError {
        ClientError::new("in-memory store lock poisoned")
    }
}

impl ChainClient for MemoryChainClient {
    async fn save_player_data(&self, player_id: &str, snapshot: &str) -> Result<(), ClientError> {
        let mut snapshots = self
            .inner
            .snapshots
            .lock()
            .map_err(|_| Self::lock_failed())?;
        snapshots.insert(player_id.to_string(), snapshot.to_string());
        Ok(())
    }

    async fn load_player_data(&self, player_id: &str) -> Result<Option<String>, ClientError> {
        let snapshots = self
            .inner
            .snapshots
            .lock()
            .map_err(|_| Self::lock_failed())?;
        Ok(snapshots.get(player_id).cloned())
    }

    async fn get_balance(
        &self,
        contract_address: &str,
        player_address: &str,
    ) -> Result<u64, ClientError> {
        let balances = self.inner.balances.lock().map_err(|_| Self::lock_failed())?;
        let key = (contract_address.to_string(), player_address.to_string());
        Ok(balances.get(&key).copied().unwrap_or(0))
    }

    async fn transfer_tokens(
        &self,
        contract_address: &str,
        player_address: &str,
        amount: u64,
    ) -> Result<(), ClientError> {
        {
            let mut balances = self.inner.balances.lock().map_err(|_| Self::lock_failed())?;
            let key = (contract_address.to_string(), player_address.to_string());
            let balance = balances.entry(key).or_insert(0);
            *balance = balance.saturating_add(amount);
        }
        let mut transfers = self
            .inner
            .transfers
            .lock()
            .map_err(|_| Self::lock_failed())?;
        transfers.push(Transfer {
            contract_address: contract_address.to_string(),
            player_address: player_address.to_string(),
            amount,
        });
        Ok(())
    }
}

//! The chain-client boundary: snapshot persistence and token operations.

use std::fmt;

use sha2::{Digest, Sha256};

/// Domain separator for address derivation, distinct from the block
/// digest domain.
const ADDRESS_DOMAIN: &[u8] = b"ENCORE_ADDR";

/// Error reported by a chain client (network, storage, serialization —
/// the boundary does not distinguish).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    message: String,
}

impl ClientError {
    /// Create a new client error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClientError {}

/// Capability set the economy recorder needs from the remote side:
/// save/load of the serialized player snapshot, stablecoin balance
/// queries, and token transfers.
///
/// All methods are asynchronous; they are network-bound in production and
/// must never block the ledger's single-writer path. Timeouts are the
/// implementation's responsibility.
pub trait ChainClient {
    /// Persist a player's serialized snapshot.
    fn save_player_data(
        &self,
        player_id: &str,
        snapshot: &str,
    ) -> impl Future<Output = Result<(), ClientError>>;

    /// Fetch the most recently saved snapshot, if any.
    fn load_player_data(
        &self,
        player_id: &str,
    ) -> impl Future<Output = Result<Option<String>, ClientError>>;

    /// Query the stablecoin balance held for `player_address` under the
    /// given token contract.
    fn get_balance(
        &self,
        contract_address: &str,
        player_address: &str,
    ) -> impl Future<Output = Result<u64, ClientError>>;

    /// Move tokens on behalf of the player.
    fn transfer_tokens(
        &self,
        contract_address: &str,
        player_address: &str,
        amount: u64,
    ) -> impl Future<Output = Result<(), ClientError>>;
}

/// Derive a player's on-chain address from their player id.
///
/// Deterministic per player; distinct ids produce distinct addresses.
#[must_use]
pub fn generate_address(player_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(player_id.as_bytes());
    let digest = hasher.finalize();
    format!("0x{}", hex::encode(&digest[..20]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_deterministic() {
        assert_eq!(generate_address("Player1"), generate_address("Player1"));
    }

    #[test]
    fn test_distinct_players_get_distinct_addresses() {
        assert_ne!(generate_address("Player1"), generate_address("Player2"));
    }

    #[test]
    fn test_address_format() {
        let address = generate_address("Player1");
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
    }
}

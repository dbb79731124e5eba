//! Blocks: batched transactions plus linkage and proof-of-work metadata.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::ledger::chain::LedgerError;
use crate::ledger::transaction::Transaction;

/// Domain separator mixed into every block digest so ledger hashes cannot
/// collide with hashes computed for other purposes (e.g. addresses).
const BLOCK_DOMAIN: &[u8] = b"ENCORE_BLOCK";

/// SHA-256 digest identifying a block.
///
/// Displays and serializes as lowercase hex, which is also the alphabet
/// the difficulty predicate counts leading zeros in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    /// The all-zero sentinel used as the genesis block's parent reference.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0; 32])
    }

    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Number of leading zero hex digits in the digest.
    #[must_use]
    pub fn leading_zero_digits(&self) -> u32 {
        let mut count = 0;
        for byte in self.0 {
            if byte == 0 {
                count += 2;
                continue;
            }
            if byte >> 4 == 0 {
                count += 1;
            }
            break;
        }
        count
    }

    /// Whether this digest satisfies the proof-of-work target.
    #[must_use]
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        self.leading_zero_digits() >= difficulty
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(D::Error::custom)?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| D::Error::custom("expected a 32-byte hex digest"))?;
        Ok(Self(digest))
    }
}

/// An ordered batch of transactions linked to its parent by hash and
/// sealed by a nonce search against the ledger's difficulty.
///
/// A block is *pending* between construction and a successful
/// [`Ledger::add_block`](crate::ledger::Ledger::add_block); once appended
/// it is never modified again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    transactions: Vec<Transaction>,
    previous_hash: BlockHash,
    nonce: u64,
    hash: BlockHash,
}

impl Block {
    /// Create a candidate block referencing the given parent hash.
    ///
    /// The nonce starts at 0 and the initial hash is computed immediately.
    /// Fails with [`LedgerError::EmptyBlock`] when `transactions` is empty:
    /// only the genesis block may carry no transactions.
    pub fn new(
        transactions: Vec<Transaction>,
        previous_hash: BlockHash,
    ) -> Result<Self, LedgerError> {
        if transactions.is_empty() {
            return Err(LedgerError::EmptyBlock);
        }
        Ok(Self::unchecked(transactions, previous_hash))
    }

    /// The genesis block: no transactions, all-zero parent sentinel.
    pub(crate) fn genesis() -> Self {
        Self::unchecked(Vec::new(), BlockHash::zero())
    }

    fn unchecked(transactions: Vec<Transaction>, previous_hash: BlockHash) -> Self {
        let nonce = 0;
        let hash = Self::digest(&previous_hash, &transactions, nonce);
        Self {
            transactions,
            previous_hash,
            nonce,
            hash,
        }
    }

    /// The transactions in this block, in economic order.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Hash of the parent block at the time this block was built.
    #[must_use]
    pub const fn previous_hash(&self) -> BlockHash {
        self.previous_hash
    }

    /// The nonce the mining search settled on.
    #[must_use]
    pub const fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The block's current digest.
    #[must_use]
    pub const fn hash(&self) -> BlockHash {
        self.hash
    }

    /// Search for a nonce whose digest satisfies the difficulty target.
    ///
    /// Ascending search from the current nonce; identical inputs always
    /// mine to the same nonce and hash. The search is unbounded — callers
    /// only use small difficulties.
    pub fn mine(&mut self, difficulty: u32) {
        while !self.hash.meets_difficulty(difficulty) {
            self.nonce += 1;
            self.hash = Self::digest(&self.previous_hash, &self.transactions, self.nonce);
        }
    }

    /// Pure proof-of-work check: the stored hash satisfies the difficulty
    /// target and matches a fresh recomputation over the stored contents,
    /// so any post-mining tampering is detected.
    #[must_use]
    pub fn verify_proof_of_work(&self, difficulty: u32) -> bool {
        self.hash.meets_difficulty(difficulty)
            && self.hash == Self::digest(&self.previous_hash, &self.transactions, self.nonce)
    }

    /// Digest over (previous hash, transactions, nonce) with a fixed
    /// little-endian encoding, so mining is deterministic.
    fn digest(previous_hash: &BlockHash, transactions: &[Transaction], nonce: u64) -> BlockHash {
        let mut hasher = Sha256::new();
        hasher.update(BLOCK_DOMAIN);
        hasher.update(previous_hash.as_bytes());
        hasher.update((transactions.len() as u64).to_le_bytes());
        for tx in transactions {
            hasher.update(tx.amount().to_le_bytes());
        }
        hasher.update(nonce.to_le_bytes());
        BlockHash(hasher.finalize().into())
    }
}

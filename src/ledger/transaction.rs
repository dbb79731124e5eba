//! Monetary transactions recorded on the ledger.

use serde::{Deserialize, Serialize};

/// A single monetary fact: how much moved.
///
/// Amounts are signed so that refunds can be represented; the ledger
/// itself imposes no sign constraint. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    amount: i64,
}

impl Transaction {
    /// Create a transaction for the given amount.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self { amount }
    }

    /// The amount this transaction moved.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_is_preserved() {
        assert_eq!(Transaction::new(20).amount(), 20);
        assert_eq!(Transaction::new(0).amount(), 0);
    }

    #[test]
    fn test_negative_amounts_are_permitted() {
        // Refund direction
        let refund = Transaction::new(-50);
        assert_eq!(refund.amount(), -50);
    }

    #[test]
    fn test_json_roundtrip() {
        let tx = Transaction::new(1234);
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }
}

//! The economy recorder: single writer over the player's ledger.
//!
//! Every successful economic action mines exactly one block carrying one
//! transaction for the amount deducted, appends it, and then persists the
//! player snapshot through the chain client. The ledger append is the
//! commit point; persistence failures are reported to the player but never
//! roll the ledger back.

use std::fmt;

use crate::client::{ChainClient, ClientError, ErrorReporter, generate_address};
use crate::game::state::{Action, PlayerData};
use crate::ledger::{Block, Ledger, LedgerError, Transaction};

/// How many times an append is re-mined after a linkage rejection before
/// giving up. With a single writer one retry already suffices.
const LINKAGE_RETRIES: u32 = 3;

/// Message shown when a cash-out exceeds the player's money.
const CASH_OUT_MESSAGE: &str = "Insufficient funds to cash out.";

/// Errors surfaced by recorder operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    /// The player could not afford the action. Already reported to the
    /// player; the caller needs no further handling.
    InsufficientFunds {
        /// The player-facing message that was shown.
        message: &'static str,
    },
    /// The ledger rejected the mined block even after linkage retries.
    Ledger(LedgerError),
    /// The chain client failed on an operation whose result the caller
    /// depends on (loading a snapshot, querying a balance).
    Client(ClientError),
    /// A snapshot could not be serialized or parsed.
    Snapshot {
        /// What went wrong, from the serializer.
        reason: String,
    },
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecorderError::InsufficientFunds { message } => f.write_str(message),
            RecorderError::Ledger(err) => write!(f, "ledger rejected block: {err}"),
            RecorderError::Client(err) => write!(f, "chain client failed: {err}"),
            RecorderError::Snapshot { reason } => write!(f, "snapshot invalid: {reason}"),
        }
    }
}

impl std::error::Error for RecorderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecorderError::Ledger(err) => Some(err),
            RecorderError::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LedgerError> for RecorderError {
    fn from(err: LedgerError) -> Self {
        RecorderError::Ledger(err)
    }
}

impl From<ClientError> for RecorderError {
    fn from(err: ClientError) -> Self {
        RecorderError::Client(err)
    }
}

/// Owns the player state and the ledger, and drives both through the five
/// economic actions plus save, load, and cash-out.
///
/// The recorder is the ledger's only writer. Concurrent producers do not
/// exist in this design; the linkage retry loop in `append_mined` is the
/// recovery path should one ever appear.
#[derive(Debug)]
pub struct EconomyRecorder<C, R> {
    player_id: String,
    player_address: String,
    contract_address: String,
    state: PlayerData,
    ledger: Ledger,
    client: C,
    reporter: R,
}

impl<C: ChainClient, R: ErrorReporter> EconomyRecorder<C, R> {
    /// Start a fresh career: default player state and a new ledger with a
    /// mined genesis block.
    pub fn new(
        player_id: impl Into<String>,
        contract_address: impl Into<String>,
        difficulty: u32,
        client: C,
        reporter: R,
    ) -> Self {
        let player_id = player_id.into();
        let player_address = generate_address(&player_id);
        Self {
            player_id,
            player_address,
            contract_address: contract_address.into(),
            state: PlayerData::default(),
            ledger: Ledger::new(difficulty),
            client,
            reporter,
        }
    }

    /// The current player snapshot.
    #[must_use]
    pub const fn state(&self) -> &PlayerData {
        &self.state
    }

    /// The player's ledger, genesis first.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The player's derived on-chain address.
    #[must_use]
    pub fn player_address(&self) -> &str {
        &self.player_address
    }

    /// Attempt an economic action.
    ///
    /// On success the cost is deducted, the action's state changes apply,
    /// one block for the deducted amount is mined and appended, and the
    /// snapshot is persisted. On insufficient funds nothing changes, the
    /// action's message is shown, and `InsufficientFunds` is returned.
    pub async fn apply(&mut self, action: Action) -> Result<(), RecorderError> {
        let Some(cost) = self.state.try_apply(action) else {
            let message = action.insufficient_funds_message();
            self.reporter.show(message);
            return Err(RecorderError::InsufficientFunds { message });
        };

        tracing::info!(%action, cost, money = self.state.money, "action applied");
        self.append_mined(ledger_amount(cost))?;
        self.persist().await;
        Ok(())
    }

    /// Record a song.
    pub async fn record_song(&mut self) -> Result<(), RecorderError> {
        self.apply(Action::RecordSong).await
    }

    /// Go on tour.
    pub async fn go_on_tour(&mut self) -> Result<(), RecorderError> {
        self.apply(Action::GoOnTour).await
    }

    /// Upgrade the studio.
    pub async fn upgrade_studio(&mut self) -> Result<(), RecorderError> {
        self.apply(Action::UpgradeStudio).await
    }

    /// Upgrade the tour.
    pub async fn upgrade_tour(&mut self) -> Result<(), RecorderError> {
        self.apply(Action::UpgradeTour).await
    }

    /// Upgrade song quality.
    pub async fn upgrade_song(&mut self) -> Result<(), RecorderError> {
        self.apply(Action::UpgradeSong).await
    }

    /// Checkpoint the career: append a block recording the player's
    /// current money, then persist the snapshot.
    pub async fn save(&mut self) -> Result<(), RecorderError> {
        self.append_mined(ledger_amount(self.state.money))?;
        self.persist().await;
        Ok(())
    }

    /// Restore the player snapshot from the chain client.
    ///
    /// Returns `Ok(true)` when a snapshot was found and applied, `Ok(false)`
    /// when none exists. When a snapshot is applied, the money field is
    /// reconciled against the on-chain stablecoin balance; if the balance
    /// query fails the snapshot's own value stands and the failure is
    /// reported.
    pub async fn load(&mut self) -> Result<bool, RecorderError> {
        let Some(snapshot) = self.client.load_player_data(&self.player_id).await? else {
            return Ok(false);
        };
        let mut data: PlayerData =
            serde_json::from_str(&snapshot).map_err(|err| RecorderError::Snapshot {
                reason: err.to_string(),
            })?;

        match self
            .client
            .get_balance(&self.contract_address, &self.player_address)
            .await
        {
            Ok(balance) => data.money = balance,
            Err(err) => {
                tracing::warn!(error = %err, "balance query failed, keeping snapshot money");
                self.reporter.show("Could not verify balance.");
            }
        }

        self.state = data;
        Ok(true)
    }

    /// Convert in-game money into tokens sent to the player's address.
    ///
    /// The deduction and its ledger block commit before the transfer is
    /// attempted; a failed transfer is reported but not rolled back.
    pub async fn cash_out(&mut self, amount: u64) -> Result<(), RecorderError> {
        if self.state.money < amount {
            self.reporter.show(CASH_OUT_MESSAGE);
            return Err(RecorderError::InsufficientFunds {
                message: CASH_OUT_MESSAGE,
            });
        }
        self.state.money -= amount;
        self.append_mined(ledger_amount(amount))?;

        if let Err(err) = self
            .client
            .transfer_tokens(&self.contract_address, &self.player_address, amount)
            .await
        {
            tracing::warn!(error = %err, amount, "token transfer failed");
            self.reporter.show("Token transfer failed.");
        }

        self.persist().await;
        Ok(())
    }

    /// Mine a one-transaction block against the current tip and append it.
    ///
    /// `InvalidLinkage` re-fetches the tip and re-mines, up to
    /// [`LINKAGE_RETRIES`] times; any other rejection is returned as-is.
    fn append_mined(&mut self, amount: i64) -> Result<(), RecorderError> {
        let mut last = LedgerError::InvalidLinkage {
            height: self.ledger.len(),
        };
        for _ in 0..=LINKAGE_RETRIES {
            let mut block = Block::new(vec![Transaction::new(amount)], self.ledger.tip())?;
            block.mine(self.ledger.difficulty());
            match self.ledger.add_block(block) {
                Ok(()) => return Ok(()),
                Err(err @ LedgerError::InvalidLinkage { .. }) => {
                    tracing::warn!(error = %err, "tip moved during mining, retrying");
                    last = err;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(last.into())
    }

    /// Persist the snapshot through the chain client. Failures are shown
    /// to the player and logged; the committed ledger block stands either
    /// way, so no error is returned.
    async fn persist(&mut self) {
        let snapshot = match serde_json::to_string(&self.state) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "snapshot serialization failed");
                self.reporter.show("Failed to save progress.");
                return;
            }
        };
        if let Err(err) = self.client.save_player_data(&self.player_id, &snapshot).await {
            tracing::warn!(error = %err, "snapshot save failed");
            self.reporter.show("Failed to save progress.");
        }
    }
}

/// Ledger transaction amounts are signed; player money is not. Saturate
/// rather than wrap for values past `i64::MAX`.
fn ledger_amount(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

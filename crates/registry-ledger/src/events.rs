//! # Event Schema
//!
//! Announcements published after a transition commits. Nothing is published
//! for a rejected transition.
//!
//! | Event | Emitted by |
//! |-------|-----------|
//! | `Deposit` | `deposit` |
//! | `Withdraw` | `withdraw` |
//! | `Enter` | `enter_direct` |
//! | `Request` | `enter_delegated` |
//! | `Guardian` | `resolve_as_guardian` |
//! | `Resolve` | `resolve` |
//! | `Report` | `report` |
//! | `Witness` | `witness_report` |
//! | `WitnessPublish` | `publish` |
//! | `UpdateBeneficiary` | `update_beneficiary` |

use registry_types::{Address, Amount, GameId, KillId, Timestamp};
use serde::{Deserialize, Serialize};

/// Outcome announced by a report, resolution or publication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Guardian named by the announcement.
    pub guardian: Address,
    /// Kill being announced.
    pub kill: KillId,
    /// Winning side, as named by the caller.
    pub winner: Address,
    /// Losing side, as named by the caller.
    pub loser: Address,
}

/// Every event the registry publishes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegistryEvent {
    /// A wallet funded its balance and bound a signer.
    Deposit {
        /// Funding wallet.
        wallet: Address,
        /// Signer now bound to the wallet.
        signer: Address,
        /// Amount credited to `available`.
        amount: Amount,
        /// Signed timestamp.
        timestamp: Timestamp,
    },

    /// A wallet withdrew from `available`.
    Withdraw {
        /// Withdrawing wallet.
        wallet: Address,
        /// Amount paid out.
        amount: Amount,
    },

    /// A player staked the buy-in from their own custody.
    Enter {
        /// Entering player.
        player: Address,
        /// Game entered.
        game: GameId,
        /// Stake allocated.
        stake: Amount,
    },

    /// A player entered against a wallet's balance with a signed request.
    Request {
        /// Entering player.
        player: Address,
        /// Guardian of record.
        guardian: Address,
        /// Wallet whose balance backs the stake.
        wallet: Address,
        /// Signed timestamp.
        timestamp: Timestamp,
        /// Stake allocated.
        stake: Amount,
    },

    /// A directly entered game was resolved.
    Guardian {
        /// Game resolved.
        game: GameId,
        /// Resolution outcome; `guardian` is the resolving caller.
        outcome: Outcome,
        /// Winner's `half`.
        winnings: Amount,
        /// Loser's stake.
        forfeited: Amount,
    },

    /// A delegated pair was resolved by its guardian of record. The outcome
    /// names the funding wallets.
    Resolve {
        /// Resolution outcome.
        outcome: Outcome,
        /// Winner's `half`.
        winnings: Amount,
        /// Loser's stake.
        forfeited: Amount,
    },

    /// Unverified outcome announcement.
    Report {
        /// Announcing caller.
        reporter: Address,
        /// Announced outcome.
        outcome: Outcome,
    },

    /// Unverified third-party witness announcement.
    Witness {
        /// Announcing caller.
        reporter: Address,
        /// Announced outcome.
        outcome: Outcome,
    },

    /// A participant published the outcome of their own session.
    WitnessPublish {
        /// Publishing player.
        player: Address,
        /// Outcome, with the session's guardian of record.
        outcome: Outcome,
    },

    /// Owner fees now accrue to a new beneficiary.
    UpdateBeneficiary {
        /// Beneficiary before the update.
        previous: Address,
        /// Beneficiary after the update.
        current: Address,
    },
}

impl RegistryEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "Deposit",
            Self::Withdraw { .. } => "Withdraw",
            Self::Enter { .. } => "Enter",
            Self::Request { .. } => "Request",
            Self::Guardian { .. } => "Guardian",
            Self::Resolve { .. } => "Resolve",
            Self::Report { .. } => "Report",
            Self::Witness { .. } => "Witness",
            Self::WitnessPublish { .. } => "WitnessPublish",
            Self::UpdateBeneficiary { .. } => "UpdateBeneficiary",
        }
    }
}

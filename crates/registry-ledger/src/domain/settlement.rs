//! # Settlement
//!
//! Fee split applied when a guardian resolves a winner/loser pair, both
//! staked `buyin`. The loser's stake is the pot:
//!
//! ```text
//! fee_owner    = buyin * owner_fee_bps    / BASIS_TOTAL
//! fee_guardian = buyin * guardian_fee_bps / BASIS_TOTAL
//! net          = buyin - fee_owner - fee_guardian
//! half         = net / 2            (net % 2 -> rounding residual)
//!
//! beneficiary.available += fee_owner
//! guardian.available    += fee_guardian
//! winner.allocated      += 2 * half, then release half
//! winner.historic       += half
//! loser.allocated       -= buyin
//! ```
//!
//! The winner's stake stays allocated plus `half`, and `half` more becomes
//! withdrawable. Every base unit of the pot lands in exactly one place.

use super::ledger::{Bucket, LedgerTransaction};
use crate::errors::{BalanceFault, RegistryError};
use crate::BASIS_TOTAL;
use registry_types::{Address, Amount};
use serde::{Deserialize, Serialize};

/// Buy-in and fee rates, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Stake each participant allocates.
    pub buyin: Amount,
    /// Beneficiary share of the pot, in basis points.
    pub owner_fee_bps: u16,
    /// Guardian share of the pot, in basis points.
    pub guardian_fee_bps: u16,
}

impl FeeSchedule {
    /// Reject a zero buy-in or fees above [`BASIS_TOTAL`].
    pub fn validate(&self) -> Result<(), BalanceFault> {
        if self.buyin.is_zero() {
            return Err(BalanceFault::ZeroBuyin);
        }
        let total = u32::from(self.owner_fee_bps) + u32::from(self.guardian_fee_bps);
        if total > BASIS_TOTAL {
            return Err(BalanceFault::FeesExceedBasis {
                total,
                max: BASIS_TOTAL,
            });
        }
        Ok(())
    }
}

/// Accounts credited or debited by a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementParties {
    /// Receives the owner fee.
    pub beneficiary: Address,
    /// Receives the guardian fee.
    pub guardian: Address,
    /// Funding wallet of the winning player.
    pub winner_wallet: Address,
    /// Funding wallet of the losing player.
    pub loser_wallet: Address,
}

/// Amounts moved by one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Credited to the beneficiary.
    pub fee_owner: Amount,
    /// Credited to the guardian.
    pub fee_guardian: Amount,
    /// Pot after fees.
    pub net: Amount,
    /// Winner's share: both newly allocated and newly available.
    pub half: Amount,
    /// `net % 2`, paid to nobody.
    pub residual: Amount,
    /// Stake removed from the loser.
    pub forfeited: Amount,
}

impl Settlement {
    /// Compute the split for `schedule`.
    pub fn compute(schedule: &FeeSchedule) -> Result<Self, RegistryError> {
        let basis = Amount::from(BASIS_TOTAL);
        let buyin = schedule.buyin;

        let fee_owner = buyin
            .checked_mul(Amount::from(schedule.owner_fee_bps))
            .ok_or(RegistryError::Arithmetic)?
            / basis;
        let fee_guardian = buyin
            .checked_mul(Amount::from(schedule.guardian_fee_bps))
            .ok_or(RegistryError::Arithmetic)?
            / basis;

        let net = buyin
            .checked_sub(fee_owner)
            .and_then(|rest| rest.checked_sub(fee_guardian))
            .ok_or(RegistryError::Arithmetic)?;
        let two = Amount::from(2u8);

        Ok(Self {
            fee_owner,
            fee_guardian,
            net,
            half: net / two,
            residual: net % two,
            forfeited: buyin,
        })
    }

    /// Stage the split into `tx`.
    pub fn apply(
        &self,
        tx: &mut LedgerTransaction<'_>,
        parties: &SettlementParties,
    ) -> Result<(), RegistryError> {
        tx.credit(parties.beneficiary, self.fee_owner, Bucket::Available)?;
        tx.credit(parties.guardian, self.fee_guardian, Bucket::Available)?;

        let winnings = self
            .half
            .checked_mul(Amount::from(2u8))
            .ok_or(RegistryError::Arithmetic)?;
        tx.credit(parties.winner_wallet, winnings, Bucket::Allocated)?;
        tx.release(parties.winner_wallet, self.half)?;
        tx.credit(parties.winner_wallet, self.half, Bucket::Historic)?;

        tx.debit(parties.loser_wallet, self.forfeited, Bucket::Allocated)?;
        tx.add_residual(self.residual)
    }
}

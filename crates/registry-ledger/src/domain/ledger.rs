//! # Balance Ledger
//!
//! Three buckets per wallet:
//!
//! | Bucket | Meaning |
//! |--------|---------|
//! | `allocated` | staked in an active session, not withdrawable |
//! | `available` | withdrawable |
//! | `historic` | cumulative winnings, informational |
//!
//! Mutations go through a [`LedgerTransaction`], a scratch overlay over the
//! committed records. A transition stages everything it needs, and only a
//! fully successful transition hands its [`LedgerChanges`] to
//! [`BalanceLedger::commit`]. A fault anywhere drops the overlay and nothing
//! is observable.

use crate::errors::RegistryError;
use registry_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One of a wallet's balance buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Staked in an active session.
    Allocated,
    /// Withdrawable.
    Available,
    /// Cumulative winnings.
    Historic,
}

/// Balances held for one wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Staked in an active session.
    pub allocated: Amount,
    /// Withdrawable.
    pub available: Amount,
    /// Cumulative winnings.
    pub historic: Amount,
}

impl BalanceRecord {
    fn get_mut(&mut self, bucket: Bucket) -> &mut Amount {
        match bucket {
            Bucket::Allocated => &mut self.allocated,
            Bucket::Available => &mut self.available,
            Bucket::Historic => &mut self.historic,
        }
    }

    /// Escrowed value (`allocated + available`). `historic` is not escrow.
    pub fn escrowed(&self) -> Option<Amount> {
        self.allocated.checked_add(self.available)
    }
}

// =============================================================================
// COMMITTED LEDGER
// =============================================================================

/// Committed balances of every wallet the registry has seen.
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    records: HashMap<Address, BalanceRecord>,
    rounding_residual: Amount,
}

impl BalanceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed record of `wallet`; all zero if never touched.
    pub fn record(&self, wallet: &Address) -> BalanceRecord {
        self.records.get(wallet).copied().unwrap_or_default()
    }

    /// Base units lost to halving odd settlement pots.
    pub fn rounding_residual(&self) -> Amount {
        self.rounding_residual
    }

    /// Sum of `allocated + available` over all wallets plus the residual.
    ///
    /// Equals the asset the registry has received minus what it has paid
    /// out. `None` only if the sum does not fit in 256 bits.
    pub fn total_escrowed(&self) -> Option<Amount> {
        self.records
            .values()
            .try_fold(self.rounding_residual, |acc, record| {
                acc.checked_add(record.escrowed()?)
            })
    }

    /// Start staging changes against the committed state.
    pub fn begin(&self) -> LedgerTransaction<'_> {
        LedgerTransaction {
            base: self,
            touched: HashMap::new(),
            residual: Amount::zero(),
        }
    }

    /// Apply a fully staged transition.
    pub fn commit(&mut self, changes: LedgerChanges) {
        debug!(
            wallets = changes.records.len(),
            residual = %changes.residual,
            "committing ledger changes"
        );
        self.records.extend(changes.records);
        // Bounded by the buy-in sum ever staked, which itself fits in 256 bits.
        self.rounding_residual = self.rounding_residual.saturating_add(changes.residual);
    }
}

// =============================================================================
// STAGED TRANSACTION
// =============================================================================

/// Scratch overlay of touched records.
#[derive(Debug)]
pub struct LedgerTransaction<'a> {
    base: &'a BalanceLedger,
    touched: HashMap<Address, BalanceRecord>,
    residual: Amount,
}

/// Owned result of a staged transaction, ready to commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerChanges {
    records: HashMap<Address, BalanceRecord>,
    residual: Amount,
}

impl LedgerChanges {
    /// True when nothing was staged.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.residual.is_zero()
    }
}

impl LedgerTransaction<'_> {
    /// Record of `wallet` as staged so far.
    pub fn record(&self, wallet: &Address) -> BalanceRecord {
        self.touched
            .get(wallet)
            .copied()
            .unwrap_or_else(|| self.base.record(wallet))
    }

    fn entry(&mut self, wallet: Address) -> &mut BalanceRecord {
        let base = self.base;
        self.touched
            .entry(wallet)
            .or_insert_with(|| base.record(&wallet))
    }

    /// `bucket += amount`
    pub fn credit(
        &mut self,
        wallet: Address,
        amount: Amount,
        bucket: Bucket,
    ) -> Result<(), RegistryError> {
        let slot = self.entry(wallet).get_mut(bucket);
        *slot = slot.checked_add(amount).ok_or(RegistryError::Arithmetic)?;
        Ok(())
    }

    /// `bucket -= amount`
    pub fn debit(
        &mut self,
        wallet: Address,
        amount: Amount,
        bucket: Bucket,
    ) -> Result<(), RegistryError> {
        let slot = self.entry(wallet).get_mut(bucket);
        *slot = slot.checked_sub(amount).ok_or(RegistryError::Arithmetic)?;
        Ok(())
    }

    /// Move `amount` from `available` to `allocated`.
    pub fn allocate(&mut self, wallet: Address, amount: Amount) -> Result<(), RegistryError> {
        self.debit(wallet, amount, Bucket::Available)?;
        self.credit(wallet, amount, Bucket::Allocated)
    }

    /// Move `amount` from `allocated` to `available`.
    pub fn release(&mut self, wallet: Address, amount: Amount) -> Result<(), RegistryError> {
        self.debit(wallet, amount, Bucket::Allocated)?;
        self.credit(wallet, amount, Bucket::Available)
    }

    /// Account for base units that no wallet receives.
    pub fn add_residual(&mut self, amount: Amount) -> Result<(), RegistryError> {
        self.residual = self
            .residual
            .checked_add(amount)
            .ok_or(RegistryError::Arithmetic)?;
        Ok(())
    }

    /// Finish staging.
    pub fn into_changes(self) -> LedgerChanges {
        LedgerChanges {
            records: self.touched,
            residual: self.residual,
        }
    }
}

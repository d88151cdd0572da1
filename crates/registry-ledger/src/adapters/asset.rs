//! # In-Memory Asset
//!
//! ERC-20-like token for tests and local runs: balances, allowances and a
//! fixed decimal precision.

use crate::errors::CustodyError;
use crate::ports::outbound::AssetCustodian;
use parking_lot::RwLock;
use registry_types::{Address, Amount};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Ledger {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl Ledger {
    fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn move_balance(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        let available = self.balance(&from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientBalance {
                account: from,
                available,
                required: amount,
            })?;
        let before = if to == from { remaining } else { self.balance(&to) };
        let received = before.checked_add(amount).ok_or(CustodyError::Overflow)?;

        self.balances.insert(from, remaining);
        self.balances.insert(to, received);
        Ok(())
    }
}

/// In-memory token.
#[derive(Debug)]
pub struct InMemoryAsset {
    decimals: Option<u8>,
    state: RwLock<Ledger>,
}

impl Default for InMemoryAsset {
    fn default() -> Self {
        Self::with_decimals(18)
    }
}

impl InMemoryAsset {
    /// Create an 18-decimal token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token with the given precision.
    #[must_use]
    pub fn with_decimals(decimals: u8) -> Self {
        Self {
            decimals: Some(decimals),
            state: RwLock::new(Ledger::default()),
        }
    }

    /// Create a token whose `decimals()` call fails.
    #[must_use]
    pub fn without_decimals() -> Self {
        Self {
            decimals: None,
            state: RwLock::new(Ledger::default()),
        }
    }

    /// Create `amount` new tokens for `to`.
    pub fn mint(&self, to: Address, amount: Amount) {
        let mut state = self.state.write();
        let balance = state.balance(&to).saturating_add(amount);
        state.balances.insert(to, balance);
    }

    /// Let `spender` move up to `amount` of `owner`'s tokens.
    pub fn approve(&self, owner: Address, spender: Address, amount: Amount) {
        self.state.write().allowances.insert((owner, spender), amount);
    }

    /// Remaining allowance of `spender` over `owner`.
    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.state
            .read()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }
}

impl AssetCustodian for InMemoryAsset {
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        let mut state = self.state.write();
        let allowance = state
            .allowances
            .get(&(from, spender))
            .copied()
            .unwrap_or_default();
        let remaining = allowance
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientAllowance {
                owner: from,
                spender,
                allowance,
                required: amount,
            })?;

        state.move_balance(from, to, amount)?;
        state.allowances.insert((from, spender), remaining);
        Ok(())
    }

    fn transfer(&self, from: Address, to: Address, amount: Amount) -> Result<(), CustodyError> {
        self.state.write().move_balance(from, to, amount)
    }

    fn balance_of(&self, account: Address) -> Result<Amount, CustodyError> {
        Ok(self.state.read().balance(&account))
    }

    fn decimals(&self) -> Result<u8, CustodyError> {
        self.decimals
            .ok_or_else(|| CustodyError::Unavailable("decimals() not implemented".to_string()))
    }
}

//! # Driving Ports (API - Inbound)
//!
//! The public API of the registry. Every mutating call is one serialized,
//! all-or-nothing transition: it either commits completely or returns an
//! error with no observable effect.
//!
//! `caller` is the authenticated identity submitting the call. Whatever
//! transport sits in front of the registry is responsible for it.

use crate::domain::ledger::BalanceRecord;
use crate::domain::roles::RoleId;
use crate::domain::sessions::Session;
use crate::errors::RegistryError;
use registry_types::{Address, Amount, GameId, KillId, Timestamp};

/// Balance, delegation and session operations.
pub trait RegistryApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Balances
    // -------------------------------------------------------------------------

    /// Pull `amount` from `caller`'s custody and bind `signer` to `caller`.
    ///
    /// `signature` must be `signer`'s personal-sign signature over
    /// `deposit-{timestamp}-{caller}` with a fresh `timestamp`.
    fn deposit(
        &self,
        caller: Address,
        amount: Amount,
        timestamp: Timestamp,
        signer: Address,
        signature: &[u8],
    ) -> Result<(), RegistryError>;

    /// Pay `amount` of `caller`'s available balance out to `caller`.
    fn withdraw(&self, caller: Address, amount: Amount) -> Result<(), RegistryError>;

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------

    /// Stake the buy-in from `caller`'s own custody.
    fn enter_direct(&self, caller: Address, game: GameId) -> Result<(), RegistryError>;

    /// Stake the buy-in from `wallet`'s available balance.
    ///
    /// `signature` must be `wallet`'s bound signer over
    /// `request-{timestamp}-{guardian}-{caller}`. `wallet` may back only one
    /// active session at a time.
    fn enter_delegated(
        &self,
        caller: Address,
        guardian: Address,
        timestamp: Timestamp,
        wallet: Address,
        signature: &[u8],
    ) -> Result<(), RegistryError>;

    /// Settle two delegated sessions, named by the funding wallets that back
    /// them. `caller` must be their guardian.
    fn resolve(
        &self,
        caller: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError>;

    /// Settle two direct sessions of `game`. Any caller may resolve.
    fn resolve_as_guardian(
        &self,
        caller: Address,
        game: GameId,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError>;

    /// Announce an outcome. No balance effect.
    fn report(
        &self,
        caller: Address,
        guardian: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError>;

    /// Announce an outcome as a witness. No balance effect.
    fn witness_report(
        &self,
        caller: Address,
        guardian: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError>;

    /// Publish the outcome of `caller`'s own active session, once.
    fn publish(
        &self,
        caller: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError>;

    // -------------------------------------------------------------------------
    // Administration
    // -------------------------------------------------------------------------

    /// Move the beneficiary role from `caller` to `new_beneficiary`.
    fn update_beneficiary(
        &self,
        caller: Address,
        new_beneficiary: Address,
    ) -> Result<(), RegistryError>;

    /// Grant `role` to `account`. `caller` must be an admin.
    fn grant_role(&self, caller: Address, role: RoleId, account: Address)
        -> Result<(), RegistryError>;

    /// Revoke `role` from `account`. `caller` must be an admin.
    fn revoke_role(
        &self,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<(), RegistryError>;

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Committed balances of `wallet`.
    fn search_balance(&self, wallet: Address) -> BalanceRecord;

    /// `(wallet, signer)` if bound, else `(ZERO, ZERO)`.
    fn search_signer(&self, wallet: Address) -> (Address, Address);

    /// Active session of `player`.
    fn session_of(&self, player: Address) -> Option<Session>;
}

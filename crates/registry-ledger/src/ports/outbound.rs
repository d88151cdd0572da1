//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the registry depends on. Adapters implement these traits:
//! - Asset custody (an ERC-20-like token)
//! - Role storage
//! - Ledger time
//! - Event publication
//!
//! All calls are synchronous. The service invokes them while holding its
//! state lock, so an implementation must not call back into the service.

use crate::domain::roles::RoleId;
use crate::errors::CustodyError;
use crate::events::RegistryEvent;
use registry_types::{Address, Amount, Timestamp};

// =============================================================================
// ASSET CUSTODY
// =============================================================================

/// External fungible asset holding the escrowed value.
pub trait AssetCustodian: Send + Sync {
    /// Move `amount` from `from` to `to` using `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), CustodyError>;

    /// Move `amount` out of `from`'s own balance.
    fn transfer(&self, from: Address, to: Address, amount: Amount) -> Result<(), CustodyError>;

    /// Balance held by `account`.
    fn balance_of(&self, account: Address) -> Result<Amount, CustodyError>;

    /// Decimal precision of one display unit.
    fn decimals(&self) -> Result<u8, CustodyError>;
}

// =============================================================================
// ACCESS CONTROL
// =============================================================================

/// Role membership storage.
///
/// Authorization of grant/revoke callers is the service's job; this port
/// only stores membership.
pub trait AccessControl: Send + Sync {
    /// True when `account` holds `role`.
    fn has_role(&self, role: RoleId, account: Address) -> bool;

    /// Add `account` to `role`. Returns false if already a member.
    fn grant_role(&self, role: RoleId, account: Address) -> bool;

    /// Remove `account` from `role`. Returns false if not a member.
    fn revoke_role(&self, role: RoleId, account: Address) -> bool;

    /// Number of accounts holding `role`.
    fn role_member_count(&self, role: RoleId) -> usize;
}

// =============================================================================
// TIME
// =============================================================================

/// Source of ledger time.
pub trait Clock: Send + Sync {
    /// Current time in whole seconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

// =============================================================================
// EVENTS
// =============================================================================

/// Destination of committed-transition announcements.
pub trait EventSink: Send + Sync {
    /// Publish one event.
    fn publish(&self, event: RegistryEvent);
}

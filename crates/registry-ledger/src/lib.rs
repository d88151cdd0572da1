//! # Registry Ledger - Escrow and Settlement
//!
//! Holds participants' deposited value, stakes it into sessions and pays out
//! a fee split when a guardian resolves a winner/loser pair.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Balances never go negative | `domain/ledger.rs` - checked arithmetic |
//! | No partial transitions | `service.rs` - staged `LedgerTransaction`, commit last |
//! | One active session per player | `domain/sessions.rs` - `ensure_idle()` |
//! | Request signatures authorize one entry | `domain/sessions.rs` - consumed set |
//! | Settlement conserves value | `domain/settlement.rs` - residual accounting |
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): ledger, bindings, sessions, settlement,
//!   roles, freshness, config
//! - **Ports Layer** (`ports/`): `RegistryApi` inbound; asset, roles, clock
//!   and events outbound
//! - **Adapters Layer** (`adapters/`): in-memory implementations
//! - **Service** (`service.rs`): `RegistryService`, one lock over all state
//!
//! ## Balance Buckets
//!
//! | Bucket | Meaning |
//! |--------|---------|
//! | `allocated` | staked in an active session |
//! | `available` | withdrawable |
//! | `historic` | cumulative winnings |
//!
//! ## Usage Example
//!
//! ```ignore
//! use registry_ledger::prelude::*;
//!
//! registry.deposit(wallet, amount, now, signer, &deposit_sig)?;
//! registry.enter_delegated(player, guardian, now, wallet, &request_sig)?;
//! registry.resolve(guardian, KillId(1), player, rival)?;
//! registry.withdraw(wallet, registry.search_balance(wallet).available)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

/// Registry version.
pub const VERSION: &str = "v0.3.0";

/// Denominator of every fee rate.
pub const BASIS_TOTAL: u32 = 10_000;

/// Registry wired to the in-memory adapters.
pub type InMemoryRegistry = service::RegistryService<
    adapters::InMemoryAsset,
    adapters::InMemoryAccessControl,
    adapters::ManualClock,
    adapters::InMemoryEventLog,
>;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{
        InMemoryAccessControl, InMemoryAsset, InMemoryEventLog, ManualClock, SystemClock,
    };
    pub use crate::domain::{
        BalanceRecord, Bucket, EntryMode, FeeSchedule, FreshnessWindow, RegistryConfig,
        RegistryConfigBuilder, RoleId, Session, Settlement,
    };
    pub use crate::errors::{
        AddressFault, BalanceFault, CustodyError, FaultKind, ProcessFault, RegistryError,
    };
    pub use crate::events::{Outcome, RegistryEvent};
    pub use crate::ports::{AccessControl, AssetCustodian, Clock, EventSink, RegistryApi};
    pub use crate::service::{RegistryParams, RegistryPorts, RegistryService};
    pub use crate::{InMemoryRegistry, BASIS_TOTAL, VERSION};
    pub use registry_types::{Address, Amount, GameId, KillId, Timestamp};
}

//! # Domain Layer
//!
//! Pure ledger, session and settlement logic. No I/O.

pub mod bindings;
pub mod config;
pub mod freshness;
pub mod ledger;
pub mod roles;
pub mod sessions;
pub mod settlement;

pub use bindings::SignerBindings;
pub use config::{ConfigError, RegistryConfig, RegistryConfigBuilder, MIN_ASSET_DECIMALS};
pub use freshness::FreshnessWindow;
pub use ledger::{BalanceLedger, BalanceRecord, Bucket, LedgerChanges, LedgerTransaction};
pub use roles::{RoleId, BENEFICIARY_ROLE, DEFAULT_ADMIN_ROLE};
pub use sessions::{EntryMode, Session, SessionTable};
pub use settlement::{FeeSchedule, Settlement, SettlementParties};

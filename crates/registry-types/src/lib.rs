//! # Registry Types Crate
//!
//! Value objects shared across the wager registry workspace.
//!
//! ## Contents
//!
//! - **Entities** (`entities.rs`): `Address`, `Amount`, `Timestamp`, `GameId`, `KillId`
//! - **Compact Set** (`compact.rs`): dense, duplicate-free, swap-and-pop set
//!   with O(1) insert/remove/membership
//! - **Errors** (`errors.rs`): parse and set-mutation failures
//!
//! ## Design Principles
//!
//! - **No I/O**: everything here is plain data.
//! - **One Amount Type**: all balances are `U256` base units of the asset.

pub mod compact;
pub mod entities;
pub mod errors;

pub use compact::{CompactAddressSet, CompactSet};
pub use entities::*;
pub use errors::*;

//! # Ports Layer
//!
//! - **Inbound** (`inbound.rs`): the registry API
//! - **Outbound** (`outbound.rs`): asset custody, roles, clock, events

pub mod inbound;
pub mod outbound;

pub use inbound::RegistryApi;
pub use outbound::{AccessControl, AssetCustodian, Clock, EventSink};

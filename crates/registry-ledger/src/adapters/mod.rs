//! # Adapters Layer
//!
//! In-memory implementations of the outbound ports, for tests and local runs.

pub mod access_control;
pub mod asset;
pub mod clock;
pub mod event_log;

pub use access_control::InMemoryAccessControl;
pub use asset::InMemoryAsset;
pub use clock::{ManualClock, SystemClock};
pub use event_log::InMemoryEventLog;

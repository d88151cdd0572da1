//! # Type Errors
//!
//! Failures raised by the value objects in this crate.

use thiserror::Error;

/// Errors from `CompactSet` mutations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CompactSetError {
    /// `create` was called with a member that is already in the set.
    #[error("element already present")]
    AlreadyPresent,

    /// `remove` was called with an element that is not in the set.
    #[error("element not present")]
    NotPresent,
}

/// Errors from parsing textual addresses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressParseError {
    /// Input was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Input decoded to the wrong number of bytes.
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

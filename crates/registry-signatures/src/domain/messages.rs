//! # Canonical Messages
//!
//! Hyphen-delimited, lower-case message encodings signed off-chain by a
//! wallet's bound signer.
//!
//! Field order is part of the format. `request_message(g, t, p)` takes its
//! arguments as (guardian, timestamp, player) but lays the bytes out as
//! `request-{t}-{g}-{p}`. Do not "tidy" either order.

use super::ecdsa::keccak256;
use super::entities::Hash;
use registry_types::{Address, Timestamp};

/// Type tag of deposit messages.
pub const DEPOSIT_TAG: &str = "deposit";

/// Type tag of request messages.
pub const REQUEST_TAG: &str = "request";

/// EIP-191 version `0x45` prefix applied by wallets to personal messages.
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// `deposit-{timestamp}-{wallet}`
pub fn deposit_message(timestamp: Timestamp, wallet: Address) -> Vec<u8> {
    format!("{DEPOSIT_TAG}-{timestamp}-{wallet}").into_bytes()
}

/// `request-{timestamp}-{guardian}-{player}`
pub fn request_message(guardian: Address, timestamp: Timestamp, player: Address) -> Vec<u8> {
    format!("{REQUEST_TAG}-{timestamp}-{guardian}-{player}").into_bytes()
}

/// keccak256(`"\x19Ethereum Signed Message:\n" || len(message) || message`)
pub fn personal_message_hash(message: &[u8]) -> Hash {
    let length = message.len().to_string();
    let mut data =
        Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + length.len() + message.len());
    data.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    data.extend_from_slice(length.as_bytes());
    data.extend_from_slice(message);
    keccak256(&data)
}

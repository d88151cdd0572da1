//! # Registry Signature Authority
//!
//! Builds the canonical delegation messages and recovers the address that
//! signed them.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure message construction and secp256k1
//!   recovery, no I/O, no ledger state
//!
//! ## Message Formats
//!
//! | Message | Layout |
//! |---------|--------|
//! | deposit | `deposit-{timestamp}-{wallet}` |
//! | request | `request-{timestamp}-{guardian}-{player}` |
//!
//! Field order is fixed and byte-exact. Signing the fields in any other order
//! does not raise an error: it recovers a different address, which the caller
//! then fails to match against the bound signer.
//!
//! ## Security Notes
//!
//! - Messages are hashed with the EIP-191 personal-message prefix, matching
//!   what wallets produce for `personal_sign`
//! - **Malleability Prevention (EIP-2)**: signatures with high S are rejected
//! - Recovery says nothing about authorization. Matching the recovered
//!   address and checking timestamp freshness is the ledger's job.

pub mod domain;

// Re-export public API
pub use domain::ecdsa::{address_from_pubkey, keccak256, recover_address, recover_signer, EcdsaAuthority};
pub use domain::entities::{Hash, RecoverableSignature};
pub use domain::errors::SignatureError;
pub use domain::messages::{deposit_message, personal_message_hash, request_message};

#[cfg(any(test, feature = "test-utils"))]
pub use domain::ecdsa::test_helpers;

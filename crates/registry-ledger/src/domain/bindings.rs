//! # Signer Bindings
//!
//! `wallet -> signer`: the key allowed to authorize delegated entries funded
//! by `wallet`. Set by every successful deposit. Rebinding replaces the
//! previous signer, so an older signer's unused requests stop verifying.

use registry_types::Address;
use std::collections::HashMap;

/// Wallet to signer map.
#[derive(Debug, Clone, Default)]
pub struct SignerBindings {
    signers: HashMap<Address, Address>,
}

impl SignerBindings {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `wallet` to `signer`, returning the replaced signer if any.
    pub fn bind(&mut self, wallet: Address, signer: Address) -> Option<Address> {
        self.signers.insert(wallet, signer)
    }

    /// Signer bound to `wallet`.
    pub fn signer_of(&self, wallet: &Address) -> Option<Address> {
        self.signers.get(wallet).copied()
    }

    /// `(wallet, signer)` if bound, else `(ZERO, ZERO)`.
    pub fn search(&self, wallet: &Address) -> (Address, Address) {
        match self.signer_of(wallet) {
            Some(signer) => (*wallet, signer),
            None => (Address::ZERO, Address::ZERO),
        }
    }
}

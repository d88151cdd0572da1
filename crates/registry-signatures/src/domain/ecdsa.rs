//! # Signer Recovery (secp256k1)
//!
//! Recovers the Ethereum-style address that produced a personal-message
//! signature.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN SECP256K1_HALF_ORDER
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Operations**: Uses `subtle` for scalar comparisons
//! - Uses k256 crate for cryptographic operations

use super::entities::{Hash, RecoverableSignature};
use super::errors::SignatureError;
use super::messages::{deposit_message, personal_message_hash, request_message};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use registry_types::{Address, Timestamp};
use sha3::{Digest, Keccak256};
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;

/// Group order `n`, big-endian. Valid `r`/`s` scalars lie in `[1, n)`.
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// `floor(n / 2)`. Accepted `s` values stay strictly below it.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// SIGNATURE AUTHORITY
// =============================================================================

/// Stateless facade over message construction and signer recovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaAuthority;

impl EcdsaAuthority {
    /// Create a new authority.
    pub fn new() -> Self {
        Self
    }

    /// `deposit-{timestamp}-{wallet}`
    pub fn deposit_message(&self, timestamp: Timestamp, wallet: Address) -> Vec<u8> {
        deposit_message(timestamp, wallet)
    }

    /// `request-{timestamp}-{guardian}-{player}`
    pub fn request_message(
        &self,
        guardian: Address,
        timestamp: Timestamp,
        player: Address,
    ) -> Vec<u8> {
        request_message(guardian, timestamp, player)
    }

    /// Recover the address that personal-signed `message`.
    pub fn recover_signer(
        &self,
        message: &[u8],
        signature: &[u8],
    ) -> Result<Address, SignatureError> {
        recover_signer(message, signature)
    }
}

// =============================================================================
// CORE RECOVERY FUNCTIONS
// =============================================================================

/// Recover the address that personal-signed `message` with a 65-byte
/// `r || s || v` signature.
///
/// Pure. A well-formed signature over a different message (or over the same
/// fields in a different order) recovers some other address without error.
pub fn recover_signer(message: &[u8], signature: &[u8]) -> Result<Address, SignatureError> {
    let signature = RecoverableSignature::from_bytes(signature)?;
    let digest = personal_message_hash(message);
    let signer = recover_address(&digest, &signature)?;
    debug!(%signer, message_len = message.len(), "recovered signer");
    Ok(signer)
}

/// Recover the signer address from a prehashed message.
///
/// Security validations performed:
/// 1. R and S are in valid range [1, n-1] per SEC1 standard
/// 2. S is in lower half per EIP-2 malleability protection
/// 3. Recovery ID (v) is valid (0, 1, 27, or 28)
/// 4. Public key recovery succeeds
pub fn recover_address(
    message_hash: &Hash,
    signature: &RecoverableSignature,
) -> Result<Address, SignatureError> {
    use zeroize::Zeroize;

    if !is_valid_scalar(&signature.r) || !is_valid_scalar(&signature.s) {
        return Err(SignatureError::InvalidFormat);
    }

    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalleableSignature);
    }

    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| SignatureError::InvalidFormat)?;

    let recovered_key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered_key))
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Derive the Ethereum address of a public key: the last 20 bytes of
/// keccak256 over the uncompressed point without its `0x04` prefix.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::new(address)
}

/// Constant-time big-endian `a < b`.
fn ct_less_than(a: &[u8; 32], b: &[u8; 32]) -> Choice {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        less |= not_decided & Choice::from((a[i] < b[i]) as u8);
        greater |= not_decided & Choice::from((a[i] > b[i]) as u8);
    }

    less
}

/// Check if S value is in lower half of curve order (EIP-2 malleability protection).
fn is_low_s(s: &[u8; 32]) -> bool {
    ct_less_than(s, &SECP256K1_HALF_ORDER).into()
}

/// Check if a scalar value is in valid range [1, n-1] for ECDSA.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for &byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    (!is_zero & ct_less_than(scalar, &SECP256K1_ORDER)).into()
}

/// Wallets emit the y-parity either raw (`0`/`1`) or offset by 27.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let parity = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };
    RecoveryId::from_byte(parity).ok_or(SignatureError::InvalidRecoveryId(v))
}

/// Mirror `s` across the group order, giving `n - s`.
///
/// `(r, s)` and `(r, n - s)` verify for the same key with opposite parity,
/// so this turns a signer's high-S output into the canonical low-S form
/// (and back, when a test needs a malleable copy).
#[cfg(any(test, feature = "test-utils"))]
fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut mirrored = [0u8; 32];
    let mut borrow = false;
    for ((out, &n), &x) in mirrored.iter_mut().zip(&SECP256K1_ORDER).zip(s).rev() {
        let (diff, under) = n.overflowing_sub(x);
        let (diff, under_borrow) = diff.overflowing_sub(u8::from(borrow));
        *out = diff;
        borrow = under || under_borrow;
    }
    mirrored
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Key generation and wallet-compatible signing for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers {
    use super::*;
    use k256::ecdsa::SigningKey;

    /// Generate a random keypair.
    pub fn generate_keypair() -> (SigningKey, Address) {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let address = address_from_pubkey(signing_key.verifying_key());
        (signing_key, address)
    }

    /// Deterministic keypair whose secret scalar is `[seed; 32]`.
    ///
    /// # Panics
    ///
    /// Panics when `seed == 0` (zero is not a valid secret scalar).
    pub fn keypair_from_seed(seed: u8) -> (SigningKey, Address) {
        let signing_key = SigningKey::from_slice(&[seed; 32]).expect("seed must be non-zero");
        let address = address_from_pubkey(signing_key.verifying_key());
        (signing_key, address)
    }

    /// Sign a prehashed message, normalized to low S with `v` in {27, 28}.
    pub fn sign_prehash(message_hash: &Hash, private_key: &SigningKey) -> RecoverableSignature {
        let (sig, recid) = private_key
            .sign_prehash_recoverable(message_hash)
            .expect("signing failed");

        let sig_bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        let (s, v) = if is_low_s(&s) {
            (s, recid.to_byte() + 27)
        } else {
            // Inverting S flips the parity of the recovered point.
            (invert_s(&s), if recid.to_byte() == 0 { 28 } else { 27 })
        };

        RecoverableSignature { r, s, v }
    }

    /// What a wallet's `personal_sign(message)` returns.
    pub fn sign_message(message: &[u8], private_key: &SigningKey) -> Vec<u8> {
        sign_prehash(&personal_message_hash(message), private_key)
            .to_bytes()
            .to_vec()
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================

//! # Error Types
//!
//! Every registry operation fails with a [`RegistryError`]. The variant says
//! which precondition class was violated; the inner fault says why.
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `Address` | wrong identity: zero address, bad signer, missing role |
//! | `Process` | wrong lifecycle state or stale/reused authorization |
//! | `Balance` | invalid financial parameters at construction |
//! | `Arithmetic` | overflow or underflow, i.e. insufficient funds |
//! | `Custody` | the asset collaborator refused a transfer |

use registry_signatures::SignatureError;
use registry_types::{Address, Amount, Timestamp};
use thiserror::Error;

// =============================================================================
// FAULT KIND
// =============================================================================

/// Coarse classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Identity precondition failed.
    Address,
    /// Lifecycle precondition failed.
    Process,
    /// Financial parameter precondition failed.
    Balance,
    /// Unsigned arithmetic overflowed or underflowed.
    Arithmetic,
    /// The asset collaborator failed.
    Custody,
}

// =============================================================================
// REGISTRY ERROR
// =============================================================================

/// Error returned by every registry transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Identity precondition failed.
    #[error("address fault: {0}")]
    Address(#[from] AddressFault),

    /// Lifecycle precondition failed.
    #[error("process fault: {0}")]
    Process(#[from] ProcessFault),

    /// Financial parameter precondition failed.
    #[error("balance fault: {0}")]
    Balance(#[from] BalanceFault),

    /// Unsigned arithmetic overflowed or underflowed.
    #[error("arithmetic overflow or underflow")]
    Arithmetic,

    /// The asset collaborator failed.
    #[error("custody fault: {0}")]
    Custody(#[from] CustodyError),
}

impl RegistryError {
    /// Coarse classification of this error.
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Address(_) => FaultKind::Address,
            Self::Process(_) => FaultKind::Process,
            Self::Balance(_) => FaultKind::Balance,
            Self::Arithmetic => FaultKind::Arithmetic,
            Self::Custody(_) => FaultKind::Custody,
        }
    }
}

impl From<SignatureError> for RegistryError {
    fn from(err: SignatureError) -> Self {
        Self::Address(AddressFault::InvalidSignature(err))
    }
}

// =============================================================================
// FAULT REASONS
// =============================================================================

/// Why an identity precondition failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressFault {
    /// A required address was zero.
    #[error("zero address not allowed")]
    ZeroAddress,

    /// The signature recovered to someone other than the expected signer.
    #[error("signature recovered {recovered}, expected {expected}")]
    SignerMismatch {
        /// Signer the ledger expected.
        expected: Address,
        /// Signer the signature actually recovers to.
        recovered: Address,
    },

    /// The funding wallet has never bound a signer.
    #[error("wallet {0} has no bound signer")]
    UnboundWallet(Address),

    /// The funding wallet already backs an active session.
    #[error("wallet {0} already backs an active session")]
    WalletStaked(Address),

    /// The signature could not be parsed or recovered.
    #[error("invalid signature: {0}")]
    InvalidSignature(SignatureError),

    /// Caller is not the guardian of record for a session.
    #[error("{caller} is not the guardian of record")]
    NotGuardian {
        /// Offending caller.
        caller: Address,
    },

    /// Caller lacks a role required for the operation.
    #[error("{caller} lacks role {role}")]
    MissingRole {
        /// Offending caller.
        caller: Address,
        /// Human-readable role name.
        role: &'static str,
    },

    /// The new beneficiary equals the current one.
    #[error("{0} is already the beneficiary")]
    SameBeneficiary(Address),
}

/// Why a lifecycle precondition failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessFault {
    /// The player already has an active session.
    #[error("{0} already has an active session")]
    AlreadyActive(Address),

    /// No active session is held by, or funded from, the address.
    #[error("{0} has no active session")]
    NotActive(Address),

    /// The session was entered the other way (direct vs delegated).
    #[error("session of {0} was not entered this way")]
    WrongEntry(Address),

    /// Directly entered sessions belong to different games.
    #[error("session of {player} is not in {game}")]
    GameMismatch {
        /// Player whose session did not match.
        player: Address,
        /// Game being resolved.
        game: registry_types::GameId,
    },

    /// Winner and loser are the same player.
    #[error("winner and loser must differ")]
    SamePlayer,

    /// Timestamp is older than the freshness window allows.
    #[error("timestamp {timestamp} is stale at {now}")]
    StaleTimestamp {
        /// Signed timestamp.
        timestamp: Timestamp,
        /// Ledger time at validation.
        now: Timestamp,
    },

    /// Timestamp is further in the future than the freshness window allows.
    #[error("timestamp {timestamp} is ahead of {now}")]
    FutureTimestamp {
        /// Signed timestamp.
        timestamp: Timestamp,
        /// Ledger time at validation.
        now: Timestamp,
    },

    /// The request signature already authorized an entry.
    #[error("request signature already consumed")]
    SignatureConsumed,

    /// The session already published its outcome.
    #[error("{0} already published for this session")]
    AlreadyPublished(Address),
}

/// Why a financial parameter is invalid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BalanceFault {
    /// Buy-in must be positive.
    #[error("buy-in must be non-zero")]
    ZeroBuyin,

    /// Owner plus guardian fee exceed the basis total.
    #[error("fees total {total} bps, exceeding {max}")]
    FeesExceedBasis {
        /// Sum of configured fees.
        total: u32,
        /// Basis total.
        max: u32,
    },

    /// The asset is not precise enough.
    #[error("asset has {decimals} decimals, minimum is {min}")]
    InsufficientDecimals {
        /// Decimals reported by the asset.
        decimals: u8,
        /// Configured minimum.
        min: u8,
    },
}

/// Failure reported by an [`AssetCustodian`](crate::ports::outbound::AssetCustodian).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustodyError {
    /// Source account holds less than the transfer amount.
    #[error("{account} holds {available}, needs {required}")]
    InsufficientBalance {
        /// Source account.
        account: Address,
        /// Amount held.
        available: Amount,
        /// Amount requested.
        required: Amount,
    },

    /// Spender is approved for less than the transfer amount.
    #[error("allowance {allowance} of {spender} over {owner} below {required}")]
    InsufficientAllowance {
        /// Token owner.
        owner: Address,
        /// Approved spender.
        spender: Address,
        /// Remaining allowance.
        allowance: Amount,
        /// Amount requested.
        required: Amount,
    },

    /// Receiving balance would overflow.
    #[error("balance overflow")]
    Overflow,

    /// The asset could not be reached or does not implement the call.
    #[error("asset unavailable: {0}")]
    Unavailable(String),
}

//! # Session Table
//!
//! Per player: `Idle -> Active -> Idle`. A player is Active iff a
//! [`Session`] is stored for them. The active roster is kept in a
//! [`CompactAddressSet`] so it can be enumerated in O(n) and tested in O(1).
//!
//! A funding wallet backs at most one active session. Delegated sessions are
//! resolved by naming their funding wallets, so the table also indexes each
//! session by the wallet it is staked from.
//!
//! The table also remembers which request signatures have already
//! authorized an entry. A request signature is good for exactly one entry.

use crate::errors::ProcessFault;
use registry_signatures::Hash;
use registry_types::{Address, Amount, CompactAddressSet, GameId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How a session was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryMode {
    /// Player staked from their own custody for `game`.
    Direct {
        /// Game the player entered.
        game: GameId,
    },
    /// A wallet's signer authorized the stake, naming a guardian.
    Delegated {
        /// Guardian of record.
        guardian: Address,
    },
}

/// An active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Player holding the session.
    pub player: Address,
    /// Wallet whose balance backs the stake. The player for direct entry.
    pub funding_wallet: Address,
    /// How the session was entered.
    pub mode: EntryMode,
    /// Stake allocated at entry.
    pub stake: Amount,
    /// Whether the player has published an outcome.
    pub published: bool,
}

impl Session {
    /// Guardian of record, `None` for direct sessions.
    pub fn guardian(&self) -> Option<Address> {
        match self.mode {
            EntryMode::Delegated { guardian } => Some(guardian),
            EntryMode::Direct { .. } => None,
        }
    }

    /// Game entered, `None` for delegated sessions.
    pub fn game(&self) -> Option<GameId> {
        match self.mode {
            EntryMode::Direct { game } => Some(game),
            EntryMode::Delegated { .. } => None,
        }
    }
}

/// Active sessions and consumed request signatures.
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    sessions: HashMap<Address, Session>,
    /// funding wallet -> player
    backing: HashMap<Address, Address>,
    roster: CompactAddressSet,
    consumed: HashSet<Hash>,
}

impl SessionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `player` holds an active session.
    pub fn is_active(&self, player: &Address) -> bool {
        self.roster.exists(player)
    }

    /// Active session of `player`.
    pub fn get(&self, player: &Address) -> Option<&Session> {
        self.sessions.get(player)
    }

    /// `Process` fault if `player` already holds a session.
    pub fn ensure_idle(&self, player: &Address) -> Result<(), ProcessFault> {
        if self.is_active(player) {
            return Err(ProcessFault::AlreadyActive(*player));
        }
        Ok(())
    }

    /// Active session of `player`, or a `Process` fault.
    pub fn require_active(&self, player: &Address) -> Result<&Session, ProcessFault> {
        self.sessions
            .get(player)
            .ok_or(ProcessFault::NotActive(*player))
    }

    /// True when `wallet` funds an active session.
    pub fn is_staked(&self, wallet: &Address) -> bool {
        self.backing.contains_key(wallet)
    }

    /// Active session funded from `wallet`, or a `Process` fault.
    pub fn require_backed_by(&self, wallet: &Address) -> Result<&Session, ProcessFault> {
        self.backing
            .get(wallet)
            .and_then(|player| self.sessions.get(player))
            .ok_or(ProcessFault::NotActive(*wallet))
    }

    /// Store a new session. Callers check [`ensure_idle`](Self::ensure_idle)
    /// and [`is_staked`](Self::is_staked) under the same lock first; a session
    /// colliding with either is dropped and the table is left untouched.
    pub fn open(&mut self, session: Session) {
        let player = session.player;
        let wallet = session.funding_wallet;
        if self.is_staked(&wallet) || self.roster.create(player).is_err() {
            return;
        }
        self.backing.insert(wallet, player);
        self.sessions.insert(player, session);
    }

    /// Return `player` to Idle.
    pub fn close(&mut self, player: &Address) -> Option<Session> {
        let session = self.sessions.remove(player)?;
        self.backing.remove(&session.funding_wallet);
        // Roster mirrors the session map.
        let _ = self.roster.remove(*player);
        Some(session)
    }

    /// Flag the session of `player` as published.
    pub fn mark_published(&mut self, player: &Address) -> Result<(), ProcessFault> {
        let session = self
            .sessions
            .get_mut(player)
            .ok_or(ProcessFault::NotActive(*player))?;
        if session.published {
            return Err(ProcessFault::AlreadyPublished(*player));
        }
        session.published = true;
        Ok(())
    }

    /// True when `digest` already authorized an entry.
    pub fn is_consumed(&self, digest: &Hash) -> bool {
        self.consumed.contains(digest)
    }

    /// Remember `digest` as used.
    pub fn consume(&mut self, digest: Hash) {
        self.consumed.insert(digest);
    }

    /// Snapshot of active players. Order is unspecified.
    pub fn active_players(&self) -> Vec<Address> {
        self.roster.to_vec()
    }

    /// Number of active sessions.
    pub fn active_count(&self) -> usize {
        self.roster.length()
    }
}

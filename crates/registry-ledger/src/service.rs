//! # Registry Service
//!
//! Owns the ledger, signer bindings, session table and beneficiary behind a
//! single lock, and drives the injected collaborators.
//!
//! ## Transition shape
//!
//! Every mutating call follows the same order under the lock:
//!
//! 1. check identity and lifecycle preconditions
//! 2. stage balance changes in a `LedgerTransaction`
//! 3. call the asset custodian, if value crosses the registry boundary
//! 4. commit the ledger, then update bindings/sessions (infallible)
//! 5. publish the event
//!
//! A failure in steps 1-3 returns before anything is committed.

use crate::domain::bindings::SignerBindings;
use crate::domain::config::RegistryConfig;
use crate::domain::ledger::{BalanceLedger, BalanceRecord, Bucket};
use crate::domain::roles::{RoleId, BENEFICIARY_ROLE, DEFAULT_ADMIN_ROLE};
use crate::domain::sessions::{EntryMode, Session, SessionTable};
use crate::domain::settlement::{Settlement, SettlementParties};
use crate::errors::{AddressFault, BalanceFault, ProcessFault, RegistryError};
use crate::events::{Outcome, RegistryEvent};
use crate::ports::inbound::RegistryApi;
use crate::ports::outbound::{AccessControl, AssetCustodian, Clock, EventSink};

use parking_lot::Mutex;
use registry_signatures::{keccak256, EcdsaAuthority, Hash, RecoverableSignature};
use registry_types::{Address, Amount, GameId, KillId, Timestamp};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Addresses fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryParams {
    /// Initial admin and beneficiary.
    pub owner: Address,
    /// Address of the escrowed asset.
    pub asset: Address,
    /// The registry's own account at the asset.
    pub escrow: Address,
}

/// Injected collaborators.
pub struct RegistryPorts<A, R, C, E> {
    /// Asset custody.
    pub asset: Arc<A>,
    /// Role storage.
    pub roles: Arc<R>,
    /// Ledger time.
    pub clock: Arc<C>,
    /// Event destination.
    pub events: Arc<E>,
}

#[derive(Debug)]
struct RegistryState {
    ledger: BalanceLedger,
    bindings: SignerBindings,
    sessions: SessionTable,
    beneficiary: Address,
}

/// The wager registry.
#[derive(Debug)]
pub struct RegistryService<A, R, C, E>
where
    A: AssetCustodian,
    R: AccessControl,
    C: Clock,
    E: EventSink,
{
    config: RegistryConfig,
    params: RegistryParams,
    settlement: Settlement,
    authority: EcdsaAuthority,
    asset: Arc<A>,
    roles: Arc<R>,
    clock: Arc<C>,
    events: Arc<E>,
    state: Mutex<RegistryState>,
}

fn rejected<T>(
    operation: &'static str,
    result: Result<T, RegistryError>,
) -> Result<T, RegistryError> {
    if let Err(err) = &result {
        warn!(operation, kind = ?err.kind(), error = %err, "transition rejected");
    }
    result
}

fn non_zero(address: Address) -> Result<Address, RegistryError> {
    if address.is_zero() {
        return Err(AddressFault::ZeroAddress.into());
    }
    Ok(address)
}

/// Replay key of a request signature: `keccak256(r || s)`.
///
/// `v` is left out so the 0/1 and 27/28 spellings of one signature share a
/// key. High-S twins are already rejected by recovery.
fn replay_key(signature: &[u8]) -> Result<Hash, RegistryError> {
    let parsed = RecoverableSignature::from_bytes(signature)?;
    Ok(keccak256(&parsed.to_bytes()[..64]))
}

impl<A, R, C, E> RegistryService<A, R, C, E>
where
    A: AssetCustodian,
    R: AccessControl,
    C: Clock,
    E: EventSink,
{
    /// Create a registry.
    ///
    /// Grants `owner` the admin and beneficiary roles and makes it the
    /// beneficiary.
    ///
    /// # Errors
    ///
    /// - `Address` if owner, asset or escrow is zero
    /// - `Balance` if the config is invalid or the asset reports fewer than
    ///   `min_asset_decimals`
    /// - `Custody` if the asset cannot report its decimals
    pub fn new(
        params: RegistryParams,
        config: RegistryConfig,
        ports: RegistryPorts<A, R, C, E>,
    ) -> Result<Self, RegistryError> {
        non_zero(params.owner)?;
        non_zero(params.asset)?;
        non_zero(params.escrow)?;
        config.validate()?;

        let decimals = ports.asset.decimals()?;
        if decimals < config.min_asset_decimals {
            return Err(BalanceFault::InsufficientDecimals {
                decimals,
                min: config.min_asset_decimals,
            }
            .into());
        }

        let settlement = Settlement::compute(&config.fee_schedule())?;

        ports.roles.grant_role(RoleId::DEFAULT_ADMIN, params.owner);
        ports.roles.grant_role(RoleId::beneficiary(), params.owner);

        info!(
            owner = %params.owner,
            asset = %params.asset,
            buyin = %config.buyin,
            owner_fee_bps = config.owner_fee_bps,
            guardian_fee_bps = config.guardian_fee_bps,
            "registry created"
        );

        Ok(Self {
            settlement,
            authority: EcdsaAuthority::new(),
            asset: ports.asset,
            roles: ports.roles,
            clock: ports.clock,
            events: ports.events,
            state: Mutex::new(RegistryState {
                ledger: BalanceLedger::new(),
                bindings: SignerBindings::new(),
                sessions: SessionTable::new(),
                beneficiary: params.owner,
            }),
            config,
            params,
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Construction addresses.
    pub fn params(&self) -> RegistryParams {
        self.params
    }

    /// Stake each participant allocates.
    pub fn buyin(&self) -> Amount {
        self.config.buyin
    }

    /// Beneficiary fee in basis points.
    pub fn owner_fee_bps(&self) -> u16 {
        self.config.owner_fee_bps
    }

    /// Guardian fee in basis points.
    pub fn guardian_fee_bps(&self) -> u16 {
        self.config.guardian_fee_bps
    }

    /// Current beneficiary of owner fees.
    pub fn beneficiary(&self) -> Address {
        self.state.lock().beneficiary
    }

    /// Base units lost to halving odd pots.
    pub fn rounding_residual(&self) -> Amount {
        self.state.lock().ledger.rounding_residual()
    }

    /// Sum of escrowed balances plus the rounding residual.
    pub fn total_escrowed(&self) -> Option<Amount> {
        self.state.lock().ledger.total_escrowed()
    }

    /// True when `player` holds an active session.
    pub fn is_active(&self, player: Address) -> bool {
        self.state.lock().sessions.is_active(&player)
    }

    /// Snapshot of active players. Order is unspecified.
    pub fn active_players(&self) -> Vec<Address> {
        self.state.lock().sessions.active_players()
    }

    /// True when `account` holds `role`.
    pub fn has_role(&self, role: RoleId, account: Address) -> bool {
        self.roles.has_role(role, account)
    }

    /// Number of accounts holding `role`.
    pub fn role_member_count(&self, role: RoleId) -> usize {
        self.roles.role_member_count(role)
    }

    /// `deposit-{timestamp}-{wallet}`
    pub fn deposit_message(&self, timestamp: Timestamp, wallet: Address) -> Vec<u8> {
        self.authority.deposit_message(timestamp, wallet)
    }

    /// `request-{timestamp}-{guardian}-{player}`
    pub fn request_message(
        &self,
        guardian: Address,
        timestamp: Timestamp,
        player: Address,
    ) -> Vec<u8> {
        self.authority.request_message(guardian, timestamp, player)
    }

    /// Address that personal-signed `message`.
    pub fn recover_signer(
        &self,
        message: &[u8],
        signature: &[u8],
    ) -> Result<Address, RegistryError> {
        Ok(self.authority.recover_signer(message, signature)?)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn check_fresh(&self, timestamp: Timestamp) -> Result<(), RegistryError> {
        let now = self.clock.now();
        self.config.freshness.check(timestamp, now)?;
        Ok(())
    }

    fn expect_signer(
        &self,
        message: &[u8],
        signature: &[u8],
        expected: Address,
    ) -> Result<(), RegistryError> {
        let recovered = self.authority.recover_signer(message, signature)?;
        if recovered != expected {
            return Err(AddressFault::SignerMismatch {
                expected,
                recovered,
            }
            .into());
        }
        Ok(())
    }

    fn require_role(
        &self,
        caller: Address,
        role: RoleId,
        name: &'static str,
    ) -> Result<(), RegistryError> {
        if !self.roles.has_role(role, caller) {
            return Err(AddressFault::MissingRole { caller, role: name }.into());
        }
        Ok(())
    }

    /// Stage, commit and close a winner/loser pair. Sessions must already be
    /// validated as Active.
    fn settle(
        &self,
        state: &mut RegistryState,
        guardian: Address,
        winner: &Session,
        loser: &Session,
    ) -> Result<(), RegistryError> {
        let parties = SettlementParties {
            beneficiary: state.beneficiary,
            guardian,
            winner_wallet: winner.funding_wallet,
            loser_wallet: loser.funding_wallet,
        };

        let mut tx = state.ledger.begin();
        self.settlement.apply(&mut tx, &parties)?;
        let changes = tx.into_changes();

        state.ledger.commit(changes);
        state.sessions.close(&winner.player);
        state.sessions.close(&loser.player);
        Ok(())
    }

    fn resolve_pair(
        &self,
        caller: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError> {
        if winner == loser {
            return Err(ProcessFault::SamePlayer.into());
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let won = state.sessions.require_backed_by(&winner)?.clone();
        let lost = state.sessions.require_backed_by(&loser)?.clone();
        for session in [&won, &lost] {
            match session.guardian() {
                None => return Err(ProcessFault::WrongEntry(session.player).into()),
                Some(guardian) if guardian != caller => {
                    return Err(AddressFault::NotGuardian { caller }.into())
                }
                Some(_) => {}
            }
        }

        self.settle(state, caller, &won, &lost)?;

        info!(
            guardian = %caller,
            %kill,
            %winner,
            %loser,
            winning_player = %won.player,
            losing_player = %lost.player,
            winnings = %self.settlement.half,
            "resolved"
        );
        self.events.publish(RegistryEvent::Resolve {
            outcome: Outcome {
                guardian: caller,
                kill,
                winner,
                loser,
            },
            winnings: self.settlement.half,
            forfeited: self.settlement.forfeited,
        });
        Ok(())
    }

    fn resolve_game(
        &self,
        caller: Address,
        game: GameId,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError> {
        non_zero(caller)?;
        if winner == loser {
            return Err(ProcessFault::SamePlayer.into());
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let won = state.sessions.require_active(&winner)?.clone();
        let lost = state.sessions.require_active(&loser)?.clone();
        for session in [&won, &lost] {
            match session.game() {
                None => return Err(ProcessFault::WrongEntry(session.player).into()),
                Some(entered) if entered != game => {
                    return Err(ProcessFault::GameMismatch {
                        player: session.player,
                        game,
                    }
                    .into())
                }
                Some(_) => {}
            }
        }

        self.settle(state, caller, &won, &lost)?;

        info!(guardian = %caller, %game, %kill, %winner, %loser, "game resolved");
        self.events.publish(RegistryEvent::Guardian {
            game,
            outcome: Outcome {
                guardian: caller,
                kill,
                winner,
                loser,
            },
            winnings: self.settlement.half,
            forfeited: self.settlement.forfeited,
        });
        Ok(())
    }

    fn do_deposit(
        &self,
        caller: Address,
        amount: Amount,
        timestamp: Timestamp,
        signer: Address,
        signature: &[u8],
    ) -> Result<(), RegistryError> {
        non_zero(caller)?;
        non_zero(signer)?;
        self.check_fresh(timestamp)?;
        let message = self.authority.deposit_message(timestamp, caller);
        self.expect_signer(&message, signature, signer)?;

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let mut tx = state.ledger.begin();
        tx.credit(caller, amount, Bucket::Available)?;
        let changes = tx.into_changes();

        self.asset
            .transfer_from(self.params.escrow, caller, self.params.escrow, amount)?;

        state.ledger.commit(changes);
        if let Some(previous) = state.bindings.bind(caller, signer) {
            if previous != signer {
                debug!(wallet = %caller, %previous, %signer, "signer rebound");
            }
        }

        info!(wallet = %caller, %signer, %amount, "deposit");
        self.events.publish(RegistryEvent::Deposit {
            wallet: caller,
            signer,
            amount,
            timestamp,
        });
        Ok(())
    }

    fn do_withdraw(&self, caller: Address, amount: Amount) -> Result<(), RegistryError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let mut tx = state.ledger.begin();
        tx.debit(caller, amount, Bucket::Available)?;
        let changes = tx.into_changes();

        self.asset.transfer(self.params.escrow, caller, amount)?;
        state.ledger.commit(changes);

        info!(wallet = %caller, %amount, "withdraw");
        self.events.publish(RegistryEvent::Withdraw {
            wallet: caller,
            amount,
        });
        Ok(())
    }

    fn do_enter_direct(&self, caller: Address, game: GameId) -> Result<(), RegistryError> {
        non_zero(caller)?;
        let stake = self.config.buyin;

        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.sessions.ensure_idle(&caller)?;
        if state.sessions.is_staked(&caller) {
            return Err(AddressFault::WalletStaked(caller).into());
        }

        let mut tx = state.ledger.begin();
        tx.credit(caller, stake, Bucket::Allocated)?;
        let changes = tx.into_changes();

        self.asset
            .transfer_from(self.params.escrow, caller, self.params.escrow, stake)?;

        state.ledger.commit(changes);
        state.sessions.open(Session {
            player: caller,
            funding_wallet: caller,
            mode: EntryMode::Direct { game },
            stake,
            published: false,
        });

        info!(player = %caller, %game, %stake, "entered");
        self.events.publish(RegistryEvent::Enter {
            player: caller,
            game,
            stake,
        });
        Ok(())
    }

    fn do_enter_delegated(
        &self,
        caller: Address,
        guardian: Address,
        timestamp: Timestamp,
        wallet: Address,
        signature: &[u8],
    ) -> Result<(), RegistryError> {
        non_zero(caller)?;
        let stake = self.config.buyin;

        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.sessions.ensure_idle(&caller)?;

        non_zero(guardian)?;
        non_zero(wallet)?;
        if state.sessions.is_staked(&wallet) {
            return Err(AddressFault::WalletStaked(wallet).into());
        }
        self.check_fresh(timestamp)?;

        let signer = state
            .bindings
            .signer_of(&wallet)
            .ok_or(AddressFault::UnboundWallet(wallet))?;
        let message = self.authority.request_message(guardian, timestamp, caller);
        self.expect_signer(&message, signature, signer)?;

        let key = replay_key(signature)?;
        if state.sessions.is_consumed(&key) {
            return Err(ProcessFault::SignatureConsumed.into());
        }

        let mut tx = state.ledger.begin();
        tx.allocate(wallet, stake)?;
        let changes = tx.into_changes();

        state.ledger.commit(changes);
        state.sessions.consume(key);
        state.sessions.open(Session {
            player: caller,
            funding_wallet: wallet,
            mode: EntryMode::Delegated { guardian },
            stake,
            published: false,
        });

        info!(player = %caller, %guardian, %wallet, %stake, "entered by request");
        self.events.publish(RegistryEvent::Request {
            player: caller,
            guardian,
            wallet,
            timestamp,
            stake,
        });
        Ok(())
    }

    fn do_publish(
        &self,
        caller: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        state.sessions.mark_published(&caller)?;
        let guardian = state
            .sessions
            .get(&caller)
            .and_then(Session::guardian)
            .unwrap_or(Address::ZERO);

        debug!(player = %caller, %guardian, %kill, "outcome published");
        self.events.publish(RegistryEvent::WitnessPublish {
            player: caller,
            outcome: Outcome {
                guardian,
                kill,
                winner,
                loser,
            },
        });
        Ok(())
    }

    fn do_update_beneficiary(
        &self,
        caller: Address,
        new_beneficiary: Address,
    ) -> Result<(), RegistryError> {
        let role = RoleId::beneficiary();
        self.require_role(caller, role, BENEFICIARY_ROLE)?;
        non_zero(new_beneficiary)?;

        let mut state = self.state.lock();
        let previous = state.beneficiary;
        if new_beneficiary == previous {
            return Err(AddressFault::SameBeneficiary(previous).into());
        }

        self.roles.revoke_role(role, previous);
        self.roles.revoke_role(role, caller);
        self.roles.grant_role(role, new_beneficiary);
        state.beneficiary = new_beneficiary;

        info!(%previous, current = %new_beneficiary, "beneficiary updated");
        self.events.publish(RegistryEvent::UpdateBeneficiary {
            previous,
            current: new_beneficiary,
        });
        Ok(())
    }
}

impl<A, R, C, E> RegistryApi for RegistryService<A, R, C, E>
where
    A: AssetCustodian,
    R: AccessControl,
    C: Clock,
    E: EventSink,
{
    fn deposit(
        &self,
        caller: Address,
        amount: Amount,
        timestamp: Timestamp,
        signer: Address,
        signature: &[u8],
    ) -> Result<(), RegistryError> {
        rejected(
            "deposit",
            self.do_deposit(caller, amount, timestamp, signer, signature),
        )
    }

    fn withdraw(&self, caller: Address, amount: Amount) -> Result<(), RegistryError> {
        rejected("withdraw", self.do_withdraw(caller, amount))
    }

    fn enter_direct(&self, caller: Address, game: GameId) -> Result<(), RegistryError> {
        rejected("enter_direct", self.do_enter_direct(caller, game))
    }

    fn enter_delegated(
        &self,
        caller: Address,
        guardian: Address,
        timestamp: Timestamp,
        wallet: Address,
        signature: &[u8],
    ) -> Result<(), RegistryError> {
        rejected(
            "enter_delegated",
            self.do_enter_delegated(caller, guardian, timestamp, wallet, signature),
        )
    }

    fn resolve(
        &self,
        caller: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError> {
        rejected("resolve", self.resolve_pair(caller, kill, winner, loser))
    }

    fn resolve_as_guardian(
        &self,
        caller: Address,
        game: GameId,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError> {
        rejected(
            "resolve_as_guardian",
            self.resolve_game(caller, game, kill, winner, loser),
        )
    }

    fn report(
        &self,
        caller: Address,
        guardian: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError> {
        debug!(reporter = %caller, %guardian, %kill, "report");
        self.events.publish(RegistryEvent::Report {
            reporter: caller,
            outcome: Outcome {
                guardian,
                kill,
                winner,
                loser,
            },
        });
        Ok(())
    }

    fn witness_report(
        &self,
        caller: Address,
        guardian: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError> {
        debug!(reporter = %caller, %guardian, %kill, "witness report");
        self.events.publish(RegistryEvent::Witness {
            reporter: caller,
            outcome: Outcome {
                guardian,
                kill,
                winner,
                loser,
            },
        });
        Ok(())
    }

    fn publish(
        &self,
        caller: Address,
        kill: KillId,
        winner: Address,
        loser: Address,
    ) -> Result<(), RegistryError> {
        rejected("publish", self.do_publish(caller, kill, winner, loser))
    }

    fn update_beneficiary(
        &self,
        caller: Address,
        new_beneficiary: Address,
    ) -> Result<(), RegistryError> {
        rejected(
            "update_beneficiary",
            self.do_update_beneficiary(caller, new_beneficiary),
        )
    }

    fn grant_role(
        &self,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<(), RegistryError> {
        rejected("grant_role", {
            self.require_role(caller, RoleId::DEFAULT_ADMIN, DEFAULT_ADMIN_ROLE)
                .map(|()| {
                    if self.roles.grant_role(role, account) {
                        info!(?role, %account, granted_by = %caller, "role granted");
                    }
                })
        })
    }

    fn revoke_role(
        &self,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<(), RegistryError> {
        rejected("revoke_role", {
            self.require_role(caller, RoleId::DEFAULT_ADMIN, DEFAULT_ADMIN_ROLE)
                .map(|()| {
                    if self.roles.revoke_role(role, account) {
                        info!(?role, %account, revoked_by = %caller, "role revoked");
                    }
                })
        })
    }

    fn search_balance(&self, wallet: Address) -> BalanceRecord {
        self.state.lock().ledger.record(&wallet)
    }

    fn search_signer(&self, wallet: Address) -> (Address, Address) {
        self.state.lock().bindings.search(&wallet)
    }

    fn session_of(&self, player: Address) -> Option<Session> {
        self.state.lock().sessions.get(&player).cloned()
    }
}

//! # Escrow Flows
//!
//! Wallet-funded sessions end to end: deposit with a bound signer, delegated
//! entry on a signed request, guardian resolution and withdrawal.
//!
//! Account layout for a wallet `x`: `account(x)` funds, `account(x + 1)`
//! signs, `account(x + 2)` plays. `account(1)` is the guardian.

#[cfg(test)]
mod tests {
    use super::super::*;
    use registry_ledger::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const WALLETS: [u8; 3] = [2, 5, 8];

    /// Fund, deposit and request for each wallet in `wallets`.
    fn request_for_wallets(deployment: &Deployment, wallets: &[u8]) {
        let guardian = account(1);
        for &x in wallets {
            let (wallet, signer, player) = (account(x), account(x + 1), account(x + 2));
            deployment.balance(wallet.address, tokens(10));
            deployment
                .deposit(&wallet, &signer, tokens(10))
                .expect("deposit");
            deployment
                .request(&guardian, &wallet, &signer, &player)
                .expect("request");
        }
    }

    fn assert_record(
        deployment: &Deployment,
        who: u8,
        allocated: Amount,
        available: Amount,
        historic: Amount,
    ) {
        let record = deployment.registry.search_balance(account(who).address);
        assert_eq!(record.allocated, allocated, "allocated of account {who}");
        assert_eq!(record.available, available, "available of account {who}");
        assert_eq!(record.historic, historic, "historic of account {who}");
    }

    // =============================================================================
    // DEPOSIT
    // =============================================================================

    #[test]
    fn test_deposit_moves_custody_and_binds_signer() {
        let deployment = Deployment::new();
        let (wallet, signer) = (account(2), account(3));
        deployment.balance(wallet.address, tokens(10));

        deployment
            .deposit(&wallet, &signer, tokens(10))
            .expect("deposit");

        assert_eq!(deployment.custody(wallet.address), Amount::zero());
        assert_eq!(deployment.custody(deployment.escrow), tokens(10));
        assert_record(&deployment, 2, Amount::zero(), tokens(10), Amount::zero());
        assert_eq!(
            deployment.registry.search_signer(wallet.address),
            (wallet.address, signer.address)
        );
        assert!(matches!(
            deployment.log.last(),
            Some(RegistryEvent::Deposit { amount, .. }) if amount == tokens(10)
        ));
    }

    #[test]
    fn test_deposit_multiple_times_accumulates() {
        let deployment = Deployment::new();
        let (wallet, signer) = (account(2), account(3));
        deployment.balance(wallet.address, tokens(10));

        for _ in 0..4 {
            deployment
                .deposit(&wallet, &signer, tenths(25))
                .expect("deposit");
            deployment.clock.advance(1);
        }

        assert_record(&deployment, 2, Amount::zero(), tokens(10), Amount::zero());
        assert_eq!(deployment.custody(deployment.escrow), tokens(10));
    }

    #[test]
    fn test_deposit_rebinds_signer() {
        let deployment = Deployment::new();
        let wallet = account(2);
        deployment.balance(wallet.address, tokens(2));

        deployment
            .deposit(&wallet, &account(3), tokens(1))
            .expect("first deposit");
        deployment
            .deposit(&wallet, &account(4), tokens(1))
            .expect("second deposit");

        assert_eq!(
            deployment.registry.search_signer(wallet.address),
            (wallet.address, account(4).address)
        );
    }

    #[test]
    fn test_deposit_signed_by_other_key_fails() {
        let deployment = Deployment::new();
        let (wallet, signer, impostor) = (account(2), account(3), account(4));
        deployment.balance(wallet.address, tokens(10));

        let now = deployment.now();
        let signature = impostor.sign(&deposit_message(now, wallet.address));
        let err = deployment
            .registry
            .deposit(wallet.address, tokens(10), now, signer.address, &signature)
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Address);
        assert_eq!(deployment.custody(wallet.address), tokens(10));
        assert_eq!(
            deployment.registry.search_signer(wallet.address),
            (Address::ZERO, Address::ZERO)
        );
        assert!(deployment.log.is_empty());
    }

    #[test]
    fn test_deposit_without_allowance_fails() {
        let deployment = Deployment::new();
        let (wallet, signer) = (account(2), account(3));
        deployment.asset.mint(wallet.address, tokens(10));

        let err = deployment
            .deposit(&wallet, &signer, tokens(10))
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Custody);
        assert_record(&deployment, 2, Amount::zero(), Amount::zero(), Amount::zero());
        assert_eq!(
            deployment.registry.search_signer(wallet.address),
            (Address::ZERO, Address::ZERO)
        );
    }

    #[test]
    fn test_deposit_with_stale_timestamp_fails() {
        let deployment = Deployment::new();
        let (wallet, signer) = (account(2), account(3));
        deployment.balance(wallet.address, tokens(10));

        let signed_at = deployment.now();
        let signature = signer.sign(&deposit_message(signed_at, wallet.address));
        deployment.clock.advance(61);

        let err = deployment
            .registry
            .deposit(wallet.address, tokens(10), signed_at, signer.address, &signature)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Process);
    }

    // =============================================================================
    // SIGNATURES
    // =============================================================================

    #[test]
    fn test_recover_signer_from_request() {
        let deployment = Deployment::new();
        let (guardian, signer, player) = (account(1), account(3), account(4));

        let message = deployment
            .registry
            .request_message(guardian.address, GENESIS, player.address);
        assert_eq!(
            message,
            format!(
                "request-{GENESIS}-{}-{}",
                guardian.address.to_hex(),
                player.address.to_hex()
            )
            .into_bytes()
        );

        let recovered = deployment
            .registry
            .recover_signer(&message, &signer.sign(&message))
            .expect("recover");
        assert_eq!(recovered, signer.address);
    }

    #[test]
    fn test_recover_signer_from_deposit() {
        let deployment = Deployment::new();
        let (wallet, signer) = (account(2), account(3));

        let message = deployment.registry.deposit_message(GENESIS, wallet.address);
        let recovered = deployment
            .registry
            .recover_signer(&message, &signer.sign(&message))
            .expect("recover");
        assert_eq!(recovered, signer.address);
    }

    // =============================================================================
    // REQUEST
    // =============================================================================

    #[test]
    fn test_request_allocates_buyin_for_each_wallet() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &WALLETS);

        for x in WALLETS {
            assert_record(&deployment, x, tokens(1), tokens(9), Amount::zero());
            let session = deployment
                .registry
                .session_of(account(x + 2).address)
                .expect("session");
            assert_eq!(session.funding_wallet, account(x).address);
            assert_eq!(session.guardian(), Some(account(1).address));
        }
        assert_eq!(deployment.custody(deployment.escrow), tokens(30));
        assert_eq!(deployment.registry.active_players().len(), 3);
    }

    #[test]
    fn test_request_with_unbound_wallet_fails() {
        let deployment = Deployment::new();
        let (guardian, wallet, signer, player) = (account(1), account(2), account(3), account(4));

        let err = deployment
            .request(&guardian, &wallet, &signer, &player)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Address);
        assert!(!deployment.registry.is_active(player.address));
    }

    #[test]
    fn test_request_without_available_funds_fails() {
        let deployment = Deployment::new();
        let (guardian, wallet, signer, player) = (account(1), account(2), account(3), account(4));
        deployment.balance(wallet.address, tenths(5));
        deployment
            .deposit(&wallet, &signer, tenths(5))
            .expect("deposit");

        let err = deployment
            .request(&guardian, &wallet, &signer, &player)
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Arithmetic);
        assert_record(&deployment, 2, Amount::zero(), tenths(5), Amount::zero());
        assert!(!deployment.registry.is_active(player.address));
    }

    #[test]
    fn test_request_against_staked_wallet_fails() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &[2]);
        deployment.clock.advance(1);
        let events = deployment.log.len();

        let err = deployment
            .request(&account(1), &account(2), &account(3), &account(9))
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::Address(AddressFault::WalletStaked(account(2).address))
        );
        assert!(!deployment.registry.is_active(account(9).address));
        assert_record(&deployment, 2, tokens(1), tokens(9), Amount::zero());
        assert_eq!(deployment.log.len(), events);
    }

    #[test]
    fn test_request_twice_for_same_player_fails() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &[2]);
        deployment.clock.advance(1);

        let err = deployment
            .request(&account(1), &account(2), &account(3), &account(4))
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Process);
        assert_record(&deployment, 2, tokens(1), tokens(9), Amount::zero());
    }

    // =============================================================================
    // RESOLVE
    // =============================================================================

    #[test]
    fn test_resolve_updates_balances_for_players_and_protocol() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &WALLETS);

        // Outcomes name the funding wallets, not the players they back.
        let guardian = account(1);
        let (winner, loser) = (account(5), account(8));
        deployment
            .registry
            .resolve(guardian.address, KillId(1001), winner.address, loser.address)
            .expect("resolve");

        assert_eq!(
            deployment.log.last(),
            Some(RegistryEvent::Resolve {
                outcome: Outcome {
                    guardian: guardian.address,
                    kill: KillId(1001),
                    winner: winner.address,
                    loser: loser.address,
                },
                winnings: tenths(4),
                forfeited: tokens(1),
            })
        );

        // Owner and guardian earn one tenth each.
        assert_record(&deployment, 0, Amount::zero(), tenths(1), Amount::zero());
        assert_record(&deployment, 1, Amount::zero(), tenths(1), Amount::zero());

        // Wallet 2 is still playing.
        assert_record(&deployment, 2, tokens(1), tokens(9), Amount::zero());

        // Wallet 5 backed the winner.
        assert_record(&deployment, 5, tenths(14), tokens(9) + tenths(4), tenths(4));

        // Wallet 8 backed the loser.
        assert_record(&deployment, 8, Amount::zero(), tokens(9), Amount::zero());

        for other in [3, 4, 6, 7, 9, 10] {
            assert_record(&deployment, other, Amount::zero(), Amount::zero(), Amount::zero());
        }

        assert!(deployment.registry.is_active(account(4).address));
        assert!(!deployment.registry.is_active(account(7).address));
        assert!(!deployment.registry.is_active(account(10).address));
        assert_eq!(deployment.custody(deployment.escrow), tokens(30));
        assert_eq!(deployment.registry.total_escrowed(), Some(tokens(30)));
    }

    #[test]
    fn test_resolve_by_other_guardian_fails() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &WALLETS);

        let err = deployment
            .registry
            .resolve(
                account(0).address,
                KillId(1001),
                account(5).address,
                account(8).address,
            )
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Address);
        assert_record(&deployment, 5, tokens(1), tokens(9), Amount::zero());
        assert!(deployment.registry.is_active(account(7).address));
    }

    #[test]
    fn test_resolve_by_player_address_fails() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &WALLETS);

        let err = deployment
            .registry
            .resolve(
                account(1).address,
                KillId(1001),
                account(7).address,
                account(10).address,
            )
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::Process(ProcessFault::NotActive(account(7).address))
        );
        assert_record(&deployment, 5, tokens(1), tokens(9), Amount::zero());
        assert_eq!(deployment.registry.active_players().len(), 3);
    }

    #[test]
    fn test_resolve_with_inactive_loser_fails() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &[5]);

        let err = deployment
            .registry
            .resolve(
                account(1).address,
                KillId(1001),
                account(5).address,
                account(8).address,
            )
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Process);
        assert!(deployment.registry.is_active(account(7).address));
    }

    #[test]
    fn test_resolved_player_can_request_again() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &WALLETS);
        deployment
            .registry
            .resolve(
                account(1).address,
                KillId(1001),
                account(5).address,
                account(8).address,
            )
            .expect("resolve");

        deployment.clock.advance(5);
        deployment
            .request(&account(1), &account(5), &account(6), &account(7))
            .expect("second request");

        assert_record(
            &deployment,
            5,
            tenths(24),
            tokens(8) + tenths(4),
            tenths(4),
        );
    }

    // =============================================================================
    // WITHDRAW
    // =============================================================================

    #[test]
    fn test_withdraw_after_win() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &WALLETS);
        deployment
            .registry
            .resolve(
                account(1).address,
                KillId(1001),
                account(5).address,
                account(8).address,
            )
            .expect("resolve");

        let wallet = account(5).address;
        deployment
            .registry
            .withdraw(wallet, tenths(4))
            .expect("withdraw winnings");
        assert_record(&deployment, 5, tenths(14), tokens(9), tenths(4));
        assert_eq!(deployment.custody(wallet), tenths(4));
        assert_eq!(deployment.custody(deployment.escrow), tokens(29) + tenths(6));

        deployment
            .registry
            .withdraw(wallet, tokens(9))
            .expect("withdraw rest");
        assert_record(&deployment, 5, tenths(14), Amount::zero(), tenths(4));
        assert_eq!(deployment.custody(wallet), tokens(9) + tenths(4));
    }

    #[test]
    fn test_withdraw_more_than_available_reverts() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &[2]);
        let wallet = account(2).address;
        let events = deployment.log.len();

        let err = deployment
            .registry
            .withdraw(wallet, tokens(10))
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Arithmetic);
        assert_record(&deployment, 2, tokens(1), tokens(9), Amount::zero());
        assert_eq!(deployment.custody(wallet), Amount::zero());
        assert_eq!(deployment.custody(deployment.escrow), tokens(10));
        assert_eq!(deployment.log.len(), events);
    }

    #[test]
    fn test_withdraw_by_each_account_is_independent() {
        let deployment = Deployment::new();
        request_for_wallets(&deployment, &WALLETS);

        for x in WALLETS {
            deployment
                .registry
                .withdraw(account(x).address, tokens(9))
                .expect("withdraw");
        }

        for x in WALLETS {
            assert_record(&deployment, x, tokens(1), Amount::zero(), Amount::zero());
            assert_eq!(deployment.custody(account(x).address), tokens(9));
        }
        assert_eq!(deployment.custody(deployment.escrow), tokens(3));
    }
}

//! # Administrative Flows
//!
//! Deployment checks, beneficiary handover, role administration and the
//! balance-neutral outcome announcements.

#[cfg(test)]
mod tests {
    use super::super::*;
    use registry_ledger::prelude::*;
    use std::sync::Arc;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn deploy(
        owner: Address,
        asset_address: Address,
        asset: InMemoryAsset,
    ) -> Result<InMemoryRegistry, RegistryError> {
        let config = RegistryConfigBuilder::new().buyin(tokens(1)).build()?;
        RegistryService::new(
            RegistryParams {
                owner,
                asset: asset_address,
                escrow: account(ESCROW_SEED).address,
            },
            config,
            RegistryPorts {
                asset: Arc::new(asset),
                roles: Arc::new(InMemoryAccessControl::new()),
                clock: Arc::new(ManualClock::new(GENESIS)),
                events: Arc::new(InMemoryEventLog::new()),
            },
        )
    }

    fn asset_address() -> Address {
        Address::from_low_u8(0xAA)
    }

    /// Enter two direct players and resolve them with `account(7)`.
    fn play_round(deployment: &Deployment, winner: u8, loser: u8, kill: u64) {
        for x in [winner, loser] {
            let player = account(x).address;
            deployment.balance(player, tokens(1));
            deployment
                .registry
                .enter_direct(player, GameId(1234))
                .expect("enter");
        }
        deployment
            .registry
            .resolve_as_guardian(
                account(7).address,
                GameId(1234),
                KillId(kill),
                account(winner).address,
                account(loser).address,
            )
            .expect("resolve");
    }

    // =============================================================================
    // DEPLOYMENT
    // =============================================================================

    #[test]
    fn test_deploy_grants_owner_roles() {
        let deployment = Deployment::new();
        let owner = account(0).address;

        assert_eq!(deployment.registry.beneficiary(), owner);
        assert!(deployment.registry.has_role(RoleId::DEFAULT_ADMIN, owner));
        assert!(deployment.registry.has_role(RoleId::beneficiary(), owner));
        assert_eq!(deployment.registry.role_member_count(RoleId::DEFAULT_ADMIN), 1);
        assert_eq!(deployment.registry.buyin(), tokens(1));
        assert_eq!(deployment.registry.owner_fee_bps(), 1000);
        assert_eq!(deployment.registry.guardian_fee_bps(), 1000);
    }

    #[test]
    fn test_deploy_with_zero_owner_reverts() {
        let err = deploy(Address::ZERO, asset_address(), InMemoryAsset::new()).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Address);
    }

    #[test]
    fn test_deploy_with_zero_asset_reverts() {
        let err = deploy(account(0).address, Address::ZERO, InMemoryAsset::new()).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Address);
    }

    #[test]
    fn test_deploy_with_imprecise_asset_reverts() {
        for decimals in [2, 5] {
            let err = deploy(
                account(0).address,
                asset_address(),
                InMemoryAsset::with_decimals(decimals),
            )
            .unwrap_err();
            assert_eq!(
                err,
                RegistryError::Balance(BalanceFault::InsufficientDecimals { decimals, min: 6 })
            );
        }
    }

    #[test]
    fn test_deploy_with_six_decimals_succeeds() {
        let registry = deploy(
            account(0).address,
            asset_address(),
            InMemoryAsset::with_decimals(6),
        );
        assert!(registry.is_ok());
    }

    #[test]
    fn test_deploy_with_non_token_reverts() {
        let err = deploy(
            account(0).address,
            asset_address(),
            InMemoryAsset::without_decimals(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Custody);
    }

    #[test]
    fn test_constants() {
        assert_eq!(BASIS_TOTAL, 10_000);
        assert_eq!(VERSION, "v0.3.0");
    }

    // =============================================================================
    // BENEFICIARY
    // =============================================================================

    #[test]
    fn test_update_beneficiary_moves_role_and_fees() {
        let deployment = Deployment::new();
        let (owner, next) = (account(0).address, account(9).address);

        play_round(&deployment, 2, 3, 1);
        deployment
            .registry
            .update_beneficiary(owner, next)
            .expect("update");

        assert_eq!(
            deployment.log.last(),
            Some(RegistryEvent::UpdateBeneficiary {
                previous: owner,
                current: next,
            })
        );
        assert_eq!(deployment.registry.beneficiary(), next);
        assert!(!deployment.registry.has_role(RoleId::beneficiary(), owner));
        assert!(deployment.registry.has_role(RoleId::beneficiary(), next));
        assert!(deployment.registry.has_role(RoleId::DEFAULT_ADMIN, owner));

        play_round(&deployment, 4, 5, 2);

        // Earlier fees stay with the previous beneficiary.
        assert_eq!(deployment.registry.search_balance(owner).available, tenths(1));
        assert_eq!(deployment.registry.search_balance(next).available, tenths(1));
    }

    #[test]
    fn test_update_beneficiary_by_non_beneficiary_reverts() {
        let deployment = Deployment::new();

        let err = deployment
            .registry
            .update_beneficiary(account(3).address, account(3).address)
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Address);
        assert_eq!(deployment.registry.beneficiary(), account(0).address);
    }

    #[test]
    fn test_update_beneficiary_to_zero_reverts() {
        let deployment = Deployment::new();
        let err = deployment
            .registry
            .update_beneficiary(account(0).address, Address::ZERO)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Address);
    }

    #[test]
    fn test_update_beneficiary_to_self_reverts() {
        let deployment = Deployment::new();
        let owner = account(0).address;
        let err = deployment
            .registry
            .update_beneficiary(owner, owner)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Address(AddressFault::SameBeneficiary(owner))
        );
        assert!(deployment.log.is_empty());
    }

    #[test]
    fn test_previous_beneficiary_cannot_update_again() {
        let deployment = Deployment::new();
        let owner = account(0).address;
        deployment
            .registry
            .update_beneficiary(owner, account(9).address)
            .expect("update");

        let err = deployment
            .registry
            .update_beneficiary(owner, account(8).address)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Address);

        deployment
            .registry
            .update_beneficiary(account(9).address, account(8).address)
            .expect("new beneficiary hands over");
        assert_eq!(deployment.registry.beneficiary(), account(8).address);
    }

    // =============================================================================
    // ROLES
    // =============================================================================

    #[test]
    fn test_grant_roles_using_default_admin() {
        let deployment = Deployment::new();
        let registry = &deployment.registry;
        let (owner, seven, nine) = (account(0).address, account(7).address, account(9).address);
        let admin = RoleId::DEFAULT_ADMIN;

        registry.grant_role(owner, admin, seven).expect("grant");
        assert!(registry.has_role(admin, seven));
        assert!(!registry.has_role(admin, nine));

        registry.grant_role(owner, admin, nine).expect("grant");
        assert!(registry.has_role(admin, nine));

        registry.revoke_role(owner, admin, seven).expect("revoke");
        assert!(!registry.has_role(admin, seven));
        assert!(registry.has_role(admin, nine));

        // Revoking an absent member is a no-op.
        registry
            .revoke_role(owner, admin, account(5).address)
            .expect("revoke absent");
        assert!(registry.has_role(admin, nine));

        registry.revoke_role(owner, admin, nine).expect("revoke");
        assert!(!registry.has_role(admin, nine));
        assert_eq!(registry.role_member_count(admin), 1);
    }

    #[test]
    fn test_granting_one_role_does_not_grant_another() {
        let deployment = Deployment::new();
        let registry = &deployment.registry;
        let owner = account(0).address;
        let seven = account(7).address;

        registry
            .grant_role(owner, RoleId::named("WRONG_ROLE"), seven)
            .expect("grant");
        assert!(registry.has_role(RoleId::named("WRONG_ROLE"), seven));
        assert!(!registry.has_role(RoleId::named("BOT_ROLE"), seven));
        assert!(!registry.has_role(RoleId::DEFAULT_ADMIN, seven));
    }

    #[test]
    fn test_non_admin_cannot_grant() {
        let deployment = Deployment::new();
        let registry = &deployment.registry;
        let seven = account(7).address;

        let err = registry
            .grant_role(seven, RoleId::DEFAULT_ADMIN, seven)
            .unwrap_err();

        assert_eq!(err.kind(), FaultKind::Address);
        assert!(!registry.has_role(RoleId::DEFAULT_ADMIN, seven));
    }

    #[test]
    fn test_revoke_default_admin_forever() {
        let deployment = Deployment::new();
        let registry = &deployment.registry;
        let owner = account(0).address;
        assert_eq!(registry.role_member_count(RoleId::DEFAULT_ADMIN), 1);

        registry
            .revoke_role(owner, RoleId::DEFAULT_ADMIN, owner)
            .expect("renounce");
        assert_eq!(registry.role_member_count(RoleId::DEFAULT_ADMIN), 0);

        let err = registry
            .grant_role(owner, RoleId::DEFAULT_ADMIN, owner)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Address);
        assert_eq!(registry.role_member_count(RoleId::DEFAULT_ADMIN), 0);
    }

    // =============================================================================
    // ANNOUNCEMENTS
    // =============================================================================

    #[test]
    fn test_report_and_witness_report_emit_without_balance_effect() {
        let deployment = Deployment::new();
        let (reporter, guardian) = (account(4).address, account(1).address);
        let outcome = Outcome {
            guardian,
            kill: KillId(77),
            winner: account(2).address,
            loser: account(3).address,
        };

        deployment
            .registry
            .report(reporter, guardian, outcome.kill, outcome.winner, outcome.loser)
            .expect("report");
        deployment
            .registry
            .witness_report(reporter, guardian, outcome.kill, outcome.winner, outcome.loser)
            .expect("witness");

        assert_eq!(
            deployment.log.events(),
            vec![
                RegistryEvent::Report { reporter, outcome },
                RegistryEvent::Witness { reporter, outcome },
            ]
        );
        for x in 0..6 {
            assert_eq!(
                deployment.registry.search_balance(account(x).address),
                BalanceRecord::default()
            );
        }
    }

    #[test]
    fn test_publish_delegated_session_names_guardian() {
        let deployment = Deployment::new();
        let (guardian, wallet, signer, player) = (account(1), account(2), account(3), account(4));
        deployment.balance(wallet.address, tokens(1));
        deployment
            .deposit(&wallet, &signer, tokens(1))
            .expect("deposit");
        deployment
            .request(&guardian, &wallet, &signer, &player)
            .expect("request");

        deployment
            .registry
            .publish(player.address, KillId(9), player.address, account(7).address)
            .expect("publish");

        assert!(matches!(
            deployment.log.last(),
            Some(RegistryEvent::WitnessPublish { outcome, .. }) if outcome.guardian == guardian.address
        ));
        assert!(deployment
            .registry
            .session_of(player.address)
            .is_some_and(|session| session.published));
    }

    #[test]
    fn test_publish_without_session_fails() {
        let deployment = Deployment::new();
        let err = deployment
            .registry
            .publish(account(4).address, KillId(9), account(4).address, account(5).address)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::Process);
        assert!(deployment.log.is_empty());
    }
}

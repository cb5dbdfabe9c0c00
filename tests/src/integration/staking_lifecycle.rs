//! # Staking Lifecycle Tests
//!
//! The full arc of a position: stake, accrue over mined blocks, claim or
//! compound, unstake. Exercises the contract and ledger together.

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use shared_types::{Address, BLOCKS_PER_YEAR};
    use sim_ledger::Ledger;
    use sim_staking::{ContractError, StakingContract};

    const STAKER: &str = "0xstaker";

    fn addr(id: &str) -> Address {
        Address::new(id)
    }

    fn contract_with_staker(balance: Decimal) -> StakingContract {
        let mut ledger = Ledger::default();
        ledger.create_account(addr(STAKER), balance).unwrap();
        StakingContract::with_defaults(ledger).unwrap()
    }

    fn expected_accrual(stake: Decimal, apr: Decimal, blocks: u64) -> Decimal {
        stake * apr * Decimal::from(blocks) / BLOCKS_PER_YEAR
    }

    // =========================================================================
    // FULL CYCLE
    // =========================================================================

    #[test]
    fn test_stake_accrue_claim_cycle() {
        let mut contract = contract_with_staker(dec!(10));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();

        contract.ledger_mut().mine_blocks(100);

        let rewards = contract.get_rewards(&addr(STAKER));
        assert_eq!(rewards, expected_accrual(dec!(5), dec!(0.05), 100));
        assert!(rewards > Decimal::ZERO);

        let balance_before = contract.ledger().get_balance(&addr(STAKER)).unwrap();
        contract.claim_rewards(&addr(STAKER)).unwrap();

        // Payout lands in full; the treasury covers the claim gas.
        assert_eq!(
            contract.ledger().get_balance(&addr(STAKER)).unwrap(),
            balance_before + rewards
        );
        assert_eq!(contract.get_rewards(&addr(STAKER)), Decimal::ZERO);
        // Principal untouched by the claim.
        assert_eq!(contract.get_stake(&addr(STAKER)), dec!(5));
    }

    #[test]
    fn test_stake_unstake_exact_round_trip() {
        let mut contract = contract_with_staker(dec!(10));

        let stake_tx = contract.stake(&addr(STAKER), dec!(5), None).unwrap();
        let unstake_tx = contract.unstake(&addr(STAKER), dec!(5)).unwrap();

        // The principal round-trips exactly; only gas is lost.
        assert_eq!(
            contract.ledger().get_balance(&addr(STAKER)).unwrap(),
            dec!(10) - stake_tx.gas_cost() - unstake_tx.gas_cost()
        );
        assert_eq!(contract.get_stake(&addr(STAKER)), Decimal::ZERO);
        assert_eq!(
            contract
                .ledger()
                .get_account(&addr(STAKER))
                .unwrap()
                .staked_amount,
            Decimal::ZERO
        );

        // The treasury holds exactly its seed again.
        assert_eq!(
            contract.ledger().get_balance(contract.address()).unwrap(),
            dec!(1000)
        );
    }

    // =========================================================================
    // ACCRUAL PROPERTIES
    // =========================================================================

    #[test]
    fn test_rewards_monotonic_in_elapsed_blocks() {
        let mut contract = contract_with_staker(dec!(10));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();

        let mut previous = contract.get_rewards(&addr(STAKER));
        for _ in 0..20 {
            contract.ledger_mut().mine_blocks(7);
            let current = contract.get_rewards(&addr(STAKER));
            assert!(current >= previous, "accrual went backwards");
            previous = current;
        }
    }

    #[test]
    fn test_accrual_survives_partial_unstake() {
        let mut contract = contract_with_staker(dec!(10));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();
        contract.ledger_mut().mine_blocks(50);

        let accrued = contract.get_rewards(&addr(STAKER));
        contract.unstake(&addr(STAKER), dec!(2)).unwrap();

        // Banked at the unstake; nothing lost, accrual restarts on 3 ETH.
        assert_eq!(contract.get_rewards(&addr(STAKER)), accrued);
        contract.ledger_mut().mine_blocks(50);
        assert_eq!(
            contract.get_rewards(&addr(STAKER)),
            accrued + expected_accrual(dec!(3), dec!(0.05), 50)
        );
    }

    #[test]
    fn test_additional_stake_preserves_accrued() {
        let mut contract = contract_with_staker(dec!(20));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();
        contract.ledger_mut().mine_blocks(50);

        let accrued = contract.get_rewards(&addr(STAKER));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();

        assert_eq!(contract.get_rewards(&addr(STAKER)), accrued);
        assert_eq!(contract.get_stake(&addr(STAKER)), dec!(10));
    }

    #[test]
    fn test_apr_change_reported_in_position() {
        let mut contract = contract_with_staker(dec!(10));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();

        contract.set_apr(dec!(0.08));
        let position = contract.get_position(&addr(STAKER));
        assert_eq!(position.apr, dec!(0.08));
        assert_eq!(position.previous_apr, dec!(0.05));
    }

    // =========================================================================
    // COMPOUND
    // =========================================================================

    #[test]
    fn test_compound_grows_accrual_base() {
        let mut contract = contract_with_staker(dec!(10));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();
        contract.ledger_mut().mine_blocks(100);

        let rewards = contract.get_rewards(&addr(STAKER));
        let balance_before = contract.ledger().get_balance(&addr(STAKER)).unwrap();
        let tx = contract.compound(&addr(STAKER)).unwrap();

        assert_eq!(tx.value, rewards);
        assert_eq!(contract.get_stake(&addr(STAKER)), dec!(5) + rewards);
        assert_eq!(contract.get_rewards(&addr(STAKER)), Decimal::ZERO);
        // Compound is balance-neutral on the liquid side.
        assert_eq!(
            contract.ledger().get_balance(&addr(STAKER)).unwrap(),
            balance_before
        );

        // Future accrual runs on the grown principal.
        contract.ledger_mut().mine_blocks(100);
        assert_eq!(
            contract.get_rewards(&addr(STAKER)),
            expected_accrual(dec!(5) + rewards, dec!(0.05), 100)
        );
    }

    #[test]
    fn test_compound_without_rewards_rejected() {
        let mut contract = contract_with_staker(dec!(10));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();

        assert!(matches!(
            contract.compound(&addr(STAKER)),
            Err(ContractError::NoRewards(_))
        ));
    }

    #[test]
    fn test_claim_then_immediate_reclaim_rejected() {
        let mut contract = contract_with_staker(dec!(10));
        contract.stake(&addr(STAKER), dec!(5), None).unwrap();
        contract.ledger_mut().mine_blocks(100);

        contract.claim_rewards(&addr(STAKER)).unwrap();
        // Accrual restarted this block; nothing to claim yet.
        assert!(matches!(
            contract.claim_rewards(&addr(STAKER)),
            Err(ContractError::NoRewards(_))
        ));
    }

    // =========================================================================
    // RENDERING SURFACE
    // =========================================================================

    #[test]
    fn test_transaction_and_position_render_stable_fields() {
        let mut contract = contract_with_staker(dec!(10));
        let tx = contract.stake(&addr(STAKER), dec!(5), None).unwrap();

        let tx_json = serde_json::to_value(&tx).unwrap();
        for field in ["hash", "from", "to", "value", "gas_used", "gas_price", "status"] {
            assert!(tx_json.get(field).is_some(), "missing tx field {field}");
        }
        assert_eq!(tx_json["status"], "success");

        let position = contract.get_position(&addr(STAKER));
        let pos_json = serde_json::to_value(&position).unwrap();
        for field in ["address", "staked", "rewards", "apr", "previous_apr"] {
            assert!(pos_json.get(field).is_some(), "missing position field {field}");
        }
    }

    // =========================================================================
    // MULTIPLE POSITIONS
    // =========================================================================

    #[test]
    fn test_positions_accrue_independently() {
        let mut ledger = Ledger::default();
        ledger.create_account(addr("0xalice"), dec!(10)).unwrap();
        ledger.create_account(addr("0xbob"), dec!(10)).unwrap();
        let mut contract = StakingContract::with_defaults(ledger).unwrap();

        contract.stake(&addr("0xalice"), dec!(4), None).unwrap();
        contract.ledger_mut().mine_blocks(50);
        contract.stake(&addr("0xbob"), dec!(8), None).unwrap();
        contract.ledger_mut().mine_blocks(50);

        assert_eq!(
            contract.get_rewards(&addr("0xalice")),
            expected_accrual(dec!(4), dec!(0.05), 100)
        );
        assert_eq!(
            contract.get_rewards(&addr("0xbob")),
            expected_accrual(dec!(8), dec!(0.05), 50)
        );
    }
}

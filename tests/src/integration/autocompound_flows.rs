//! # Autocompound Flow Tests
//!
//! Strategies and the reward monitor driving a live contract: decisions
//! against accrued (not seeded) rewards, interval gating under the block
//! clock, and gas sampling from ledger prices.

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use shared_types::{Address, SECONDS_PER_BLOCK, SECONDS_PER_DAY};
    use sim_autocompound::{CompoundStrategy, GasOptimizer, RewardMonitor};
    use sim_ledger::Ledger;
    use sim_staking::StakingContract;

    const STAKER: &str = "0xstaker";
    const BLOCKS_PER_DAY: u64 = SECONDS_PER_DAY / SECONDS_PER_BLOCK;

    fn addr(id: &str) -> Address {
        Address::new(id)
    }

    fn monitor_with_stake(strategy: CompoundStrategy) -> RewardMonitor {
        let mut ledger = Ledger::default();
        ledger.create_account(addr(STAKER), dec!(50)).unwrap();
        let mut contract = StakingContract::with_defaults(ledger).unwrap();
        contract.stake(&addr(STAKER), dec!(10), None).unwrap();
        RewardMonitor::new(contract, strategy)
    }

    // =========================================================================
    // THRESHOLD DECISIONS AGAINST LIVE STATE
    // =========================================================================

    #[test]
    fn test_small_accrual_reported_below_threshold() {
        let mut monitor = monitor_with_stake(CompoundStrategy::threshold(dec!(0.1), dec!(50)));
        monitor.contract_mut().add_rewards(&addr(STAKER), dec!(0.05));

        let decision = monitor.evaluate(&addr(STAKER)).unwrap();
        assert!(!decision.should_compound);
        assert!(decision.reason.contains("below threshold"));
    }

    #[test]
    fn test_gas_spike_blocks_otherwise_ready_position() {
        let mut monitor = monitor_with_stake(CompoundStrategy::threshold(dec!(0.1), dec!(50)));
        monitor.contract_mut().add_rewards(&addr(STAKER), dec!(0.5));
        monitor.contract_mut().ledger_mut().set_gas_price(dec!(120));

        let decision = monitor.evaluate(&addr(STAKER)).unwrap();
        assert!(!decision.should_compound);
        assert!(decision.reason.contains("exceeds threshold"));

        // Price comes back down, the position compounds.
        monitor.contract_mut().ledger_mut().set_gas_price(dec!(20));
        assert!(monitor.evaluate(&addr(STAKER)).unwrap().should_compound);
        assert!(monitor
            .execute_compound(&addr(STAKER), None, None)
            .unwrap()
            .is_some());
    }

    // =========================================================================
    // TIME-BASED GATING UNDER THE BLOCK CLOCK
    // =========================================================================

    #[test]
    fn test_weekly_interval_gates_under_mined_time() {
        crate::init_tracing();
        let mut monitor = monitor_with_stake(CompoundStrategy::time_based(
            7 * SECONDS_PER_DAY,
            dec!(0.1),
            dec!(50),
        ));
        monitor.contract_mut().add_rewards(&addr(STAKER), dec!(0.5));

        // First compound approved; the weekly clock starts now.
        assert!(monitor.evaluate(&addr(STAKER)).unwrap().should_compound);

        // One day of blocks later: still inside the interval.
        monitor.contract_mut().ledger_mut().mine_blocks(BLOCKS_PER_DAY);
        let decision = monitor.evaluate(&addr(STAKER)).unwrap();
        assert!(!decision.should_compound);
        assert!(decision.reason.contains("waiting"));

        // Seven more days: the interval has elapsed.
        monitor
            .contract_mut()
            .ledger_mut()
            .mine_blocks(7 * BLOCKS_PER_DAY);
        assert!(monitor.evaluate(&addr(STAKER)).unwrap().should_compound);
    }

    // =========================================================================
    // GAS-OPTIMIZED SAMPLING FROM LEDGER PRICES
    // =========================================================================

    #[test]
    fn test_gas_optimized_samples_ledger_prices() {
        let strategy = CompoundStrategy::gas_optimized(50, dec!(0.1), dec!(100), 3).unwrap();
        let mut monitor = monitor_with_stake(strategy);
        monitor.contract_mut().add_rewards(&addr(STAKER), dec!(0.5));

        // Window fills from the ledger's price on each evaluation.
        for price in [dec!(40), dec!(30)] {
            monitor.contract_mut().ledger_mut().set_gas_price(price);
            let decision = monitor.evaluate(&addr(STAKER)).unwrap();
            assert!(!decision.should_compound);
            assert!(decision.reason.contains("samples"));
        }

        // History [40, 30, 20]: the p50 cut is 30 and 20 clears it.
        monitor.contract_mut().ledger_mut().set_gas_price(dec!(20));
        assert!(monitor.evaluate(&addr(STAKER)).unwrap().should_compound);
    }

    // =========================================================================
    // EXECUTION AGAINST ACCRUED REWARDS
    // =========================================================================

    #[test]
    fn test_execute_compound_on_mined_accrual() {
        let mut monitor = monitor_with_stake(CompoundStrategy::threshold(dec!(0.1), dec!(50)));
        monitor.contract_mut().ledger_mut().mine_blocks(100);

        let accrued = monitor.contract().get_rewards(&addr(STAKER));
        assert!(accrued > Decimal::ZERO);

        // The trickle is below the strategy floor; an override folds it.
        assert!(monitor
            .execute_compound(&addr(STAKER), None, None)
            .unwrap()
            .is_none());
        let tx = monitor
            .execute_compound(&addr(STAKER), Some(Decimal::ZERO), None)
            .unwrap()
            .expect("override should compound");

        assert_eq!(tx.value, accrued);
        assert_eq!(
            monitor.contract().get_stake(&addr(STAKER)),
            dec!(10) + accrued
        );

        let stats = monitor.get_compound_stats(&addr(STAKER));
        assert_eq!(stats.total_compounds, 1);
        assert_eq!(stats.total_rewards_compounded, accrued);
        assert!(stats.total_gas_cost > Decimal::ZERO);
    }

    #[test]
    fn test_check_rewards_tracks_gas_favorability() {
        let mut monitor = monitor_with_stake(CompoundStrategy::threshold(dec!(0.1), dec!(50)));
        monitor.contract_mut().add_rewards(&addr(STAKER), dec!(0.5));

        // Bootstrap sample: favorable regardless of price.
        monitor.contract_mut().ledger_mut().set_gas_price(dec!(200));
        assert!(monitor.check_rewards(&addr(STAKER)).unwrap());

        // Mine a block so the next sample lands at a later timestamp, then
        // spike the price well above the window average.
        monitor.contract_mut().ledger_mut().mine_block();
        monitor.contract_mut().ledger_mut().set_gas_price(dec!(900));
        assert!(!monitor.check_rewards(&addr(STAKER)).unwrap());
    }

    // =========================================================================
    // OPTIMIZER FED FROM A LEDGER PRICE SERIES
    // =========================================================================

    #[test]
    fn test_optimizer_follows_ledger_price_series() {
        let mut ledger = Ledger::default();
        let mut optimizer = GasOptimizer::new(60, 1);

        // Falling price series sampled once per block.
        for price in [dec!(50), dec!(40), dec!(30), dec!(20)] {
            ledger.set_gas_price(price);
            ledger.mine_blocks(10);
            optimizer.check_gas_price(ledger.block_time(), ledger.gas_price_gwei());
        }

        let stats = optimizer.get_gas_stats(ledger.gas_price_gwei());
        assert_eq!(stats.min_gas_price, dec!(20));
        assert_eq!(stats.max_gas_price, dec!(50));
        assert_eq!(stats.average_gas_price, dec!(35));
        assert_eq!(stats.current_gas_price, dec!(20));
    }
}

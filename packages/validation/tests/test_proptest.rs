// Property-Based Testing with Proptest
// Run with: cargo test -p duoswap-validation --test test_proptest

use duoswap_math::*;
use duoswap_validation::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: widening the price range never makes an account look healthier
    #[test]
    fn prop_wider_range_is_more_conservative(
        amounts in proptest::array::uniform6(0u128..(1u128 << 90)),
        sqrt_price in (Q72 / 4)..(4 * Q72),
        widen_bips in 0u128..5_000,
    ) {
        let narrow = InputParams {
            user_assets: amounts,
            sqrt_price_min_q72: sqrt_price,
            sqrt_price_max_q72: sqrt_price,
            active_liquidity_scaler_q72: Q72,
            active_liquidity_assets: 1u128 << 100,
            reserve_x: 1u128 << 100,
            reserve_y: 1u128 << 100,
        };
        let wide = InputParams {
            sqrt_price_min_q72: sqrt_price - sqrt_price * widen_bips / BIPS,
            sqrt_price_max_q72: sqrt_price + sqrt_price * widen_bips / BIPS,
            ..narrow
        };
        let n = value_position(&narrow).unwrap();
        let w = value_position(&wide).unwrap();
        prop_assert!(w.collateral_l + n.debt_l <= n.collateral_l + w.debt_l);
        prop_assert!(w.deposits_l <= n.deposits_l);
        prop_assert!(w.debts_l >= n.debts_l);
    }

    /// Property: the leverage bound holds exactly when net deposits cover 1%
    #[test]
    fn prop_leverage_bound(deposits in 1u128..(1u128 << 100), debts in 1u128..(1u128 << 100)) {
        let ok = debts <= deposits && (deposits - debts) * 100 >= deposits;
        prop_assert_eq!(check_leverage(deposits, debts).is_ok(), ok);
    }
}

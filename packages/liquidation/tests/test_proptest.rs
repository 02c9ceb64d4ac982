// Property-Based Testing with Proptest
// Run with: cargo test -p duoswap-liquidation --test test_proptest

use duoswap_liquidation::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: the hard premium schedule is non-decreasing in LTV and capped
    #[test]
    fn prop_hard_schedule_monotonic(a in 0u128..20_000, b in 0u128..20_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(max_hard_premium_bips(low) <= max_hard_premium_bips(high));
        prop_assert!(max_hard_premium_bips(high) <= 11_111);
    }

    /// Property: a leverage-violating account never caps the premium below par
    #[test]
    fn prop_leverage_premium_at_least_par(deposits in 1u128..(1u128 << 100), debts in 1u128..(1u128 << 100)) {
        if let Some(max) = leverage_max_premium_bips(deposits, debts).unwrap() {
            prop_assert!(max >= 10_000);
        }
    }
}

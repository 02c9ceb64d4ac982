// Property-Based Testing with Proptest
// Run with: cargo test -p duoswap-math --test test_proptest

use duoswap_math::*;
use proptest::prelude::*;

// ============================================================
// SHARE CONVERSION PROPERTIES
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: assets -> shares (down) -> assets (up) never exceeds the input
    #[test]
    fn prop_share_round_trip_does_not_create_assets(
        assets in 0u128..(1u128 << 64),
        total_assets in 1u128..(1u128 << 60),
        total_shares in 1u128..(1u128 << 60),
    ) {
        let shares = to_shares(assets, total_assets, total_shares, false).unwrap();
        let back = to_assets(shares, total_assets, total_shares, true).unwrap();
        prop_assert!(back <= assets);
    }

    /// Property: shares -> assets (down) -> shares (up) stays within one share
    #[test]
    fn prop_share_round_trip_reverse(
        shares in 0u128..(1u128 << 64),
        total_assets in 1u128..(1u128 << 60),
        total_shares in 1u128..(1u128 << 60),
    ) {
        let assets = to_assets(shares, total_assets, total_shares, false).unwrap();
        let back = to_shares(assets, total_assets, total_shares, true).unwrap();
        prop_assert!(back <= shares);
        // Lost shares are bounded by one asset's worth of shares
        let slack = total_shares / total_assets + 1;
        prop_assert!(shares - back <= slack);
    }

    /// Property: rounding up never yields less than rounding down, and by at most 1
    #[test]
    fn prop_mul_div_rounding(
        x in 0u128..u128::MAX,
        y in 0u128..(1u128 << 64),
        z in 1u128..u128::MAX,
    ) {
        if let (Ok(down), Ok(up)) = (mul_div(x, y, z, false), mul_div(x, y, z, true)) {
            prop_assert!(up >= down);
            prop_assert!(up - down <= 1);
        }
    }
}

// ============================================================
// TICK LADDER PROPERTIES
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Property: price -> tick inverts tick -> price on the whole ladder
    #[test]
    fn prop_tick_inverse(tick in MIN_TICK..=MAX_TICK) {
        let price = get_price_at_tick(tick).unwrap();
        prop_assert_eq!(get_tick_at_price(price).unwrap(), tick);
    }

    /// Property: the ladder is strictly increasing
    #[test]
    fn prop_tick_monotonic(tick in MIN_TICK..MAX_TICK) {
        let lower = get_sqrt_price_at_tick(tick).unwrap();
        let upper = get_sqrt_price_at_tick(tick + 1).unwrap();
        prop_assert!(upper > lower);
    }

    /// Property: any in-range price maps to the tick whose interval contains it
    #[test]
    fn prop_tick_brackets_price(tick in MIN_TICK..MAX_TICK, fraction in 0u128..1000) {
        let lower = get_price_at_tick(tick).unwrap();
        let upper = get_price_at_tick(tick + 1).unwrap();
        let price = lower + (upper - lower) * U256::new(fraction) / U256::new(1000);
        prop_assert_eq!(get_tick_at_price(price).unwrap(), tick);
    }
}

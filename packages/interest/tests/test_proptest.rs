// Property-Based Testing with Proptest
// Run with: cargo test -p duoswap-interest --test test_proptest

use duoswap_interest::*;
use duoswap_math::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: longer accrual windows never yield less interest
    #[test]
    fn prop_interest_monotonic_in_duration(
        deposited in 1u128..(1u128 << 100),
        borrow_fraction in 0u128..=100,
        short in 0u32..(SECONDS_PER_YEAR as u32),
        extra in 0u32..(SECONDS_PER_YEAR as u32),
    ) {
        let borrowed = deposited * borrow_fraction / 100;
        let totals = [0, deposited, 0, 0, borrowed, 0];
        let make = |duration| AccrualInput {
            total_assets: totals,
            lending_tick: 0,
            saturation_wad: 0,
            duration,
        };
        let (_, a) = accrue_interest(&make(short)).unwrap();
        let (_, b) = accrue_interest(&make(short + extra)).unwrap();
        prop_assert!(b.interest_x >= a.interest_x);
    }

    /// Property: accrual never pushes a total past the asset ceiling
    #[test]
    fn prop_interest_respects_ceiling(
        deposited in (u128::MAX / 2)..u128::MAX,
        duration in 0u32..(10 * SECONDS_PER_YEAR as u32),
    ) {
        let totals = [0, deposited, 0, 0, deposited, 0];
        let (assets, accrual) = accrue_interest(&AccrualInput {
            total_assets: totals,
            lending_tick: 0,
            saturation_wad: 0,
            duration,
        }).unwrap();
        prop_assert_eq!(assets[DEPOSIT_X], deposited + accrual.interest_x);
        prop_assert!(accrual.protocol_fee_x <= accrual.interest_x);
    }

    /// Property: fee, depositors and reserve split the X interest exactly
    #[test]
    fn prop_interest_split_is_exact(
        deposited in 0u128..(1u128 << 100),
        borrowed in 1u128..(1u128 << 100),
        duration in 1u32..(SECONDS_PER_YEAR as u32),
    ) {
        let totals = [0, deposited, 0, 0, borrowed, 0];
        let (assets, accrual) = accrue_interest(&AccrualInput {
            total_assets: totals,
            lending_tick: 0,
            saturation_wad: 0,
            duration,
        }).unwrap();
        prop_assert_eq!(
            assets[DEPOSIT_X] - deposited + accrual.reserve_interest_x,
            accrual.interest_x
        );
        prop_assert_eq!(assets[BORROW_X], borrowed + accrual.interest_x);
        if deposited == 0 {
            prop_assert_eq!(assets[DEPOSIT_X], accrual.protocol_fee_x);
        }
    }

    /// Property: the rate curve is non-decreasing
    #[test]
    fn prop_rate_monotonic(a in 0u128..=WAD, b in 0u128..=WAD) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(annual_rate_wad(low).unwrap() <= annual_rate_wad(high).unwrap());
    }
}

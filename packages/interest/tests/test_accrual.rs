use duoswap_interest::*;
use duoswap_math::*;

const YEAR: u32 = SECONDS_PER_YEAR as u32;

fn input(total_assets: [u128; SLOT_COUNT], duration: u32) -> AccrualInput {
    AccrualInput {
        total_assets,
        lending_tick: 0,
        saturation_wad: 0,
        duration,
    }
}

// ============================================================
// SINGLE ASSET ACCRUAL TESTS
// ============================================================

#[test]
fn test_accrue_x_interest_and_protocol_fee() {
    let (assets, accrual) = accrue_interest(&input([1_000_000, 1_000, 0, 0, 500, 0], YEAR)).unwrap();

    assert_eq!(accrual.utilization_x, WAD / 2);
    // 500 * 5.127%
    assert_eq!(accrual.interest_x, 25);
    assert_eq!(accrual.protocol_fee_x, 2);
    assert_eq!(assets[BORROW_X], 525);
    // Fully deposit-backed: depositors get 23, the fee recipient 2
    assert_eq!(assets[DEPOSIT_X], 1_025);
    assert_eq!(accrual.reserve_interest_x, 0);

    assert_eq!(accrual.interest_y, 0);
    assert_eq!(accrual.interest_l, 0);
    assert_eq!(assets[DEPOSIT_L], 1_000_000);
}

#[test]
fn test_interest_on_reserve_lent_asset_goes_to_reserve() {
    // Nobody deposited Y, the whole borrow came out of the reserve
    let (assets, accrual) = accrue_interest(&input([1_000_000, 0, 0, 0, 0, 50_000], YEAR)).unwrap();

    assert!(accrual.interest_y > 0);
    assert_eq!(accrual.protocol_fee_y, accrual.interest_y / 10);
    assert_eq!(accrual.reserve_interest_y, accrual.interest_y - accrual.protocol_fee_y);
    // Only the fee lands in the empty deposit slot
    assert_eq!(assets[DEPOSIT_Y], accrual.protocol_fee_y);
    assert_eq!(assets[BORROW_Y], 50_000 + accrual.interest_y);
}

#[test]
fn test_interest_split_between_depositors_and_reserve() {
    // 20k of the 50k borrow is deposit-backed
    let (assets, accrual) = accrue_interest(&input([1_000_000, 0, 20_000, 0, 0, 50_000], YEAR)).unwrap();

    let lenders = accrual.interest_y - accrual.protocol_fee_y;
    let depositors = lenders * 2 / 5;
    assert_eq!(assets[DEPOSIT_Y], 20_000 + depositors + accrual.protocol_fee_y);
    assert_eq!(accrual.reserve_interest_y, lenders - depositors);
}

#[test]
fn test_zero_duration_is_a_no_op() {
    let totals = [1_000_000, 1_000, 1_000, 10_000, 500, 500];
    let (assets, accrual) = accrue_interest(&input(totals, 0)).unwrap();
    assert_eq!(assets, totals);
    assert_eq!(accrual.interest_l + accrual.interest_x + accrual.interest_y, 0);
}

// ============================================================
// LIQUIDITY ACCRUAL TESTS
// ============================================================

#[test]
fn test_liquidity_utilization_measured_on_book_liquidity() {
    // 1M L active, 1M more borrowed out
    let (_, accrual) =
        accrue_interest(&input([2_000_000, 0, 0, 1_000_000, 0, 0], 0)).unwrap();
    assert_eq!(accrual.utilization_l, WAD / 2);

    // Book liquidity does not depend on the tick it is valued at
    let mut moved = input([2_000_000, 0, 0, 1_000_000, 0, 0], 0);
    moved.lending_tick = 500;
    let (_, at_tick) = accrue_interest(&moved).unwrap();
    assert!(at_tick.utilization_l.abs_diff(WAD / 2) < WAD / 100_000);
}

#[test]
fn test_liquidity_interest_grows_both_sides() {
    let (assets, accrual) =
        accrue_interest(&input([2_000_000, 0, 0, 1_000_000, 0, 0], YEAR)).unwrap();
    assert!(accrual.interest_l > 0);
    assert_eq!(assets[DEPOSIT_L], 2_000_000 + accrual.interest_l);
    assert_eq!(assets[BORROW_L], 1_000_000 + accrual.interest_l);
    // Active liquidity is unchanged by interest
    assert_eq!(assets[DEPOSIT_L] - assets[BORROW_L], 1_000_000);
}

#[test]
fn test_saturation_raises_liquidity_interest() {
    let totals = [2_000_000, 0, 0, 1_000_000, 0, 0];
    let (_, calm) = accrue_interest(&input(totals, YEAR)).unwrap();

    let mut saturated = input(totals, YEAR);
    saturated.saturation_wad = WAD;
    let (_, stressed) = accrue_interest(&saturated).unwrap();

    assert_eq!(stressed.utilization_l, 900_000_000_000_000_000);
    assert!(stressed.interest_l > calm.interest_l);
}

#[test]
fn test_invalid_saturation_aborts_accrual() {
    let mut bad = input([2_000_000, 0, 0, 1_000_000, 0, 0], YEAR);
    bad.saturation_wad = WAD + 1;
    assert_eq!(accrue_interest(&bad), Err(DuoError::InvalidSaturationState));
}

// ============================================================
// CAP TESTS
// ============================================================

#[test]
fn test_interest_capped_at_max_assets() {
    let near_max = u128::MAX - 10;
    let (assets, accrual) =
        accrue_interest(&input([1_000_000, near_max, 0, 0, near_max, 0], YEAR)).unwrap();
    assert_eq!(accrual.interest_x, 10);
    assert_eq!(assets[DEPOSIT_X], u128::MAX);
    assert_eq!(assets[BORROW_X], u128::MAX);
}

// ============================================================
// PROTOCOL FEE SHARES TESTS
// ============================================================

#[test]
fn test_protocol_fee_shares() {
    assert_eq!(protocol_fee_shares(0, 1_000, 1_000), Ok(0));
    // 1000 shares backed by 1000 assets, then 100 fee assets added
    assert_eq!(protocol_fee_shares(100, 1_100, 1_000), Ok(100));
    // 2 assets per share
    assert_eq!(protocol_fee_shares(100, 2_100, 1_000), Ok(50));
}

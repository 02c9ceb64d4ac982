// Interest accrual over the six asset totals
//
// Borrowers' debt grows by the full interest. X and Y lenders are the
// depositors of that asset for the part of the borrow they fund, and the
// pool reserve for the rest; each is credited its share.

use ethnum::U256;

use duoswap_math::convert::{mul_div_u256, u256_to_u128};
use duoswap_math::{
    geometric_liquidity, get_reserves_at_tick, mul_div, to_shares, DuoError, BORROW_L, BORROW_X,
    BORROW_Y, DEPOSIT_L, DEPOSIT_X, DEPOSIT_Y, MAX_ASSETS, SLOT_COUNT, WAD,
};

use crate::constants::PROTOCOL_FEE_PERCENT;
use crate::rates::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccrualInput {
    pub total_assets: [u128; SLOT_COUNT],
    /// The oracle's lending-state tick
    pub lending_tick: i32,
    pub saturation_wad: u128,
    pub duration: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterestAccrual {
    pub interest_l: u128,
    pub interest_x: u128,
    pub interest_y: u128,
    /// Part of `interest_x` owed to the fee recipient
    pub protocol_fee_x: u128,
    pub protocol_fee_y: u128,
    /// Part of `interest_x` earned by X lent out of the reserve
    pub reserve_interest_x: u128,
    pub reserve_interest_y: u128,
    pub utilization_l: u128,
    pub utilization_x: u128,
    pub utilization_y: u128,
}

/// Accrue `duration` seconds of interest. Returns the updated asset
/// totals and the breakdown; the caller adds the reserve interest to
/// the pool reserves.
pub fn accrue_interest(input: &AccrualInput) -> Result<([u128; SLOT_COUNT], InterestAccrual), DuoError> {
    let mut assets = input.total_assets;
    let mut accrual = InterestAccrual::default();

    let book_l = book_liquidity(assets[DEPOSIT_L].saturating_sub(assets[BORROW_L]), input.lending_tick)?;
    let raw_l = utilization_wad(
        assets[BORROW_L],
        book_l.checked_add(assets[BORROW_L]).ok_or(DuoError::Overflow)?,
    )?;
    accrual.utilization_l = saturation_adjusted_utilization(raw_l, input.saturation_wad)?;
    accrual.utilization_x = utilization_wad(assets[BORROW_X], assets[DEPOSIT_X])?;
    accrual.utilization_y = utilization_wad(assets[BORROW_Y], assets[DEPOSIT_Y])?;

    if input.duration == 0 {
        return Ok((assets, accrual));
    }

    let growth_l = compound_growth_wad(l_annual_rate_wad(accrual.utilization_l)?, input.duration)?;
    let growth_x = compound_growth_wad(annual_rate_wad(accrual.utilization_x)?, input.duration)?;
    let growth_y = compound_growth_wad(annual_rate_wad(accrual.utilization_y)?, input.duration)?;

    accrual.interest_l = capped_interest(&assets, DEPOSIT_L, BORROW_L, growth_l)?;
    accrual.interest_x = capped_interest(&assets, DEPOSIT_X, BORROW_X, growth_x)?;
    accrual.interest_y = capped_interest(&assets, DEPOSIT_Y, BORROW_Y, growth_y)?;

    let split_x = split_interest(accrual.interest_x, assets[DEPOSIT_X], assets[BORROW_X])?;
    let split_y = split_interest(accrual.interest_y, assets[DEPOSIT_Y], assets[BORROW_Y])?;
    accrual.protocol_fee_x = split_x.protocol_fee;
    accrual.protocol_fee_y = split_y.protocol_fee;
    accrual.reserve_interest_x = split_x.reserve;
    accrual.reserve_interest_y = split_y.reserve;

    assets[DEPOSIT_L] += accrual.interest_l;
    assets[BORROW_L] += accrual.interest_l;
    // The protocol fee is minted as deposit shares, so its assets sit in
    // the deposit total
    assets[DEPOSIT_X] += split_x.depositors + split_x.protocol_fee;
    assets[BORROW_X] += accrual.interest_x;
    assets[DEPOSIT_Y] += split_y.depositors + split_y.protocol_fee;
    assets[BORROW_Y] += accrual.interest_y;

    Ok((assets, accrual))
}

/// Pool liquidity valued on the book at the lending tick. Swap fees
/// sitting in the live reserves are not counted.
fn book_liquidity(active_l: u128, lending_tick: i32) -> Result<u128, DuoError> {
    let (book_x, book_y) = get_reserves_at_tick(active_l, lending_tick)?;
    geometric_liquidity(book_x, book_y)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct InterestSplit {
    protocol_fee: u128,
    depositors: u128,
    reserve: u128,
}

/// Fee first, then depositors in proportion to min(deposited, borrowed)
/// / borrowed. The reserve lent the rest.
fn split_interest(interest: u128, deposited: u128, borrowed: u128) -> Result<InterestSplit, DuoError> {
    if interest == 0 {
        return Ok(InterestSplit::default());
    }
    let protocol_fee = mul_div(interest, PROTOCOL_FEE_PERCENT, 100, false)?;
    let lenders = interest - protocol_fee;
    let depositors = mul_div(lenders, deposited.min(borrowed), borrowed, false)?;
    Ok(InterestSplit {
        protocol_fee,
        depositors,
        reserve: lenders - depositors,
    })
}

/// Interest on the borrow slot, limited so neither side passes MAX_ASSETS
fn capped_interest(
    assets: &[u128; SLOT_COUNT],
    deposit_slot: usize,
    borrow_slot: usize,
    growth_wad: u128,
) -> Result<u128, DuoError> {
    let raw = mul_div_u256(
        U256::new(assets[borrow_slot]),
        U256::new(growth_wad),
        U256::new(WAD),
        false,
    )?;
    let headroom = MAX_ASSETS - assets[deposit_slot].max(assets[borrow_slot]);
    u256_to_u128(raw.min(U256::new(headroom)))
}

/// Deposit shares worth `fee` once the fee is already in `total_assets_after`
pub fn protocol_fee_shares(fee: u128, total_assets_after: u128, total_shares: u128) -> Result<u128, DuoError> {
    if fee == 0 {
        return Ok(0);
    }
    to_shares(fee, total_assets_after.saturating_sub(fee), total_shares, false)
}

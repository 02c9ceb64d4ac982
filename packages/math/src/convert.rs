// SPDX-License-Identifier: MIT
// Share/asset conversion and rounding-directed multiply-divide

use ethnum::U256;

use crate::constants::{DEPLETION_BUFFER_PERCENT, MAX_RESERVE, MAX_SHARES, PERCENT};
use crate::error::DuoError;

/// Narrow a 256-bit value back to 128 bits
#[inline]
pub fn u256_to_u128(value: U256) -> Result<u128, DuoError> {
    let (high, low) = value.into_words();
    if high != 0 {
        return Err(DuoError::Overflow);
    }
    Ok(low)
}

/// (x * y) / z with a 256-bit intermediate, floor or ceiling
pub fn mul_div_u256(x: U256, y: U256, z: U256, round_up: bool) -> Result<U256, DuoError> {
    if z == U256::ZERO {
        return Err(DuoError::DivisionByZero);
    }
    let product = x.checked_mul(y).ok_or(DuoError::Overflow)?;
    let quotient = product / z;
    if round_up && product % z != U256::ZERO {
        return quotient.checked_add(U256::ONE).ok_or(DuoError::Overflow);
    }
    Ok(quotient)
}

/// (x * y) / z rounded down, or up when `round_up`.
///
/// Every other conversion in the workspace goes through this function so
/// the rounding direction is always explicit at the call site.
pub fn mul_div(x: u128, y: u128, z: u128, round_up: bool) -> Result<u128, DuoError> {
    let result = mul_div_u256(U256::new(x), U256::new(y), U256::new(z), round_up)?;
    u256_to_u128(result)
}

/// Ceiling division
#[inline]
pub fn div_round_up(numerator: u128, denominator: u128) -> Result<u128, DuoError> {
    if denominator == 0 {
        return Err(DuoError::DivisionByZero);
    }
    let quotient = numerator / denominator;
    if numerator % denominator != 0 {
        Ok(quotient + 1)
    } else {
        Ok(quotient)
    }
}

/// Assets to shares of a ledger slot. 1:1 while the slot is empty.
pub fn to_shares(
    assets: u128,
    total_assets: u128,
    total_shares: u128,
    round_up: bool,
) -> Result<u128, DuoError> {
    if total_assets == 0 || total_shares == 0 {
        return Ok(assets);
    }
    mul_div(assets, total_shares, total_assets, round_up)
}

/// Shares to assets of a ledger slot. 1:1 while the slot is empty.
pub fn to_assets(
    shares: u128,
    total_assets: u128,
    total_shares: u128,
    round_up: bool,
) -> Result<u128, DuoError> {
    if total_shares == 0 {
        return Ok(shares);
    }
    mul_div(shares, total_assets, total_shares, round_up)
}

/// Liquidity credited for `amount` of one asset added to the pool.
///
/// The asset's effective reserve is `reserve - missing`. Once missing
/// assets eat into the last 5% of the reserve, the effective reserve is
/// pinned at that 5% buffer, so providers of a depleted asset are
/// credited proportionally more liquidity.
///
/// Returns `(liquidity_assets, liquidity_shares)`, both rounded down.
pub fn calc_liquidity_considering_depletion(
    amount: u128,
    reserve: u128,
    missing: u128,
    active_liquidity_assets: u128,
    deposit_l_assets: u128,
    deposit_l_shares: u128,
) -> Result<(u128, u128), DuoError> {
    if reserve == 0 {
        return Err(DuoError::InsufficientLiquidity);
    }

    let buffered_reserve = U256::new(reserve) * U256::new(DEPLETION_BUFFER_PERCENT);
    let scaled_missing = U256::new(missing) * U256::new(PERCENT);

    let effective_reserve = if buffered_reserve >= scaled_missing {
        reserve - missing.min(reserve)
    } else {
        // Depleted: pin at the 5% buffer
        mul_div(reserve, PERCENT - DEPLETION_BUFFER_PERCENT, PERCENT, false)?
    };
    if effective_reserve == 0 {
        return Err(DuoError::InsufficientLiquidity);
    }

    let liquidity_assets = mul_div(amount, active_liquidity_assets, effective_reserve, false)?;
    let liquidity_shares =
        to_shares(liquidity_assets, deposit_l_assets, deposit_l_shares, false)?;
    Ok((liquidity_assets, liquidity_shares))
}

/// Checked downcast for token transfers
#[inline]
pub fn to_i128(value: u128) -> Result<i128, DuoError> {
    i128::try_from(value).map_err(|_| DuoError::Overflow)
}

/// Checked bound for reserves
#[inline]
pub fn to_u112(value: u128) -> Result<u128, DuoError> {
    if value > MAX_RESERVE {
        return Err(DuoError::Overflow);
    }
    Ok(value)
}

/// Checked bound for share totals
#[inline]
pub fn check_shares(value: u128) -> Result<u128, DuoError> {
    if value > MAX_SHARES {
        return Err(DuoError::Overflow);
    }
    Ok(value)
}

/// Integer square root, rounded down (Newton iteration)
pub fn sqrt_u256(value: U256) -> U256 {
    if value < U256::new(2) {
        return value;
    }
    // Start above the root: 2^ceil(bits/2)
    let bits = 256 - value.leading_zeros();
    let mut x0 = U256::ONE << ((bits + 1) / 2);
    loop {
        let x1 = (x0 + value / x0) >> 1u32;
        if x1 >= x0 {
            return x0;
        }
        x0 = x1;
    }
}

// SPDX-License-Identifier: MIT
// Quadratic swap fee curve
//
// The fee grows with the square of how far a swap pushes the input
// reserve beyond its value at the start of the ledger. Round trips that
// walk the price away and back inside one ledger pay for the distance.

use ethnum::U256;

use crate::constants::{BIPS, MAX_SWAP_FEE_BIPS, MIN_SWAP_FEE_BIPS, SWAP_FEE_QUADRATIC_DIVISOR};
use crate::convert::{mul_div, u256_to_u128};
use crate::error::DuoError;

/// Displacement (bips) above which the fee is pinned at the maximum
const MAX_DISPLACEMENT_BIPS: u128 = 10 * BIPS;

/// Fee in bips for adding `amount_in` to a reserve that stood at
/// `reference_reserve` at the start of the ledger.
pub fn calculate_swap_fee_bips(
    amount_in: u128,
    reference_reserve: u128,
    current_reserve: u128,
) -> Result<u128, DuoError> {
    if reference_reserve == 0 {
        return Ok(MIN_SWAP_FEE_BIPS);
    }

    let reserve_after = current_reserve.checked_add(amount_in).ok_or(DuoError::Overflow)?;
    if reserve_after <= reference_reserve {
        return Ok(MIN_SWAP_FEE_BIPS);
    }

    let displacement_bips = mul_div(reserve_after - reference_reserve, BIPS, reference_reserve, false)?;
    if displacement_bips >= MAX_DISPLACEMENT_BIPS {
        return Ok(MAX_SWAP_FEE_BIPS);
    }

    let quadratic = displacement_bips * displacement_bips / SWAP_FEE_QUADRATIC_DIVISOR;
    Ok((MIN_SWAP_FEE_BIPS + quadratic).min(MAX_SWAP_FEE_BIPS))
}

/// Output of a constant-product swap after the input fee
pub fn get_amount_out(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee_bips: u128,
) -> Result<u128, DuoError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(DuoError::InsufficientLiquidity);
    }
    let amount_in_with_fee = U256::new(amount_in) * U256::new(BIPS - fee_bips.min(BIPS));
    let numerator = amount_in_with_fee * U256::new(reserve_out);
    let denominator = U256::new(reserve_in) * U256::new(BIPS) + amount_in_with_fee;
    u256_to_u128(numerator / denominator)
}

/// Balances and fees of one swap, with reserves already reduced by the
/// missing (lent-out) amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapCheck {
    pub balance_x: u128,
    pub balance_y: u128,
    pub amount_x_in: u128,
    pub amount_y_in: u128,
    pub fee_x_bips: u128,
    pub fee_y_bips: u128,
    pub reserve_x: u128,
    pub reserve_y: u128,
}

/// (bx - fx * ix) * (by - fy * iy) >= rx * ry, all scaled by BIPS.
pub fn check_constant_product(check: &SwapCheck) -> Result<(), DuoError> {
    let adjusted_x = fee_adjusted_balance(check.balance_x, check.amount_x_in, check.fee_x_bips)?;
    let adjusted_y = fee_adjusted_balance(check.balance_y, check.amount_y_in, check.fee_y_bips)?;

    let scale_squared = U256::new(BIPS * BIPS);
    let before = (U256::new(check.reserve_x) * U256::new(check.reserve_y))
        .checked_mul(scale_squared)
        .ok_or(DuoError::Overflow)?;
    let after = adjusted_x.checked_mul(adjusted_y).ok_or(DuoError::Overflow)?;
    if after < before {
        return Err(DuoError::ConstantProductViolated);
    }
    Ok(())
}

/// balance * BIPS - amount_in * fee_bips
fn fee_adjusted_balance(balance: u128, amount_in: u128, fee_bips: u128) -> Result<U256, DuoError> {
    (U256::new(balance) * U256::new(BIPS))
        .checked_sub(U256::new(amount_in) * U256::new(fee_bips))
        .ok_or(DuoError::Overflow)
}

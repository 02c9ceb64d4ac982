// SPDX-License-Identifier: MIT
// Liquidity unit conversions
//
// One unit of L at sqrt price s (sqrt of X per Y) is backed by s X and
// 1/s Y. Valuing a single asset in L therefore counts half a unit per
// matching reserve amount.

use ethnum::U256;

use crate::constants::Q72;
use crate::convert::{mul_div, mul_div_u256, sqrt_u256, u256_to_u128};
use crate::error::DuoError;
use crate::tick_math::{get_price_q128_from_reserves, get_sqrt_price_at_tick};

/// Value of `amount_x` in L units: x / (2 s)
pub fn convert_x_to_l(amount_x: u128, sqrt_price_q72: u128, round_up: bool) -> Result<u128, DuoError> {
    let denominator = sqrt_price_q72.checked_mul(2).ok_or(DuoError::Overflow)?;
    mul_div(amount_x, Q72, denominator, round_up)
}

/// Value of `amount_y` in L units: y * s / 2
pub fn convert_y_to_l(amount_y: u128, sqrt_price_q72: u128, round_up: bool) -> Result<u128, DuoError> {
    let result = mul_div_u256(
        U256::new(amount_y),
        U256::new(sqrt_price_q72),
        U256::new(Q72) * U256::new(2),
        round_up,
    )?;
    u256_to_u128(result)
}

/// X backing `liquidity` at sqrt price s: L * s
pub fn convert_l_to_x(liquidity: u128, sqrt_price_q72: u128, round_up: bool) -> Result<u128, DuoError> {
    mul_div(liquidity, sqrt_price_q72, Q72, round_up)
}

/// Y backing `liquidity` at sqrt price s: L / s
pub fn convert_l_to_y(liquidity: u128, sqrt_price_q72: u128, round_up: bool) -> Result<u128, DuoError> {
    mul_div(liquidity, Q72, sqrt_price_q72, round_up)
}

/// Reserves an amount of active liquidity would hold at `tick`
pub fn get_reserves_at_tick(active_liquidity: u128, tick: i32) -> Result<(u128, u128), DuoError> {
    let sqrt_price = get_sqrt_price_at_tick(tick)?;
    Ok((
        convert_l_to_x(active_liquidity, sqrt_price, false)?,
        convert_l_to_y(active_liquidity, sqrt_price, false)?,
    ))
}

/// sqrt(x * y), rounded down
pub fn geometric_liquidity(amount_x: u128, amount_y: u128) -> Result<u128, DuoError> {
    u256_to_u128(sqrt_u256(U256::new(amount_x) * U256::new(amount_y)))
}

/// sqrt(reserve_x / reserve_y) in Q72, clamped into the tick ladder
pub fn sqrt_price_from_reserves(reserve_x: u128, reserve_y: u128) -> Result<u128, DuoError> {
    let price_q128 = get_price_q128_from_reserves(reserve_x, reserve_y)?;
    u256_to_u128(sqrt_u256(price_q128 << 16u32))
}

/// sqrt(rx * ry) / active_liquidity in Q72. Grows above 1.0 as swap fees
/// accumulate in the reserves.
pub fn active_liquidity_scaler_q72(
    reserve_x: u128,
    reserve_y: u128,
    active_liquidity: u128,
) -> Result<u128, DuoError> {
    if active_liquidity == 0 {
        return Ok(Q72);
    }
    let pool_liquidity = geometric_liquidity(reserve_x, reserve_y)?;
    mul_div(pool_liquidity, Q72, active_liquidity, false)
}

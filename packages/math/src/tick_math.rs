// SPDX-License-Identifier: MIT
// Tick <-> price conversion on the B = 512/511 ladder
//
// Prices are X per Y. sqrt prices are Q72, prices Q128.

use ethnum::{I256, U256};

use crate::constants::{
    INV_LOG2_BASE_Q64, LOG2_FRACTION_ITERATIONS, MAX_PRICE_Q128_WORDS, MAX_TICK,
    MIN_PRICE_Q128, MIN_TICK,
};
use crate::convert::{mul_div_u256, u256_to_u128};
use crate::error::DuoError;

/// B^(-2^k / 2) * 2^128 for k = 0..16
const SQRT_BASE_POWERS_Q128: [u128; 17] = [
    339949897504065387281618161915820656447,
    339617752923046005526922703901628039168,
    338954436999368181297377932995570171904,
    337631689238403392290316098181672206336,
    335001659385023459046155481950627823616,
    329802901061852553556473460197929419231,
    319646164839584006827037033211239716998,
    300261431766735186543153701149142401424,
    264947397134912131740717104983724499556,
    206290804556659596930203632294964887221,
    125060538486619279490362430322732528338,
    45962235504835979311684629540497146043,
    6208159158281721051195744790720458276,
    113262525129643042834516287487048706,
    37699278146033304845311827830006,
    4176635967335314767284741,
    51264155005,
];

/// Q128 -> Q72
const Q128_TO_Q72_SHIFT: u32 = 56;

/// Slack (in Q64 log2 units) around the log2 estimate, 2^-16
const LOG2_MARGIN_Q64: i128 = 1 << 48;

#[inline]
pub fn max_price_q128() -> U256 {
    U256::from_words(MAX_PRICE_Q128_WORDS.0, MAX_PRICE_Q128_WORDS.1)
}

#[inline]
pub fn min_price_q128() -> U256 {
    U256::new(MIN_PRICE_Q128)
}

/// sqrt(B^tick) in Q72, rounded up.
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128, DuoError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(DuoError::TickOutOfBounds);
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = U256::ONE << 128u32;
    for (bit, multiplier) in SQRT_BASE_POWERS_Q128.iter().enumerate() {
        if abs_tick & (1 << bit) != 0 {
            ratio = (ratio * U256::new(*multiplier)) >> 128u32;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let mask = (U256::ONE << Q128_TO_Q72_SHIFT) - U256::ONE;
    let mut sqrt_price = ratio >> Q128_TO_Q72_SHIFT;
    if ratio & mask != U256::ZERO {
        sqrt_price += U256::ONE;
    }
    u256_to_u128(sqrt_price)
}

/// B^tick in Q128, derived from the sqrt price so that both directions
/// of the ladder agree bit for bit.
pub fn get_price_at_tick(tick: i32) -> Result<U256, DuoError> {
    let sqrt_price = U256::new(get_sqrt_price_at_tick(tick)?);
    Ok((sqrt_price * sqrt_price) >> 16u32)
}

/// Greatest tick whose price does not exceed `price_q128`.
pub fn get_tick_at_price(price_q128: U256) -> Result<i32, DuoError> {
    if price_q128 < min_price_q128() || price_q128 > max_price_q128() {
        return Err(DuoError::PriceOutOfBounds);
    }

    // Integer part of log2(price) from the leading bit
    let msb = 255 - price_q128.leading_zeros() as i32;
    let mut log2_q64: i128 = ((msb - 128) as i128) << 64;

    // Normalize into [2^127, 2^128) and square for the fractional bits
    let mut r = if msb >= 127 {
        price_q128 >> ((msb - 127) as u32)
    } else {
        price_q128 << ((127 - msb) as u32)
    };
    for i in 0..LOG2_FRACTION_ITERATIONS {
        r = (r * r) >> 127u32;
        let carry = r >> 128u32;
        if carry != U256::ZERO {
            log2_q64 += 1i128 << (63 - i);
            r >>= 1u32;
        }
    }

    // The estimate is truncated by less than 2^-9, so the true tick is one
    // of two neighbours.
    let truncation: i128 = 1i128 << (64 - LOG2_FRACTION_ITERATIONS);
    let inv_log2_base = I256::new(INV_LOG2_BASE_Q64 as i128);
    let tick_low = floor_q128(I256::new(log2_q64 - LOG2_MARGIN_Q64) * inv_log2_base);
    let tick_high =
        floor_q128(I256::new(log2_q64 + truncation + LOG2_MARGIN_Q64) * inv_log2_base);

    let tick_low = tick_low.clamp(MIN_TICK, MAX_TICK);
    let tick_high = tick_high.clamp(MIN_TICK, MAX_TICK);
    if tick_low == tick_high {
        return Ok(tick_low);
    }
    if get_price_at_tick(tick_high)? <= price_q128 {
        Ok(tick_high)
    } else {
        Ok(tick_low)
    }
}

/// Arithmetic shift by 128 (floor) narrowed to a tick
#[inline]
fn floor_q128(value: I256) -> i32 {
    let (_, low) = (value >> 128u32).into_words();
    low as i32
}

/// Price (X per Y) of a pair of reserves in Q128, clamped into the ladder
pub fn get_price_q128_from_reserves(reserve_x: u128, reserve_y: u128) -> Result<U256, DuoError> {
    if reserve_y == 0 {
        return Err(DuoError::DivisionByZero);
    }
    let price = mul_div_u256(
        U256::new(reserve_x),
        U256::ONE << 128u32,
        U256::new(reserve_y),
        false,
    )?;
    Ok(price.clamp(min_price_q128(), max_price_q128()))
}

/// Tick of the current reserves, clamped into [MIN_TICK, MAX_TICK]
pub fn get_tick_at_reserves(reserve_x: u128, reserve_y: u128) -> Result<i32, DuoError> {
    get_tick_at_price(get_price_q128_from_reserves(reserve_x, reserve_y)?)
}

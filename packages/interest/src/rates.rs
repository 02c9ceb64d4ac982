// Utilization -> rate curve

use duoswap_math::{mul_div, DuoError, WAD};

use crate::constants::*;

/// ceil(borrowed * WAD / deposited), capped at WAD
pub fn utilization_wad(borrowed: u128, deposited: u128) -> Result<u128, DuoError> {
    if borrowed == 0 {
        return Ok(0);
    }
    if deposited == 0 {
        return Ok(WAD);
    }
    Ok(mul_div(borrowed, WAD, deposited, true)?.min(WAD))
}

/// Piecewise-linear annual rate for the single-asset slots
pub fn annual_rate_wad(utilization: u128) -> Result<u128, DuoError> {
    let u = utilization.min(WAD);
    if u <= OPTIMAL_UTILIZATION_WAD {
        mul_div(u, SLOPE_LOW_WAD, WAD, false)
    } else if u <= DANGER_UTILIZATION_WAD {
        let excess = mul_div(u - OPTIMAL_UTILIZATION_WAD, SLOPE_MID_WAD, WAD, false)?;
        Ok(OFFSET_MID_WAD + excess)
    } else {
        let excess = mul_div(u - DANGER_UTILIZATION_WAD, SLOPE_HIGH_WAD, WAD, false)?;
        Ok(OFFSET_HIGH_WAD + excess)
    }
}

pub fn l_annual_rate_wad(utilization: u128) -> Result<u128, DuoError> {
    Ok(annual_rate_wad(utilization)? * L_RATE_MULTIPLIER)
}

/// Pushes L utilization toward 90% once saturation passes 85%, in
/// proportion to how far saturation is into the last 15%.
pub fn saturation_adjusted_utilization(utilization: u128, saturation_wad: u128) -> Result<u128, DuoError> {
    if saturation_wad > WAD {
        return Err(DuoError::InvalidSaturationState);
    }
    if saturation_wad <= SATURATION_PENALTY_START_WAD
        || utilization >= SATURATION_UTILIZATION_TARGET_WAD
    {
        return Ok(utilization);
    }

    let push = mul_div(
        SATURATION_UTILIZATION_TARGET_WAD - utilization,
        saturation_wad - SATURATION_PENALTY_START_WAD,
        SATURATION_PENALTY_RANGE_WAD,
        false,
    )?;
    Ok(utilization + push)
}

/// e^(r t) - 1 by its third-order Taylor expansion, in WAD
pub fn compound_growth_wad(annual_rate_wad: u128, duration: u32) -> Result<u128, DuoError> {
    if annual_rate_wad == 0 || duration == 0 {
        return Ok(0);
    }
    let x = mul_div(annual_rate_wad, duration as u128, SECONDS_PER_YEAR, false)?;
    let x2 = mul_div(x, x, WAD, false)?;
    let x3 = mul_div(x2, x, WAD, false)?;
    x.checked_add(x2 / 2)
        .and_then(|sum| sum.checked_add(x3 / 6))
        .ok_or(DuoError::Overflow)
}

// Hard liquidation
//
// The allowed premium follows the borrower's LTV before liquidation:
//   < 60%      0 (nothing may be seized)
//   60% - 75%  0 -> 10000 bips, seizing at a discount
//   75% - 90%  10000 -> 11111 bips
//   >= 90%     11111 bips

use duoswap_math::{mul_div, DuoError, BIPS};
use duoswap_validation::Valuation;
use ethnum::U256;

use crate::params::{premium_bips, LiquidationValue};

pub const LTV_PREMIUM_START_BIPS: u128 = 6_000;
pub const LTV_NEUTRAL_BIPS: u128 = 7_500;
pub const LTV_PREMIUM_CAP_BIPS: u128 = 9_000;
pub const MAX_HARD_PREMIUM_BIPS: u128 = 11_111;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HardLiquidationOutcome {
    pub ltv_bips: u128,
    pub premium_bips: u128,
    pub max_premium_bips: u128,
    /// Premium is above the LTV schedule; only the saturation
    /// collaborator can still approve it
    pub exceeds_schedule: bool,
    /// Collateral cannot cover the debt at this premium
    pub bad_debt: bool,
}

/// Net debt / net collateral in bips, rounded up
pub fn ltv_bips(valuation: &Valuation) -> Result<u128, DuoError> {
    if valuation.debt_l == 0 {
        return Ok(0);
    }
    if valuation.collateral_l == 0 {
        return Ok(u128::MAX);
    }
    mul_div(valuation.debt_l, BIPS, valuation.collateral_l, true)
}

pub fn max_hard_premium_bips(ltv_bips: u128) -> u128 {
    if ltv_bips < LTV_PREMIUM_START_BIPS {
        0
    } else if ltv_bips < LTV_NEUTRAL_BIPS {
        (ltv_bips - LTV_PREMIUM_START_BIPS) * BIPS / (LTV_NEUTRAL_BIPS - LTV_PREMIUM_START_BIPS)
    } else if ltv_bips < LTV_PREMIUM_CAP_BIPS {
        BIPS + (ltv_bips - LTV_NEUTRAL_BIPS) * (MAX_HARD_PREMIUM_BIPS - BIPS)
            / (LTV_PREMIUM_CAP_BIPS - LTV_NEUTRAL_BIPS)
    } else {
        MAX_HARD_PREMIUM_BIPS
    }
}

pub fn evaluate_hard(
    valuation: &Valuation,
    value: &LiquidationValue,
) -> Result<HardLiquidationOutcome, DuoError> {
    if valuation.debt_l == 0 {
        return Err(DuoError::NotLiquidatable);
    }

    let ltv = ltv_bips(valuation)?;
    let premium = premium_bips(value)?;
    let max_premium = max_hard_premium_bips(ltv);

    // premium > collateral / debt
    let bad_debt = U256::new(premium) * U256::new(valuation.debt_l)
        > U256::new(valuation.collateral_l) * U256::new(BIPS);

    Ok(HardLiquidationOutcome {
        ltv_bips: ltv,
        premium_bips: premium,
        max_premium_bips: max_premium,
        exceeds_schedule: premium > max_premium,
        bad_debt,
    })
}

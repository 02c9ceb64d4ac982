// Liquidation amounts and their valuation
//
// Seized collateral is valued high and repaid debt low, so rounding and
// price range always work against the liquidator.

use duoswap_math::{
    convert_x_to_l, convert_y_to_l, mul_div, DuoError, BIPS, BORROW_L, BORROW_X, BORROW_Y,
    DEPOSIT_L, DEPOSIT_X, DEPOSIT_Y, Q72,
};
use duoswap_validation::InputParams;

/// Asset amounts a liquidator takes from and repays for a borrower
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidationParams {
    pub deposit_l: u128,
    pub deposit_x: u128,
    pub deposit_y: u128,
    pub repay_l: u128,
    pub repay_x: u128,
    pub repay_y: u128,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidationValue {
    pub seized_l: u128,
    pub repaid_l: u128,
}

pub fn value_liquidation(
    borrower: &InputParams,
    params: &LiquidationParams,
) -> Result<LiquidationValue, DuoError> {
    let held = &borrower.user_assets;
    if params.deposit_l > held[DEPOSIT_L]
        || params.deposit_x > held[DEPOSIT_X]
        || params.deposit_y > held[DEPOSIT_Y]
    {
        return Err(DuoError::ExcessiveDepositRequested);
    }
    if params.repay_l > held[BORROW_L] || params.repay_x > held[BORROW_X] || params.repay_y > held[BORROW_Y] {
        return Err(DuoError::InvalidAmount);
    }

    let scaler = borrower.active_liquidity_scaler_q72;
    let s_min = borrower.sqrt_price_min_q72;
    let s_max = borrower.sqrt_price_max_q72;

    let seized_l = sum3(
        mul_div(params.deposit_l, scaler, Q72, true)?,
        convert_x_to_l(params.deposit_x, s_min, true)?,
        convert_y_to_l(params.deposit_y, s_max, true)?,
    )?;
    let repaid_l = sum3(
        mul_div(params.repay_l, scaler, Q72, false)?,
        convert_x_to_l(params.repay_x, s_max, false)?,
        convert_y_to_l(params.repay_y, s_min, false)?,
    )?;

    Ok(LiquidationValue { seized_l, repaid_l })
}

/// seized / repaid in bips, rounded up
pub fn premium_bips(value: &LiquidationValue) -> Result<u128, DuoError> {
    if value.repaid_l == 0 {
        return Err(DuoError::NotLiquidatable);
    }
    mul_div(value.seized_l, BIPS, value.repaid_l, true)
}

#[inline]
fn sum3(a: u128, b: u128, c: u128) -> Result<u128, DuoError> {
    a.checked_add(b)
        .and_then(|ab| ab.checked_add(c))
        .ok_or(DuoError::Overflow)
}

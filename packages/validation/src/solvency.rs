// Solvency checks

use duoswap_math::{
    mul_div, DuoError, BORROW_L, BORROW_X, BORROW_Y, DEPOSIT_L, DEPOSIT_X, DEPOSIT_Y, Q72,
};
use ethnum::U256;

use crate::valuation::{value_position, InputParams, Valuation};

/// Debt after slippage may be at most this percent of collateral
pub const MAX_LTV_PERCENT: u128 = 75;

/// Net deposits must stay at least 1/LEVERAGE_PERCENT of gross deposits
pub const LEVERAGE_PERCENT: u128 = 100;

/// Amounts the LTV check compares, all in L units
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckLtvParams {
    pub collateral_l: u128,
    pub debt_l: u128,
    /// Active liquidity a liquidator could trade against
    pub available_liquidity_l: u128,
}

/// An account may not hold a deposit and a borrow of the same asset
pub fn check_same_asset(user_assets: &[u128]) -> Result<(), DuoError> {
    for (deposit, borrow) in [(DEPOSIT_L, BORROW_L), (DEPOSIT_X, BORROW_X), (DEPOSIT_Y, BORROW_Y)] {
        if user_assets[deposit] > 0 && user_assets[borrow] > 0 {
            return Err(DuoError::SameAssetCollateralAndDebt);
        }
    }
    Ok(())
}

/// ceil(L * debt / (L - debt)): the debt inflated by the price impact of
/// swapping it out of a pool of depth L.
pub fn debt_after_slippage(debt_l: u128, liquidity_l: u128) -> Result<u128, DuoError> {
    if debt_l == 0 {
        return Ok(0);
    }
    if debt_l >= liquidity_l {
        return Err(DuoError::InsufficientLiquidityForSlippage);
    }
    mul_div(liquidity_l, debt_l, liquidity_l - debt_l, true)
}

pub fn check_ltv(params: &CheckLtvParams) -> Result<(), DuoError> {
    if params.debt_l == 0 {
        return Ok(());
    }
    if params.collateral_l == 0 {
        return Err(DuoError::DepositNotGreaterThanDebt);
    }
    let adjusted_debt = debt_after_slippage(params.debt_l, params.available_liquidity_l)?;
    let limit = U256::new(params.collateral_l) * U256::new(MAX_LTV_PERCENT);
    if limit < U256::new(adjusted_debt) * U256::new(100) {
        return Err(DuoError::LtvExceeded);
    }
    Ok(())
}

/// (deposits - debts) * 100 >= deposits, on gross values
pub fn check_leverage(deposits_l: u128, debts_l: u128) -> Result<(), DuoError> {
    if debts_l == 0 {
        return Ok(());
    }
    if debts_l > deposits_l {
        return Err(DuoError::LeverageExceeded);
    }
    let equity = U256::new(deposits_l - debts_l) * U256::new(LEVERAGE_PERCENT);
    if equity < U256::new(deposits_l) {
        return Err(DuoError::LeverageExceeded);
    }
    Ok(())
}

/// Full solvency check of one account.
pub fn validate_solvency(params: &InputParams) -> Result<Valuation, DuoError> {
    check_same_asset(&params.user_assets)?;

    let valuation = value_position(params)?;
    if !params.has_debt() {
        return Ok(valuation);
    }

    if valuation.debt_l > 0 && valuation.collateral_l == 0 {
        return Err(DuoError::DepositNotGreaterThanDebt);
    }

    let user_deposit_l = params.user_assets[DEPOSIT_L];
    if params.active_liquidity_assets <= user_deposit_l {
        return Err(DuoError::InsufficientLiquidityForSlippage);
    }
    let available_liquidity_l = mul_div(
        params.active_liquidity_assets - user_deposit_l,
        params.active_liquidity_scaler_q72,
        Q72,
        false,
    )?;

    check_leverage(valuation.deposits_l, valuation.debts_l)?;
    check_ltv(&CheckLtvParams {
        collateral_l: valuation.collateral_l,
        debt_l: valuation.debt_l,
        available_liquidity_l,
    })?;

    Ok(valuation)
}

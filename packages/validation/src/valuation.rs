// SPDX-License-Identifier: MIT
// Position valuation in L units
//
// Every conversion is biased against the account being priced: deposits
// in X and debts in Y use the highest sqrt price of the tick range,
// deposits in Y and debts in X the lowest. Deposits round down, debts up.

use duoswap_math::{
    convert_x_to_l, convert_y_to_l, div_round_up, mul_div, DuoError, BORROW_L, BORROW_X,
    BORROW_Y, DEPOSIT_L, DEPOSIT_X, DEPOSIT_Y, Q72, SLOT_COUNT,
};

/// Valuation context for one account
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputParams {
    /// Asset amounts (not shares) per token slot
    pub user_assets: [u128; SLOT_COUNT],
    pub sqrt_price_min_q72: u128,
    pub sqrt_price_max_q72: u128,
    /// sqrt(rx * ry) / active L, applied to L positions
    pub active_liquidity_scaler_q72: u128,
    /// Book active liquidity (deposited L - borrowed L)
    pub active_liquidity_assets: u128,
    pub reserve_x: u128,
    pub reserve_y: u128,
}

impl InputParams {
    pub fn has_debt(&self) -> bool {
        self.user_assets[BORROW_L] > 0
            || self.user_assets[BORROW_X] > 0
            || self.user_assets[BORROW_Y] > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Valuation {
    /// Gross deposits across L, X and Y
    pub deposits_l: u128,
    /// Gross debts across L, X and Y
    pub debts_l: u128,
    /// Net collateral after per-asset netting
    pub collateral_l: u128,
    /// Net debt after per-asset netting
    pub debt_l: u128,
    /// Net debt sits on the X side
    pub net_debt_x: bool,
}

pub fn value_position(params: &InputParams) -> Result<Valuation, DuoError> {
    let assets = &params.user_assets;
    let scaler = params.active_liquidity_scaler_q72;
    let s_min = params.sqrt_price_min_q72;
    let s_max = params.sqrt_price_max_q72;

    let deposit_l = mul_div(assets[DEPOSIT_L], scaler, Q72, false)?;
    let borrow_l = mul_div(assets[BORROW_L], scaler, Q72, true)?;
    let deposit_x = convert_x_to_l(assets[DEPOSIT_X], s_max, false)?;
    let deposit_y = convert_y_to_l(assets[DEPOSIT_Y], s_min, false)?;
    let borrow_x = convert_x_to_l(assets[BORROW_X], s_min, true)?;
    let borrow_y = convert_y_to_l(assets[BORROW_Y], s_max, true)?;

    // Half of each L position sits on each side
    let deposit_l_on_x = deposit_l / 2;
    let deposit_l_on_y = deposit_l - deposit_l_on_x;
    let borrow_l_on_x = div_round_up(borrow_l, 2)?;
    let borrow_l_on_y = borrow_l - borrow_l_on_x;

    let credit_x = add(deposit_x, deposit_l_on_x)?;
    let credit_y = add(deposit_y, deposit_l_on_y)?;
    let owed_x = add(borrow_x, borrow_l_on_x)?;
    let owed_y = add(borrow_y, borrow_l_on_y)?;

    let (collateral_l, debt_l, net_debt_x) = match (credit_x >= owed_x, credit_y >= owed_y) {
        (true, true) => (add(credit_x - owed_x, credit_y - owed_y)?, 0, false),
        (false, false) => (0, add(owed_x - credit_x, owed_y - credit_y)?, false),
        (true, false) => (credit_x - owed_x, owed_y - credit_y, false),
        (false, true) => (credit_y - owed_y, owed_x - credit_x, true),
    };

    Ok(Valuation {
        deposits_l: add(add(deposit_l, deposit_x)?, deposit_y)?,
        debts_l: add(add(borrow_l, borrow_x)?, borrow_y)?,
        collateral_l,
        debt_l,
        net_debt_x,
    })
}

#[inline]
fn add(a: u128, b: u128) -> Result<u128, DuoError> {
    a.checked_add(b).ok_or(DuoError::Overflow)
}

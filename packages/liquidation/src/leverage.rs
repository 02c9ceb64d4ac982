// Leverage liquidation
//
// Applies only to accounts past the 100x gross leverage bound, typically
// hedged positions whose net debt is zero.

use duoswap_math::{DuoError, BIPS};
use duoswap_validation::{check_leverage, Valuation};
use ethnum::U256;

use crate::params::{premium_bips, LiquidationValue};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeverageLiquidationOutcome {
    pub premium_bips: u128,
    pub max_premium_bips: u128,
    pub bad_debt: bool,
}

/// 10000 + (100 * debts - 99 * deposits) * 10000 / (100 * debts).
/// None while the account is within the leverage bound.
pub fn leverage_max_premium_bips(deposits_l: u128, debts_l: u128) -> Result<Option<u128>, DuoError> {
    if check_leverage(deposits_l, debts_l).is_ok() {
        return Ok(None);
    }
    let scaled_debts = U256::new(debts_l) * U256::new(100);
    // Past the bound 100 * debts > 99 * deposits
    let shortfall = scaled_debts - U256::new(deposits_l) * U256::new(99);
    let (high, extra) = (shortfall * U256::new(BIPS) / scaled_debts).into_words();
    if high != 0 {
        return Err(DuoError::Overflow);
    }
    Ok(Some(BIPS + extra))
}

pub fn evaluate_leverage(
    valuation: &Valuation,
    value: &LiquidationValue,
) -> Result<LeverageLiquidationOutcome, DuoError> {
    let max_premium = leverage_max_premium_bips(valuation.deposits_l, valuation.debts_l)?
        .ok_or(DuoError::NotLiquidatable)?;

    if value.seized_l > valuation.deposits_l {
        return Err(DuoError::ExcessiveDepositRequested);
    }

    let premium = premium_bips(value)?;
    if premium > max_premium {
        return Err(DuoError::PremiumExceedsMax);
    }

    let bad_debt = U256::new(valuation.deposits_l) * U256::new(BIPS)
        < U256::new(valuation.debts_l) * U256::new(max_premium);

    Ok(LeverageLiquidationOutcome {
        premium_bips: premium,
        max_premium_bips: max_premium,
        bad_debt,
    })
}

// Soft liquidation
//
// Triggered when the saturation collaborator reports that the account's
// saturation worsened past its tolerance. The liquidator takes a slice of
// the deposits; no debt is repaid.

use duoswap_math::{mul_div, DuoError, BIPS};

/// Deposit assets to move from the borrower to the liquidator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoftLiquidationParams {
    pub transfer_l: u128,
    pub transfer_x: u128,
    pub transfer_y: u128,
}

pub fn max_soft_premium_bips(sat_change_ratio_bips: u128) -> u128 {
    sat_change_ratio_bips.saturating_sub(BIPS) / 10
}

/// Sum over L, X, Y of transfer / deposited, in bips
pub fn requested_soft_premium_bips(
    params: &SoftLiquidationParams,
    deposited: [u128; 3],
) -> Result<u128, DuoError> {
    let mut premium = 0u128;
    for (transfer, held) in [params.transfer_l, params.transfer_x, params.transfer_y]
        .into_iter()
        .zip(deposited)
    {
        if transfer == 0 {
            continue;
        }
        if held == 0 {
            return Err(DuoError::NoDepositToTransfer);
        }
        if transfer > held {
            return Err(DuoError::ExcessiveDepositRequested);
        }
        premium += mul_div(transfer, BIPS, held, true)?;
    }
    Ok(premium)
}

/// Returns the requested premium when it is within bounds
pub fn evaluate_soft(
    sat_change_ratio_bips: u128,
    params: &SoftLiquidationParams,
    deposited: [u128; 3],
) -> Result<u128, DuoError> {
    if sat_change_ratio_bips <= BIPS {
        return Err(DuoError::NotLiquidatable);
    }
    let premium = requested_soft_premium_bips(params, deposited)?;
    if premium > max_soft_premium_bips(sat_change_ratio_bips) {
        return Err(DuoError::PremiumExceedsMax);
    }
    Ok(premium)
}

// DuoSwap Validation Package
//
// Prices an account's six positions in L units and checks solvency.

#![no_std]

pub mod solvency;
pub mod valuation;

pub use solvency::{
    check_leverage, check_ltv, check_same_asset, debt_after_slippage, validate_solvency,
    CheckLtvParams, LEVERAGE_PERCENT, MAX_LTV_PERCENT,
};
pub use valuation::{value_position, InputParams, Valuation};

// DuoSwap Interest Package

#![no_std]

pub mod accrual;
pub mod constants;
pub mod rates;

pub use accrual::{accrue_interest, protocol_fee_shares, AccrualInput, InterestAccrual};
pub use constants::*;
pub use rates::{
    annual_rate_wad, compound_growth_wad, l_annual_rate_wad, saturation_adjusted_utilization,
    utilization_wad,
};

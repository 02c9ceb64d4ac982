// DuoSwap Liquidation Package
//
// Premium limits for the three liquidation modes. The pair contract
// performs the transfers; this package only decides what is allowed.

#![no_std]

pub mod hard;
pub mod leverage;
pub mod params;
pub mod soft;

pub use hard::{evaluate_hard, ltv_bips, max_hard_premium_bips, HardLiquidationOutcome};
pub use leverage::{evaluate_leverage, leverage_max_premium_bips, LeverageLiquidationOutcome};
pub use params::{premium_bips, value_liquidation, LiquidationParams, LiquidationValue};
pub use soft::{evaluate_soft, max_soft_premium_bips, requested_soft_premium_bips, SoftLiquidationParams};

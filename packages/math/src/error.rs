// Error handling module for DuoSwap
//
// A single contracterror enum shared by every package and the pair
// contract, grouped by failure class:
// - 100s bounds and configuration
// - 200s insufficient funds or liquidity
// - 300s solvency
// - 400s liquidation
// - 500s invariant and arithmetic
// - 600s runtime (lock, collaborator state)

use soroban_sdk::{contracterror, symbol_short, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum DuoError {
    // Bounds / configuration errors (100-199)
    /// Tick outside [MIN_TICK, MAX_TICK]
    TickOutOfBounds = 100,
    /// Price outside the representable ladder range
    PriceOutOfBounds = 101,
    /// Oracle intervals rejected (long term must be >= 14x mid term)
    InvalidObservationConfig = 102,
    /// Market has already been initialized
    AlreadyInitialized = 103,
    /// Market has not been initialized
    NotInitialized = 104,
    /// Saturation tolerance above the protocol maximum
    InvalidSaturationTolerance = 105,
    /// Amount must be positive
    InvalidAmount = 106,
    /// Operation is not allowed on this token slot
    InvalidTokenSlot = 107,

    // Liquidity errors (200-299)
    /// Deposit produced zero liquidity
    InsufficientLiquidityMinted = 200,
    /// Withdrawal produced zero assets
    InsufficientLiquidityBurned = 201,
    /// Pool cannot serve the requested output
    InsufficientLiquidity = 202,
    /// Active liquidity too small to price debt slippage
    InsufficientLiquidityForSlippage = 203,
    /// Account does not hold enough shares
    InsufficientShares = 204,
    /// Swap requested no output
    InsufficientOutputAmount = 205,
    /// Swap received no input
    InsufficientInputAmount = 206,

    // Solvency errors (300-399)
    /// Debt exceeds the maximum loan-to-value
    LtvExceeded = 300,
    /// Position leverage above the allowed bound
    LeverageExceeded = 301,
    /// Collateral is not strictly greater than zero while debt exists
    DepositNotGreaterThanDebt = 302,
    /// Deposit and borrow of the same asset are held together
    SameAssetCollateralAndDebt = 303,

    // Liquidation errors (400-499)
    /// Requested premium above the computed maximum
    PremiumExceedsMax = 400,
    /// Liquidator repaid less than promised
    RepayBelowPromised = 401,
    /// Leverage liquidation seizes more than the deposits
    ExcessiveDepositRequested = 402,
    /// Position is not eligible for this liquidation mode
    NotLiquidatable = 403,
    /// Transfer requested from an empty deposit
    NoDepositToTransfer = 404,

    // Invariant / arithmetic errors (500-599)
    /// Swap broke the constant product
    ConstantProductViolated = 500,
    /// Unsafe downcast or overflow
    Overflow = 501,
    /// Division by zero
    DivisionByZero = 502,

    // Runtime errors (600-699)
    /// Reentrant call while the lock is held
    Locked = 600,
    /// Saturation collaborator reported an invalid state
    InvalidSaturationState = 601,
}

impl DuoError {
    /// Short symbol for event payloads and previews
    pub fn to_symbol(&self) -> Symbol {
        match self {
            DuoError::LtvExceeded => symbol_short!("LTV"),
            DuoError::LeverageExceeded => symbol_short!("LEVERAGE"),
            DuoError::InsufficientLiquidity => symbol_short!("NO_LIQ"),
            DuoError::PremiumExceedsMax => symbol_short!("PREMIUM"),
            DuoError::ConstantProductViolated => symbol_short!("K"),
            _ => symbol_short!("ERROR"),
        }
    }
}

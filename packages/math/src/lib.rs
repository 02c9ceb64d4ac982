// DuoSwap Math Package

#![no_std]

pub mod constants;
pub mod convert;
pub mod error;
pub mod liquidity;
pub mod swap_fees;
pub mod tick_math;
pub mod types;

// Re-export commonly used items from constants
pub use constants::*;

pub use error::DuoError;
pub use types::{TokenSlot, BORROW_L, BORROW_X, BORROW_Y, DEPOSIT_L, DEPOSIT_X, DEPOSIT_Y, SLOT_COUNT};

// Re-export conversion functions
pub use convert::{
    calc_liquidity_considering_depletion,
    div_round_up,
    mul_div,
    to_assets,
    to_i128,
    to_shares,
    to_u112,
};

// Re-export tick functions
pub use tick_math::{
    get_price_at_tick,
    get_sqrt_price_at_tick,
    get_tick_at_price,
    get_tick_at_reserves,
};

// Re-export liquidity unit functions
pub use liquidity::{
    active_liquidity_scaler_q72,
    convert_l_to_x,
    convert_l_to_y,
    convert_x_to_l,
    convert_y_to_l,
    geometric_liquidity,
    get_reserves_at_tick,
    sqrt_price_from_reserves,
};

// Re-export swap fee functions
pub use swap_fees::{calculate_swap_fee_bips, check_constant_product, get_amount_out, SwapCheck};

pub use ethnum::U256;

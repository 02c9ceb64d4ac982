// Pair types

use soroban_sdk::{contracttype, Address, Vec};

// ============================================================
// MARKET CONFIGURATION
// ============================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketConfig {
    /// May update intervals, external liquidity and fee recipient
    pub admin: Address,
    pub token_x: Address,
    pub token_y: Address,
    /// Saturation risk collaborator
    pub saturation: Address,
    /// Receives protocol fee deposit shares
    pub fee_recipient: Address,
    /// Liquidity outside this pair that the collaborator counts on
    pub external_liquidity: u128,
    pub mid_term_interval: u32,
    pub long_term_interval: u32,
}

// ============================================================
// RESERVES
// ============================================================

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReservesState {
    pub reserve_x: u128,
    pub reserve_y: u128,
    /// Reserves at the first operation of `reference_sequence`
    pub reference_reserve_x: u128,
    pub reference_reserve_y: u128,
    pub reference_sequence: u32,
    pub last_update: u32,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReservesView {
    pub reserve_x: u128,
    pub reserve_y: u128,
    pub reference_reserve_x: u128,
    pub reference_reserve_y: u128,
    pub missing_x: u128,
    pub missing_y: u128,
    pub active_liquidity: u128,
    pub last_update: u32,
}

// ============================================================
// ORACLE PERSISTENCE
// ============================================================

/// Storage form of the oracle rings
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObservationRecord {
    pub mid_term_interval: u32,
    pub long_term_interval: u32,
    pub mid_term_cumulative: Vec<i64>,
    pub mid_term_timestamps: Vec<u32>,
    pub mid_term_index: u32,
    pub mid_term_initialized: bool,
    pub long_term_cumulative: Vec<i64>,
    pub long_term_timestamps: Vec<u32>,
    pub long_term_index: u32,
    pub long_term_initialized: bool,
    pub last_tick: i32,
    pub tick_cumulative: i64,
    pub last_timestamp: u32,
    pub lending_state_tick: i32,
    pub lending_cumulative: i64,
    pub lending_timestamp: u32,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OracleView {
    pub current_tick: i32,
    pub last_tick: i32,
    pub mid_term_tick: i32,
    pub long_term_tick: i32,
    pub lending_state_tick: i32,
    pub tick_min: i32,
    pub tick_max: i32,
}

// ============================================================
// POSITIONS
// ============================================================

/// What the saturation collaborator sees of an account
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionSnapshot {
    pub deposit_l: u128,
    pub deposit_x: u128,
    pub deposit_y: u128,
    pub borrow_l: u128,
    pub borrow_x: u128,
    pub borrow_y: u128,
    pub tick_min: i32,
    pub tick_max: i32,
    pub saturation_tolerance_wad: u128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionView {
    pub deposit_l: u128,
    pub deposit_x: u128,
    pub deposit_y: u128,
    pub borrow_l: u128,
    pub borrow_x: u128,
    pub borrow_y: u128,
    pub deposits_l: u128,
    pub debts_l: u128,
    pub collateral_l: u128,
    pub debt_l: u128,
    pub net_debt_x: bool,
}

// ============================================================
// LIQUIDATION
// ============================================================

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LiquidationMode {
    Hard = 0,
    Soft = 1,
    Leverage = 2,
}

/// Asset amounts a liquidator takes and repays. Soft liquidations only
/// use the deposit fields.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LiquidationRequest {
    pub deposit_l: u128,
    pub deposit_x: u128,
    pub deposit_y: u128,
    pub repay_l: u128,
    pub repay_x: u128,
    pub repay_y: u128,
}

// Pair storage module for DuoSwap
//
// Market-wide state lives in instance storage; per-account balances and
// tolerances live in persistent storage with TTL extension.

use duoswap_math::{DuoError, TokenSlot, SLOT_COUNT};
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{MarketConfig, ObservationRecord, ReservesState};

// ============================================================
// STORAGE KEYS
// ============================================================

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Market configuration
    Config,
    /// Initialization flag
    Initialized,
    /// Reentrancy lock, present while an entry point runs
    Locked,
    /// Asset totals of the six slots
    TotalAssets,
    /// Share totals of the six slots
    TotalShares,
    Reserves,
    Observations,
    /// Timestamp of the last interest accrual
    LastAccrual,
    /// Share balance by (account, slot)
    Balance(Address, TokenSlot),
    /// Saturation tolerance by account
    Tolerance(Address),
}

// ============================================================
// TTL CONFIGURATION
// ============================================================

/// Persistent storage lifetime in ledgers (~1 year at 5s/ledger)
const PERSISTENT_LIFETIME: u32 = 6_307_200;
/// TTL bump threshold
const PERSISTENT_BUMP: u32 = 6_307_200;

/// Instance storage lifetime (~30 days)
const INSTANCE_LIFETIME: u32 = 518_400;
const INSTANCE_BUMP: u32 = 518_400;

fn extend_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME, PERSISTENT_BUMP);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME, INSTANCE_BUMP);
}

// ============================================================
// INITIALIZATION
// ============================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
}

// ============================================================
// CONFIG
// ============================================================

pub fn write_config(env: &Env, config: &MarketConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn read_config(env: &Env) -> Result<MarketConfig, DuoError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(DuoError::NotInitialized)
}

// ============================================================
// SLOT TOTALS
// ============================================================

pub fn read_totals(env: &Env, key: &DataKey) -> [u128; SLOT_COUNT] {
    let mut totals = [0u128; SLOT_COUNT];
    let stored: Option<Vec<u128>> = env.storage().instance().get(key);
    if let Some(values) = stored {
        for (slot, value) in values.iter().enumerate().take(SLOT_COUNT) {
            totals[slot] = value;
        }
    }
    totals
}

pub fn write_totals(env: &Env, key: &DataKey, totals: &[u128; SLOT_COUNT]) {
    let mut values = Vec::new(env);
    for value in totals.iter() {
        values.push_back(*value);
    }
    env.storage().instance().set(key, &values);
}

// ============================================================
// RESERVES AND ORACLE
// ============================================================

pub fn read_reserves(env: &Env) -> ReservesState {
    env.storage()
        .instance()
        .get(&DataKey::Reserves)
        .unwrap_or_default()
}

pub fn write_reserves(env: &Env, reserves: &ReservesState) {
    env.storage().instance().set(&DataKey::Reserves, reserves);
}

pub fn read_observations(env: &Env) -> Option<ObservationRecord> {
    env.storage().instance().get(&DataKey::Observations)
}

pub fn write_observations(env: &Env, record: &ObservationRecord) {
    env.storage().instance().set(&DataKey::Observations, record);
}

pub fn read_last_accrual(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::LastAccrual)
        .unwrap_or(0)
}

pub fn write_last_accrual(env: &Env, timestamp: u32) {
    env.storage().instance().set(&DataKey::LastAccrual, &timestamp);
}

// ============================================================
// BALANCES
// ============================================================

pub fn read_balance(env: &Env, account: &Address, slot: TokenSlot) -> u128 {
    let key = DataKey::Balance(account.clone(), slot);
    let result: Option<u128> = env.storage().persistent().get(&key);
    if result.is_some() {
        extend_ttl(env, &key);
    }
    result.unwrap_or(0)
}

pub fn write_balance(env: &Env, account: &Address, slot: TokenSlot, shares: u128) {
    let key = DataKey::Balance(account.clone(), slot);
    if shares == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &shares);
    extend_ttl(env, &key);
}

// ============================================================
// SATURATION TOLERANCE
// ============================================================

pub fn read_tolerance(env: &Env, account: &Address, default: u128) -> u128 {
    let key = DataKey::Tolerance(account.clone());
    env.storage().persistent().get(&key).unwrap_or(default)
}

pub fn write_tolerance(env: &Env, account: &Address, tolerance_wad: u128) {
    let key = DataKey::Tolerance(account.clone());
    env.storage().persistent().set(&key, &tolerance_wad);
    extend_ttl(env, &key);
}

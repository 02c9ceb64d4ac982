// Per-invocation market state
//
// Loaded once at the start of an entry point, mutated in memory and
// written back before the entry point returns.

use duoswap_math::{DuoError, BORROW_L, BORROW_X, BORROW_Y, DEPOSIT_L, DEPOSIT_X, DEPOSIT_Y, SLOT_COUNT};
use duoswap_oracle::{Observations, LONG_TERM_SLOTS, MID_TERM_SLOTS};
use soroban_sdk::{Env, Vec};

use crate::storage::*;
use crate::types::{ObservationRecord, ReservesState};

#[derive(Clone, Debug)]
pub struct MarketState {
    pub total_assets: [u128; SLOT_COUNT],
    pub total_shares: [u128; SLOT_COUNT],
    pub reserves: ReservesState,
    /// Created at the first liquidity deposit
    pub observations: Option<Observations>,
    pub last_accrual: u32,
}

impl MarketState {
    pub fn load(env: &Env) -> Result<Self, DuoError> {
        let observations = match read_observations(env) {
            Some(record) => Some(observations_from_record(&record)?),
            None => None,
        };
        Ok(Self {
            total_assets: read_totals(env, &DataKey::TotalAssets),
            total_shares: read_totals(env, &DataKey::TotalShares),
            reserves: read_reserves(env),
            observations,
            last_accrual: read_last_accrual(env),
        })
    }

    pub fn save(&self, env: &Env) {
        write_totals(env, &DataKey::TotalAssets, &self.total_assets);
        write_totals(env, &DataKey::TotalShares, &self.total_shares);
        write_reserves(env, &self.reserves);
        if let Some(observations) = &self.observations {
            write_observations(env, &observations_to_record(env, observations));
        }
        write_last_accrual(env, self.last_accrual);
        extend_instance_ttl(env);
    }

    pub fn observations(&self) -> Result<&Observations, DuoError> {
        self.observations.as_ref().ok_or(DuoError::NotInitialized)
    }

    pub fn observations_mut(&mut self) -> Result<&mut Observations, DuoError> {
        self.observations.as_mut().ok_or(DuoError::NotInitialized)
    }

    /// Deposited L minus borrowed L
    pub fn active_liquidity(&self) -> u128 {
        self.total_assets[DEPOSIT_L].saturating_sub(self.total_assets[BORROW_L])
    }

    /// X lent out beyond what X depositors supplied, taken from the reserve
    pub fn missing_x(&self) -> u128 {
        self.total_assets[BORROW_X].saturating_sub(self.total_assets[DEPOSIT_X])
    }

    pub fn missing_y(&self) -> u128 {
        self.total_assets[BORROW_Y].saturating_sub(self.total_assets[DEPOSIT_Y])
    }

    /// Reserves available to swaps and withdrawals
    pub fn effective_reserves(&self) -> (u128, u128) {
        (
            self.reserves.reserve_x.saturating_sub(self.missing_x()),
            self.reserves.reserve_y.saturating_sub(self.missing_y()),
        )
    }

    /// Token balance the pair must hold for the current book
    pub fn expected_balance_x(&self) -> u128 {
        self.reserves.reserve_x.saturating_add(self.total_assets[DEPOSIT_X]).saturating_sub(self.total_assets[BORROW_X])
    }

    pub fn expected_balance_y(&self) -> u128 {
        self.reserves.reserve_y.saturating_add(self.total_assets[DEPOSIT_Y]).saturating_sub(self.total_assets[BORROW_Y])
    }

    /// Borrows and withdrawals may not drain either reserve
    pub fn check_not_drained(&self) -> Result<(), DuoError> {
        let drained = |missing: u128, reserve: u128| missing > 0 && missing >= reserve;
        if drained(self.missing_x(), self.reserves.reserve_x) || drained(self.missing_y(), self.reserves.reserve_y) {
            return Err(DuoError::InsufficientLiquidity);
        }
        Ok(())
    }

    /// Snapshot the reserves at the first operation of a ledger
    pub fn refresh_reference(&mut self, sequence: u32) {
        if self.reserves.reference_sequence != sequence {
            self.reserves.reference_reserve_x = self.reserves.reserve_x;
            self.reserves.reference_reserve_y = self.reserves.reserve_y;
            self.reserves.reference_sequence = sequence;
        }
    }
}

fn observations_to_record(env: &Env, obs: &Observations) -> ObservationRecord {
    let mut mid_term_cumulative = Vec::new(env);
    let mut mid_term_timestamps = Vec::new(env);
    for slot in 0..MID_TERM_SLOTS {
        mid_term_cumulative.push_back(obs.mid_term_cumulative[slot]);
        mid_term_timestamps.push_back(obs.mid_term_timestamps[slot]);
    }
    let mut long_term_cumulative = Vec::new(env);
    let mut long_term_timestamps = Vec::new(env);
    for slot in 0..LONG_TERM_SLOTS {
        long_term_cumulative.push_back(obs.long_term_cumulative[slot]);
        long_term_timestamps.push_back(obs.long_term_timestamps[slot]);
    }

    ObservationRecord {
        mid_term_interval: obs.mid_term_interval,
        long_term_interval: obs.long_term_interval,
        mid_term_cumulative,
        mid_term_timestamps,
        mid_term_index: obs.mid_term_index,
        mid_term_initialized: obs.mid_term_initialized,
        long_term_cumulative,
        long_term_timestamps,
        long_term_index: obs.long_term_index,
        long_term_initialized: obs.long_term_initialized,
        last_tick: obs.last_tick,
        tick_cumulative: obs.tick_cumulative,
        last_timestamp: obs.last_timestamp,
        lending_state_tick: obs.lending_state_tick,
        lending_cumulative: obs.lending_cumulative,
        lending_timestamp: obs.lending_timestamp,
    }
}

fn observations_from_record(record: &ObservationRecord) -> Result<Observations, DuoError> {
    if record.mid_term_cumulative.len() as usize != MID_TERM_SLOTS
        || record.mid_term_timestamps.len() as usize != MID_TERM_SLOTS
        || record.long_term_cumulative.len() as usize != LONG_TERM_SLOTS
        || record.long_term_timestamps.len() as usize != LONG_TERM_SLOTS
    {
        return Err(DuoError::NotInitialized);
    }

    let mut mid_term_cumulative = [0i64; MID_TERM_SLOTS];
    let mut mid_term_timestamps = [0u32; MID_TERM_SLOTS];
    for slot in 0..MID_TERM_SLOTS {
        mid_term_cumulative[slot] = record.mid_term_cumulative.get_unchecked(slot as u32);
        mid_term_timestamps[slot] = record.mid_term_timestamps.get_unchecked(slot as u32);
    }
    let mut long_term_cumulative = [0i64; LONG_TERM_SLOTS];
    let mut long_term_timestamps = [0u32; LONG_TERM_SLOTS];
    for slot in 0..LONG_TERM_SLOTS {
        long_term_cumulative[slot] = record.long_term_cumulative.get_unchecked(slot as u32);
        long_term_timestamps[slot] = record.long_term_timestamps.get_unchecked(slot as u32);
    }

    Ok(Observations {
        mid_term_interval: record.mid_term_interval,
        long_term_interval: record.long_term_interval,
        mid_term_cumulative,
        mid_term_timestamps,
        mid_term_index: record.mid_term_index,
        mid_term_initialized: record.mid_term_initialized,
        long_term_cumulative,
        long_term_timestamps,
        long_term_index: record.long_term_index,
        long_term_initialized: record.long_term_initialized,
        last_tick: record.last_tick,
        tick_cumulative: record.tick_cumulative,
        last_timestamp: record.last_timestamp,
        lending_state_tick: record.lending_state_tick,
        lending_cumulative: record.lending_cumulative,
        lending_timestamp: record.lending_timestamp,
    })
}

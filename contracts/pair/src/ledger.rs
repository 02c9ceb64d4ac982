// Six-slot share ledger
//
// The only code that touches share balances. Every mint, burn and
// transfer keeps the slot's total shares equal to the sum of balances.

use duoswap_math::convert::check_shares;
use duoswap_math::{to_assets, to_shares, DuoError, TokenSlot, SLOT_COUNT};
use soroban_sdk::{Address, Env};

use crate::state::MarketState;
use crate::storage::{read_balance, write_balance};

pub fn balance(env: &Env, account: &Address, slot: TokenSlot) -> u128 {
    read_balance(env, account, slot)
}

/// Shares for `assets` of a slot. Debt slots should round up.
pub fn shares_for(state: &MarketState, slot: TokenSlot, assets: u128, round_up: bool) -> Result<u128, DuoError> {
    let i = slot.index();
    to_shares(assets, state.total_assets[i], state.total_shares[i], round_up)
}

pub fn assets_for(state: &MarketState, slot: TokenSlot, shares: u128, round_up: bool) -> Result<u128, DuoError> {
    let i = slot.index();
    to_assets(shares, state.total_assets[i], state.total_shares[i], round_up)
}

pub fn mint(
    env: &Env,
    state: &mut MarketState,
    to: &Address,
    slot: TokenSlot,
    assets: u128,
    shares: u128,
) -> Result<(), DuoError> {
    let i = slot.index();
    state.total_shares[i] = check_shares(
        state.total_shares[i].checked_add(shares).ok_or(DuoError::Overflow)?,
    )?;
    state.total_assets[i] = state.total_assets[i]
        .checked_add(assets)
        .ok_or(DuoError::Overflow)?;

    let current = read_balance(env, to, slot);
    write_balance(env, to, slot, current + shares);
    Ok(())
}

/// Burns shares and removes up to `assets` from the slot total
pub fn burn(
    env: &Env,
    state: &mut MarketState,
    from: &Address,
    slot: TokenSlot,
    assets: u128,
    shares: u128,
) -> Result<(), DuoError> {
    let current = read_balance(env, from, slot);
    if shares > current {
        return Err(DuoError::InsufficientShares);
    }
    let i = slot.index();
    state.total_shares[i] = state.total_shares[i]
        .checked_sub(shares)
        .ok_or(DuoError::InsufficientShares)?;
    // Rounding dust can leave assets slightly below the sum of claims
    state.total_assets[i] = state.total_assets[i].saturating_sub(assets);
    if state.total_shares[i] == 0 {
        state.total_assets[i] = 0;
    }

    write_balance(env, from, slot, current - shares);
    Ok(())
}

pub fn transfer(env: &Env, from: &Address, to: &Address, slot: TokenSlot, shares: u128) -> Result<(), DuoError> {
    let from_balance = read_balance(env, from, slot);
    if shares > from_balance {
        return Err(DuoError::InsufficientShares);
    }
    write_balance(env, from, slot, from_balance - shares);
    let to_balance = read_balance(env, to, slot);
    write_balance(env, to, slot, to_balance + shares);
    Ok(())
}

/// Asset amounts of an account. Deposits round down, debts up.
pub fn account_assets(env: &Env, state: &MarketState, account: &Address) -> Result<[u128; SLOT_COUNT], DuoError> {
    let mut assets = [0u128; SLOT_COUNT];
    for slot in TokenSlot::ALL {
        let shares = read_balance(env, account, slot);
        if shares > 0 {
            assets[slot.index()] = assets_for(state, slot, shares, slot.is_debt())?;
        }
    }
    Ok(assets)
}

pub fn has_borrow(env: &Env, account: &Address) -> bool {
    [TokenSlot::BorrowL, TokenSlot::BorrowX, TokenSlot::BorrowY]
        .into_iter()
        .any(|slot| read_balance(env, account, slot) > 0)
}

/// Repays up to `assets` of an account's debt in `slot`. Returns the
/// assets actually repaid; overpayment clears the whole debt.
pub fn burn_debt(
    env: &Env,
    state: &mut MarketState,
    account: &Address,
    slot: TokenSlot,
    assets: u128,
) -> Result<u128, DuoError> {
    let held = read_balance(env, account, slot);
    let owed = assets_for(state, slot, held, true)?;
    if assets >= owed {
        burn(env, state, account, slot, owed, held)?;
        return Ok(owed);
    }
    let shares = shares_for(state, slot, assets, false)?;
    if shares == 0 {
        return Err(DuoError::InvalidAmount);
    }
    burn(env, state, account, slot, assets, shares)?;
    Ok(assets)
}

/// Moves deposit shares worth `assets` (rounded up, capped at the
/// holding) from one account to another.
pub fn transfer_assets(
    env: &Env,
    state: &MarketState,
    from: &Address,
    to: &Address,
    slot: TokenSlot,
    assets: u128,
) -> Result<u128, DuoError> {
    if assets == 0 {
        return Ok(0);
    }
    let shares = shares_for(state, slot, assets, true)?.min(read_balance(env, from, slot));
    transfer(env, from, to, slot, shares)?;
    Ok(shares)
}

// Market operations shared by the entry points

use duoswap_interest::{accrue_interest, protocol_fee_shares, AccrualInput};
use duoswap_math::*;
use duoswap_validation::{validate_solvency, InputParams};
use soroban_sdk::{log, token, Address, Env};

use crate::events;
use crate::interfaces::SaturationClient;
use crate::ledger;
use crate::state::MarketState;
use crate::storage::read_tolerance;
use crate::types::{MarketConfig, PositionSnapshot};

/// Saturation tolerance of accounts that never set one (95%)
pub const DEFAULT_SATURATION_TOLERANCE_WAD: u128 = 950_000_000_000_000_000;
/// Highest tolerance an account may choose (99%)
pub const MAX_SATURATION_TOLERANCE_WAD: u128 = 990_000_000_000_000_000;

#[inline]
pub fn now(env: &Env) -> u32 {
    // Wrapping 32-bit clock
    env.ledger().timestamp() as u32
}

// ============================================================
// ACCRUAL
// ============================================================

/// Bring interest, penalties and protocol fees up to the current ledger
/// time. `account` is the position the saturation collaborator charges
/// penalty shares to.
pub fn accrue(env: &Env, state: &mut MarketState, config: &MarketConfig, account: &Address) -> Result<(), DuoError> {
    let now = now(env);
    state.refresh_reference(env.ledger().sequence());

    if state.observations.is_none() {
        state.last_accrual = now;
        return Ok(());
    }
    let duration = now.wrapping_sub(state.last_accrual);
    if duration == 0 {
        return Ok(());
    }

    let lending_tick = state.observations_mut()?.checkpoint_lending_state(now);

    let saturation = SaturationClient::new(env, &config.saturation);
    let has_l_debt = state.total_assets[BORROW_L] > 0;
    let saturation_wad = if has_l_debt { saturation.sat_percentage_wad() } else { 0 };

    let (assets, accrual) = accrue_interest(&AccrualInput {
        total_assets: state.total_assets,
        lending_tick,
        saturation_wad,
        duration,
    })?;
    state.total_assets = assets;
    // Borrowers pay the reserve for what it lent
    state.reserves.reserve_x = to_u112(
        state.reserves.reserve_x.checked_add(accrual.reserve_interest_x).ok_or(DuoError::Overflow)?,
    )?;
    state.reserves.reserve_y = to_u112(
        state.reserves.reserve_y.checked_add(accrual.reserve_interest_y).ok_or(DuoError::Overflow)?,
    )?;

    mint_protocol_fee(env, state, config, TokenSlot::DepositX, accrual.protocol_fee_x)?;
    mint_protocol_fee(env, state, config, TokenSlot::DepositY, accrual.protocol_fee_y)?;

    if has_l_debt {
        let (penalty_assets, penalty_shares) = saturation.accrue_penalties(
            account,
            &config.external_liquidity,
            &duration,
            &state.total_assets[BORROW_L],
            &state.total_shares[BORROW_L],
        );
        if penalty_assets > 0 {
            state.total_assets[BORROW_L] = state.total_assets[BORROW_L]
                .checked_add(penalty_assets)
                .ok_or(DuoError::Overflow)?;
            state.total_assets[DEPOSIT_L] = state.total_assets[DEPOSIT_L]
                .checked_add(penalty_assets)
                .ok_or(DuoError::Overflow)?;
        }
        if penalty_shares > 0 {
            ledger::mint(env, state, account, TokenSlot::BorrowL, 0, penalty_shares)?;
        }
    }

    state.last_accrual = now;
    log!(
        env,
        "accrued interest",
        duration,
        accrual.interest_l,
        accrual.interest_x,
        accrual.interest_y
    );
    events::emit_interest_accrued(env, &accrual);
    Ok(())
}

fn mint_protocol_fee(
    env: &Env,
    state: &mut MarketState,
    config: &MarketConfig,
    slot: TokenSlot,
    fee: u128,
) -> Result<(), DuoError> {
    if fee == 0 {
        return Ok(());
    }
    let i = slot.index();
    let shares = protocol_fee_shares(fee, state.total_assets[i], state.total_shares[i])?;
    // Assets are already in the total
    ledger::mint(env, state, &config.fee_recipient, slot, 0, shares)
}

// ============================================================
// PRICING
// ============================================================

pub fn current_tick(state: &MarketState) -> Result<i32, DuoError> {
    get_tick_at_reserves(state.reserves.reserve_x, state.reserves.reserve_y)
}

/// Oracle-widened tick range around the current price
pub fn tick_range(env: &Env, state: &MarketState) -> Result<(i32, i32), DuoError> {
    let tick = current_tick(state)?;
    Ok(state.observations()?.tick_range(tick, now(env)))
}

pub fn input_params(env: &Env, state: &MarketState, account: &Address) -> Result<InputParams, DuoError> {
    let (tick_min, tick_max) = tick_range(env, state)?;
    let active = state.active_liquidity();
    Ok(InputParams {
        user_assets: ledger::account_assets(env, state, account)?,
        sqrt_price_min_q72: get_sqrt_price_at_tick(tick_min)?,
        sqrt_price_max_q72: get_sqrt_price_at_tick(tick_max)?,
        active_liquidity_scaler_q72: active_liquidity_scaler_q72(
            state.reserves.reserve_x,
            state.reserves.reserve_y,
            active,
        )?,
        active_liquidity_assets: active,
        reserve_x: state.reserves.reserve_x,
        reserve_y: state.reserves.reserve_y,
    })
}

/// Fails unless `account` is solvent. Accounts without debt are not priced.
pub fn validate_account(env: &Env, state: &MarketState, account: &Address) -> Result<(), DuoError> {
    if !ledger::has_borrow(env, account) {
        return Ok(());
    }
    validate_solvency(&input_params(env, state, account)?)?;
    Ok(())
}

/// Record the post-operation price in the oracle
pub fn record_price(env: &Env, state: &mut MarketState) -> Result<(), DuoError> {
    let tick = current_tick(state)?;
    let now = now(env);
    state.observations_mut()?.record(tick, now);
    state.reserves.last_update = now;
    Ok(())
}

// ============================================================
// SATURATION
// ============================================================

pub fn snapshot(env: &Env, state: &MarketState, account: &Address) -> Result<PositionSnapshot, DuoError> {
    let assets = ledger::account_assets(env, state, account)?;
    let (tick_min, tick_max) = tick_range(env, state)?;
    Ok(PositionSnapshot {
        deposit_l: assets[DEPOSIT_L],
        deposit_x: assets[DEPOSIT_X],
        deposit_y: assets[DEPOSIT_Y],
        borrow_l: assets[BORROW_L],
        borrow_x: assets[BORROW_X],
        borrow_y: assets[BORROW_Y],
        tick_min,
        tick_max,
        saturation_tolerance_wad: read_tolerance(env, account, DEFAULT_SATURATION_TOLERANCE_WAD),
    })
}

/// Send the account's current snapshot to the saturation collaborator
pub fn report_position(
    env: &Env,
    state: &MarketState,
    config: &MarketConfig,
    account: &Address,
) -> Result<(), DuoError> {
    let snapshot = snapshot(env, state, account)?;
    SaturationClient::new(env, &config.saturation).update(account, &snapshot);
    Ok(())
}

/// Report only accounts holding a borrow
pub fn update_saturation(
    env: &Env,
    state: &MarketState,
    config: &MarketConfig,
    account: &Address,
) -> Result<(), DuoError> {
    if ledger::has_borrow(env, account) {
        report_position(env, state, config, account)?;
    }
    Ok(())
}

// ============================================================
// BAD DEBT
// ============================================================

/// Remaining collateral seized and debt written off when a position is
/// closed as bad debt, per (L, X, Y)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BadDebt {
    pub seized: [u128; 3],
    pub written_off: [u128; 3],
}

/// Close out `account`. Its remaining deposits go to the pool first, then
/// every remaining debt is written off. The reserve absorbs the part it
/// lent, depositors of the asset the rest.
pub fn socialize_bad_debt(env: &Env, state: &mut MarketState, account: &Address) -> Result<BadDebt, DuoError> {
    let mut outcome = BadDebt::default();

    for (n, slot) in [TokenSlot::DepositL, TokenSlot::DepositX, TokenSlot::DepositY]
        .into_iter()
        .enumerate()
    {
        let shares = ledger::balance(env, account, slot);
        if shares == 0 {
            continue;
        }
        let assets = ledger::assets_for(state, slot, shares, false)?;
        ledger::burn(env, state, account, slot, assets, shares)?;
        // Seized L stays in the reserves for the remaining providers
        match slot {
            TokenSlot::DepositX => {
                state.reserves.reserve_x = to_u112(
                    state.reserves.reserve_x.checked_add(assets).ok_or(DuoError::Overflow)?,
                )?
            }
            TokenSlot::DepositY => {
                state.reserves.reserve_y = to_u112(
                    state.reserves.reserve_y.checked_add(assets).ok_or(DuoError::Overflow)?,
                )?
            }
            _ => {}
        }
        outcome.seized[n] = assets;
    }

    for (n, slot) in [TokenSlot::BorrowL, TokenSlot::BorrowX, TokenSlot::BorrowY]
        .into_iter()
        .enumerate()
    {
        let shares = ledger::balance(env, account, slot);
        if shares == 0 {
            continue;
        }
        let assets = ledger::assets_for(state, slot, shares, true)?;
        let lent_by_reserve = match slot {
            TokenSlot::BorrowX => state.missing_x(),
            TokenSlot::BorrowY => state.missing_y(),
            _ => 0,
        };
        ledger::burn(env, state, account, slot, assets, shares)?;

        let from_reserve = assets.min(lent_by_reserve);
        let deposit = slot.counterpart().index();
        let from_depositors = (assets - from_reserve).min(state.total_assets[deposit]);
        state.total_assets[deposit] -= from_depositors;
        // Rounding dust beyond the deposits also comes out of the reserve
        let reserve_loss = assets - from_depositors;
        match slot {
            TokenSlot::BorrowX => {
                state.reserves.reserve_x = state.reserves.reserve_x.saturating_sub(reserve_loss)
            }
            TokenSlot::BorrowY => {
                state.reserves.reserve_y = state.reserves.reserve_y.saturating_sub(reserve_loss)
            }
            _ => {}
        }
        outcome.written_off[n] = assets;
    }

    log!(
        env,
        "bad debt socialized",
        outcome.seized[1],
        outcome.seized[2],
        outcome.written_off[0],
        outcome.written_off[1],
        outcome.written_off[2]
    );
    Ok(outcome)
}

// ============================================================
// TOKEN TRANSFERS
// ============================================================

pub fn pull(env: &Env, token: &Address, from: &Address, amount: u128) -> Result<(), DuoError> {
    if amount == 0 {
        return Ok(());
    }
    token::Client::new(env, token).transfer(from, &env.current_contract_address(), &to_i128(amount)?);
    Ok(())
}

pub fn push(env: &Env, token: &Address, to: &Address, amount: u128) -> Result<(), DuoError> {
    if amount == 0 {
        return Ok(());
    }
    token::Client::new(env, token).transfer(&env.current_contract_address(), to, &to_i128(amount)?);
    Ok(())
}

pub fn token_balance(env: &Env, token: &Address) -> Result<u128, DuoError> {
    let balance = token::Client::new(env, token).balance(&env.current_contract_address());
    u128::try_from(balance).map_err(|_| DuoError::Overflow)
}

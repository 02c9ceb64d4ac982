#![no_std]

use soroban_sdk::{contract, contractimpl, log, Address, Bytes, Env};

// External packages
use duoswap_liquidation::{
    evaluate_hard, evaluate_leverage, evaluate_soft, value_liquidation, LiquidationParams,
    SoftLiquidationParams,
};
use duoswap_math::*;
use duoswap_oracle::{Observations, DEFAULT_LONG_TERM_INTERVAL, DEFAULT_MID_TERM_INTERVAL};
use duoswap_validation::value_position;

// Local modules
mod events;
mod interfaces;
mod ledger;
mod lock;
mod market;
mod state;
mod storage;
pub mod types;

pub use interfaces::{PairCallee, PairCalleeClient, SaturationClient, SaturationInterface};
pub use market::{DEFAULT_SATURATION_TOLERANCE_WAD, MAX_SATURATION_TOLERANCE_WAD};

use events::*;
use lock::ReentrancyLock;
use state::MarketState;
use storage::*;
use types::*;

#[contract]
pub struct DuoPair;

#[contractimpl]
impl DuoPair {
    // ========================================================
    // INITIALIZATION
    // ========================================================

    /// Initialize the market
    ///
    /// # Arguments
    /// * `admin` - May change oracle intervals, external liquidity and fee recipient
    /// * `token_x` - First underlying asset
    /// * `token_y` - Second underlying asset
    /// * `saturation` - Saturation risk collaborator
    /// * `fee_recipient` - Receives protocol fee deposit shares
    pub fn initialize(
        env: Env,
        admin: Address,
        token_x: Address,
        token_y: Address,
        saturation: Address,
        fee_recipient: Address,
    ) -> Result<(), DuoError> {
        admin.require_auth();

        if is_initialized(&env) {
            return Err(DuoError::AlreadyInitialized);
        }
        if token_x == token_y {
            return Err(DuoError::InvalidTokenSlot);
        }

        let config = MarketConfig {
            admin,
            token_x,
            token_y,
            saturation,
            fee_recipient,
            external_liquidity: 0,
            mid_term_interval: DEFAULT_MID_TERM_INTERVAL,
            long_term_interval: DEFAULT_LONG_TERM_INTERVAL,
        };
        write_config(&env, &config);
        set_initialized(&env);

        let mut state = MarketState::load(&env)?;
        state.last_accrual = market::now(&env);
        state.save(&env);

        emit_initialized(&env, &config.token_x, &config.token_y, &config.saturation);
        Ok(())
    }

    // ========================================================
    // LIQUIDITY
    // ========================================================

    /// Add X and Y to the pool for DEPOSIT_L shares.
    ///
    /// The first provider receives `sqrt(x * y) - MINIMUM_LIQUIDITY`; the
    /// remainder is locked with the pair. Later providers are credited the
    /// smaller of the two sides, each measured against its depletion-adjusted
    /// reserve.
    pub fn deposit_liquidity(env: Env, to: Address, amount_x: u128, amount_y: u128) -> Result<u128, DuoError> {
        to.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &to)?;

        if amount_x == 0 || amount_y == 0 {
            return Err(DuoError::InvalidAmount);
        }

        market::pull(&env, &config.token_x, &to, amount_x)?;
        market::pull(&env, &config.token_y, &to, amount_y)?;

        let (liquidity_assets, liquidity_shares) = if state.total_shares[DEPOSIT_L] == 0 {
            let liquidity = geometric_liquidity(amount_x, amount_y)?;
            if liquidity <= MINIMUM_LIQUIDITY {
                return Err(DuoError::InsufficientLiquidityMinted);
            }
            let locked = env.current_contract_address();
            ledger::mint(&env, &mut state, &locked, TokenSlot::DepositL, MINIMUM_LIQUIDITY, MINIMUM_LIQUIDITY)?;
            (liquidity - MINIMUM_LIQUIDITY, liquidity - MINIMUM_LIQUIDITY)
        } else {
            let active = state.active_liquidity();
            let (assets_x, shares_x) = calc_liquidity_considering_depletion(
                amount_x,
                state.reserves.reserve_x,
                state.missing_x(),
                active,
                state.total_assets[DEPOSIT_L],
                state.total_shares[DEPOSIT_L],
            )?;
            let (assets_y, shares_y) = calc_liquidity_considering_depletion(
                amount_y,
                state.reserves.reserve_y,
                state.missing_y(),
                active,
                state.total_assets[DEPOSIT_L],
                state.total_shares[DEPOSIT_L],
            )?;
            (assets_x.min(assets_y), shares_x.min(shares_y))
        };
        if liquidity_shares == 0 {
            return Err(DuoError::InsufficientLiquidityMinted);
        }
        ledger::mint(&env, &mut state, &to, TokenSlot::DepositL, liquidity_assets, liquidity_shares)?;

        state.reserves.reserve_x = to_u112(checked_sum(state.reserves.reserve_x, amount_x)?)?;
        state.reserves.reserve_y = to_u112(checked_sum(state.reserves.reserve_y, amount_y)?)?;

        if state.observations.is_none() {
            let tick = market::current_tick(&state)?;
            state.observations = Some(Observations::new(
                tick,
                market::now(&env),
                config.mid_term_interval,
                config.long_term_interval,
            )?);
            SaturationClient::new(&env, &config.saturation).init(&tick);
        } else {
            market::record_price(&env, &mut state)?;
        }

        market::validate_account(&env, &state, &to)?;
        state.save(&env);

        emit_liquidity_minted(&env, &to, amount_x, amount_y, liquidity_assets, liquidity_shares);
        Ok(liquidity_shares)
    }

    /// Burn DEPOSIT_L shares for a proportional slice of both reserves
    pub fn withdraw_liquidity(env: Env, to: Address, shares: u128) -> Result<(u128, u128), DuoError> {
        to.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &to)?;

        if shares == 0 {
            return Err(DuoError::InvalidAmount);
        }

        let liquidity = ledger::assets_for(&state, TokenSlot::DepositL, shares, false)?;
        let active = state.active_liquidity();
        if liquidity >= active {
            return Err(DuoError::InsufficientLiquidity);
        }
        let amount_x = mul_div(liquidity, state.reserves.reserve_x, active, false)?;
        let amount_y = mul_div(liquidity, state.reserves.reserve_y, active, false)?;
        if amount_x == 0 || amount_y == 0 {
            return Err(DuoError::InsufficientLiquidityBurned);
        }
        let (effective_x, effective_y) = state.effective_reserves();
        if amount_x > effective_x || amount_y > effective_y {
            return Err(DuoError::InsufficientLiquidity);
        }

        ledger::burn(&env, &mut state, &to, TokenSlot::DepositL, liquidity, shares)?;
        state.reserves.reserve_x -= amount_x;
        state.reserves.reserve_y -= amount_y;
        state.check_not_drained()?;

        market::push(&env, &config.token_x, &to, amount_x)?;
        market::push(&env, &config.token_y, &to, amount_y)?;

        market::record_price(&env, &mut state)?;
        market::validate_account(&env, &state, &to)?;
        market::update_saturation(&env, &state, &config, &to)?;
        state.save(&env);

        emit_liquidity_burned(&env, &to, amount_x, amount_y, liquidity, shares);
        Ok((amount_x, amount_y))
    }

    // ========================================================
    // LENDING
    // ========================================================

    /// Lend X and/or Y to the market for DEPOSIT_X / DEPOSIT_Y shares
    pub fn deposit(env: Env, to: Address, amount_x: u128, amount_y: u128) -> Result<(), DuoError> {
        to.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &to)?;

        if amount_x == 0 && amount_y == 0 {
            return Err(DuoError::InvalidAmount);
        }

        for (slot, token, amount) in [
            (TokenSlot::DepositX, &config.token_x, amount_x),
            (TokenSlot::DepositY, &config.token_y, amount_y),
        ] {
            if amount == 0 {
                continue;
            }
            market::pull(&env, token, &to, amount)?;
            let shares = ledger::shares_for(&state, slot, amount, false)?;
            if shares == 0 {
                return Err(DuoError::InvalidAmount);
            }
            ledger::mint(&env, &mut state, &to, slot, amount, shares)?;
        }

        market::validate_account(&env, &state, &to)?;
        market::update_saturation(&env, &state, &config, &to)?;
        state.save(&env);

        emit_deposit(&env, &to, amount_x, amount_y);
        Ok(())
    }

    /// Redeem DEPOSIT_X / DEPOSIT_Y shares for the underlying assets
    pub fn withdraw(env: Env, to: Address, amount_x: u128, amount_y: u128) -> Result<(), DuoError> {
        to.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &to)?;

        if amount_x == 0 && amount_y == 0 {
            return Err(DuoError::InvalidAmount);
        }

        for (slot, amount) in [(TokenSlot::DepositX, amount_x), (TokenSlot::DepositY, amount_y)] {
            if amount == 0 {
                continue;
            }
            let shares = ledger::shares_for(&state, slot, amount, true)?;
            ledger::burn(&env, &mut state, &to, slot, amount, shares)?;
        }
        state.check_not_drained()?;

        market::push(&env, &config.token_x, &to, amount_x)?;
        market::push(&env, &config.token_y, &to, amount_y)?;

        market::validate_account(&env, &state, &to)?;
        market::update_saturation(&env, &state, &config, &to)?;
        state.save(&env);

        emit_withdraw(&env, &to, amount_x, amount_y);
        Ok(())
    }

    /// Borrow X and/or Y. With non-empty `data` the receiver is called
    /// back after the transfer and before solvency is checked.
    pub fn borrow(env: Env, to: Address, amount_x: u128, amount_y: u128, data: Bytes) -> Result<(), DuoError> {
        to.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &to)?;

        if amount_x == 0 && amount_y == 0 {
            return Err(DuoError::InvalidAmount);
        }

        for (slot, amount) in [(TokenSlot::BorrowX, amount_x), (TokenSlot::BorrowY, amount_y)] {
            if amount == 0 {
                continue;
            }
            let shares = ledger::shares_for(&state, slot, amount, true)?;
            ledger::mint(&env, &mut state, &to, slot, amount, shares)?;
        }
        state.check_not_drained()?;

        market::push(&env, &config.token_x, &to, amount_x)?;
        market::push(&env, &config.token_y, &to, amount_y)?;
        callback(&env, &to, amount_x, amount_y, &data);

        market::validate_account(&env, &state, &to)?;
        market::report_position(&env, &state, &config, &to)?;
        state.save(&env);

        emit_borrow(&env, &to, amount_x, amount_y);
        Ok(())
    }

    /// Repay X and/or Y debt of `on_behalf_of`, paid by `sender`.
    /// Amounts above the debt are capped.
    pub fn repay(
        env: Env,
        sender: Address,
        on_behalf_of: Address,
        amount_x: u128,
        amount_y: u128,
    ) -> Result<(u128, u128), DuoError> {
        sender.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &on_behalf_of)?;

        let mut repaid = [0u128; 2];
        for (n, (slot, token, amount)) in [
            (TokenSlot::BorrowX, &config.token_x, amount_x),
            (TokenSlot::BorrowY, &config.token_y, amount_y),
        ]
        .into_iter()
        .enumerate()
        {
            if amount == 0 {
                continue;
            }
            let held = ledger::balance(&env, &on_behalf_of, slot);
            let owed = ledger::assets_for(&state, slot, held, true)?;
            let amount = amount.min(owed);
            if amount == 0 {
                continue;
            }
            market::pull(&env, token, &sender, amount)?;
            repaid[n] = ledger::burn_debt(&env, &mut state, &on_behalf_of, slot, amount)?;
        }
        if repaid == [0, 0] {
            return Err(DuoError::InvalidAmount);
        }

        market::report_position(&env, &state, &config, &on_behalf_of)?;
        state.save(&env);

        emit_repay(&env, &sender, &on_behalf_of, repaid[0], repaid[1]);
        Ok((repaid[0], repaid[1]))
    }

    /// Borrow pool liquidity. The receiver gets X and Y in reserve
    /// proportion and owes `liquidity` in BORROW_L.
    pub fn borrow_liquidity(env: Env, to: Address, liquidity: u128, data: Bytes) -> Result<(u128, u128), DuoError> {
        to.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &to)?;

        if liquidity == 0 {
            return Err(DuoError::InvalidAmount);
        }
        let active = state.active_liquidity();
        if liquidity >= active {
            return Err(DuoError::InsufficientLiquidity);
        }
        let amount_x = mul_div(liquidity, state.reserves.reserve_x, active, false)?;
        let amount_y = mul_div(liquidity, state.reserves.reserve_y, active, false)?;

        let shares = ledger::shares_for(&state, TokenSlot::BorrowL, liquidity, true)?;
        ledger::mint(&env, &mut state, &to, TokenSlot::BorrowL, liquidity, shares)?;
        state.reserves.reserve_x -= amount_x;
        state.reserves.reserve_y -= amount_y;
        state.check_not_drained()?;

        market::push(&env, &config.token_x, &to, amount_x)?;
        market::push(&env, &config.token_y, &to, amount_y)?;
        callback(&env, &to, amount_x, amount_y, &data);

        market::record_price(&env, &mut state)?;
        market::validate_account(&env, &state, &to)?;
        market::report_position(&env, &state, &config, &to)?;
        state.save(&env);

        emit_borrow_liquidity(&env, &to, liquidity, amount_x, amount_y);
        Ok((amount_x, amount_y))
    }

    /// Return X and Y to the pool against BORROW_L debt of `on_behalf_of`.
    /// The smaller side sets the liquidity repaid; any excess stays in the
    /// reserves.
    pub fn repay_liquidity(
        env: Env,
        sender: Address,
        on_behalf_of: Address,
        amount_x: u128,
        amount_y: u128,
    ) -> Result<u128, DuoError> {
        sender.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &on_behalf_of)?;

        if amount_x == 0 || amount_y == 0 {
            return Err(DuoError::InvalidAmount);
        }
        if ledger::balance(&env, &on_behalf_of, TokenSlot::BorrowL) == 0 {
            return Err(DuoError::InsufficientShares);
        }

        let active = state.active_liquidity();
        let liquidity = mul_div(amount_x, active, state.reserves.reserve_x, false)?
            .min(mul_div(amount_y, active, state.reserves.reserve_y, false)?);
        if liquidity == 0 {
            return Err(DuoError::InsufficientLiquidityBurned);
        }

        market::pull(&env, &config.token_x, &sender, amount_x)?;
        market::pull(&env, &config.token_y, &sender, amount_y)?;
        let repaid = ledger::burn_debt(&env, &mut state, &on_behalf_of, TokenSlot::BorrowL, liquidity)?;
        state.reserves.reserve_x = to_u112(checked_sum(state.reserves.reserve_x, amount_x)?)?;
        state.reserves.reserve_y = to_u112(checked_sum(state.reserves.reserve_y, amount_y)?)?;

        market::record_price(&env, &mut state)?;
        market::report_position(&env, &state, &config, &on_behalf_of)?;
        state.save(&env);

        emit_repay_liquidity(&env, &sender, &on_behalf_of, amount_x, amount_y, repaid);
        Ok(repaid)
    }

    // ========================================================
    // SWAP
    // ========================================================

    /// Send the requested outputs to `to`, optionally call it back, then
    /// take whatever the pair's balances grew by as input. Fees follow the
    /// displacement of each input reserve from its reference value.
    pub fn swap(
        env: Env,
        to: Address,
        amount_x_out: u128,
        amount_y_out: u128,
        data: Bytes,
    ) -> Result<(u128, u128), DuoError> {
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &to)?;

        if amount_x_out == 0 && amount_y_out == 0 {
            return Err(DuoError::InsufficientOutputAmount);
        }
        let (effective_x, effective_y) = state.effective_reserves();
        if amount_x_out >= effective_x || amount_y_out >= effective_y {
            return Err(DuoError::InsufficientLiquidity);
        }

        let expected_x = state.expected_balance_x() - amount_x_out;
        let expected_y = state.expected_balance_y() - amount_y_out;

        market::push(&env, &config.token_x, &to, amount_x_out)?;
        market::push(&env, &config.token_y, &to, amount_y_out)?;
        callback(&env, &to, amount_x_out, amount_y_out, &data);

        let amount_x_in = market::token_balance(&env, &config.token_x)?.saturating_sub(expected_x);
        let amount_y_in = market::token_balance(&env, &config.token_y)?.saturating_sub(expected_y);
        if amount_x_in == 0 && amount_y_in == 0 {
            return Err(DuoError::InsufficientInputAmount);
        }

        let fee_x_bips = calculate_swap_fee_bips(
            amount_x_in,
            state.reserves.reference_reserve_x,
            state.reserves.reserve_x,
        )?;
        let fee_y_bips = calculate_swap_fee_bips(
            amount_y_in,
            state.reserves.reference_reserve_y,
            state.reserves.reserve_y,
        )?;
        check_constant_product(&SwapCheck {
            balance_x: checked_sum(effective_x, amount_x_in)? - amount_x_out,
            balance_y: checked_sum(effective_y, amount_y_in)? - amount_y_out,
            amount_x_in,
            amount_y_in,
            fee_x_bips,
            fee_y_bips,
            reserve_x: effective_x,
            reserve_y: effective_y,
        })?;

        state.reserves.reserve_x = to_u112(checked_sum(state.reserves.reserve_x, amount_x_in)? - amount_x_out)?;
        state.reserves.reserve_y = to_u112(checked_sum(state.reserves.reserve_y, amount_y_in)? - amount_y_out)?;

        market::record_price(&env, &mut state)?;
        state.save(&env);

        let fee_bips = if amount_x_in > 0 { fee_x_bips } else { fee_y_bips };
        emit_swap(&env, &to, amount_x_in, amount_y_in, amount_x_out, amount_y_out, fee_bips);
        Ok((amount_x_in, amount_y_in))
    }

    // ========================================================
    // LIQUIDATION
    // ========================================================

    /// Liquidate `borrower` under one of three policies.
    ///
    /// * `Hard` - repays debt for deposits at a premium bounded by the
    ///   borrower's LTV schedule (or approved by the saturation collaborator)
    /// * `Soft` - takes a slice of deposits from an over-saturated account,
    ///   no repayment
    /// * `Leverage` - unwinds an account past the leverage bound
    ///
    /// Returns the premium in bips.
    pub fn liquidate(
        env: Env,
        liquidator: Address,
        borrower: Address,
        mode: LiquidationMode,
        request: LiquidationRequest,
    ) -> Result<u128, DuoError> {
        liquidator.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, mut state) = open(&env, &borrower)?;

        if liquidator == borrower {
            return Err(DuoError::NotLiquidatable);
        }
        if !ledger::has_borrow(&env, &borrower) {
            return Err(DuoError::NotLiquidatable);
        }

        let input = market::input_params(&env, &state, &borrower)?;
        let params = LiquidationParams {
            deposit_l: request.deposit_l,
            deposit_x: request.deposit_x,
            deposit_y: request.deposit_y,
            repay_l: request.repay_l,
            repay_x: request.repay_x,
            repay_y: request.repay_y,
        };
        let saturation = SaturationClient::new(&env, &config.saturation);

        let (value, premium, bad_debt) = match mode {
            LiquidationMode::Hard => {
                let value = value_liquidation(&input, &params)?;
                let outcome = evaluate_hard(&value_position(&input)?, &value)?;
                if outcome.exceeds_schedule
                    && !saturation.liquidation_check_hard_premiums(&borrower, &value.repaid_l, &outcome.premium_bips)
                {
                    return Err(DuoError::PremiumExceedsMax);
                }
                log!(&env, "hard liquidation", outcome.ltv_bips, outcome.premium_bips, outcome.max_premium_bips);
                (value, outcome.premium_bips, outcome.bad_debt)
            }
            LiquidationMode::Soft => {
                if request.repay_l != 0 || request.repay_x != 0 || request.repay_y != 0 {
                    return Err(DuoError::InvalidAmount);
                }
                let snapshot = market::snapshot(&env, &state, &borrower)?;
                let ratio = saturation.calc_sat_change_ratio_bips(&borrower, &snapshot);
                let deposited = [
                    input.user_assets[DEPOSIT_L],
                    input.user_assets[DEPOSIT_X],
                    input.user_assets[DEPOSIT_Y],
                ];
                let premium = evaluate_soft(
                    ratio,
                    &SoftLiquidationParams {
                        transfer_l: request.deposit_l,
                        transfer_x: request.deposit_x,
                        transfer_y: request.deposit_y,
                    },
                    deposited,
                )?;
                log!(&env, "soft liquidation", ratio, premium);
                (value_liquidation(&input, &params)?, premium, false)
            }
            LiquidationMode::Leverage => {
                let value = value_liquidation(&input, &params)?;
                let outcome = evaluate_leverage(&value_position(&input)?, &value)?;
                log!(&env, "leverage liquidation", outcome.premium_bips, outcome.max_premium_bips);
                (value, outcome.premium_bips, outcome.bad_debt)
            }
        };

        repay_for(&env, &mut state, &config, &liquidator, &borrower, &request)?;

        for (slot, assets) in [
            (TokenSlot::DepositL, request.deposit_l),
            (TokenSlot::DepositX, request.deposit_x),
            (TokenSlot::DepositY, request.deposit_y),
        ] {
            ledger::transfer_assets(&env, &state, &borrower, &liquidator, slot, assets)?;
        }

        if bad_debt {
            let outcome = market::socialize_bad_debt(&env, &mut state, &borrower)?;
            market::record_price(&env, &mut state)?;
            emit_bad_debt(&env, &borrower, &outcome);
        }
        state.check_not_drained()?;

        market::validate_account(&env, &state, &liquidator)?;
        market::report_position(&env, &state, &config, &borrower)?;
        market::update_saturation(&env, &state, &config, &liquidator)?;
        state.save(&env);

        emit_liquidation(&env, &borrower, &liquidator, mode, value.seized_l, value.repaid_l, premium, bad_debt);
        Ok(premium)
    }

    // ========================================================
    // SHARES AND SETTINGS
    // ========================================================

    /// Move deposit shares between accounts. The sender must stay solvent.
    pub fn transfer_shares(
        env: Env,
        from: Address,
        to: Address,
        slot: TokenSlot,
        shares: u128,
    ) -> Result<(), DuoError> {
        from.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let (config, state) = open(&env, &from)?;

        if slot.is_debt() {
            return Err(DuoError::InvalidTokenSlot);
        }
        if shares == 0 {
            return Err(DuoError::InvalidAmount);
        }

        ledger::transfer(&env, &from, &to, slot, shares)?;

        market::validate_account(&env, &state, &from)?;
        market::validate_account(&env, &state, &to)?;
        market::update_saturation(&env, &state, &config, &from)?;
        market::update_saturation(&env, &state, &config, &to)?;
        state.save(&env);

        emit_share_transfer(&env, &from, &to, slot, shares);
        Ok(())
    }

    /// Saturation tolerance of `account`, at most 99%
    pub fn set_saturation_tolerance(env: Env, account: Address, tolerance_wad: u128) -> Result<(), DuoError> {
        account.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;
        let config = read_config(&env)?;

        if tolerance_wad > MAX_SATURATION_TOLERANCE_WAD {
            return Err(DuoError::InvalidSaturationTolerance);
        }
        write_tolerance(&env, &account, tolerance_wad);

        let state = MarketState::load(&env)?;
        if state.observations.is_some() {
            market::update_saturation(&env, &state, &config, &account)?;
        }

        emit_tolerance_set(&env, &account, tolerance_wad);
        Ok(())
    }

    // ========================================================
    // ADMIN
    // ========================================================

    /// Update the oracle intervals (long term must be >= 14x mid term)
    pub fn set_oracle_intervals(env: Env, mid_term_interval: u32, long_term_interval: u32) -> Result<(), DuoError> {
        let mut config = read_config(&env)?;
        config.admin.require_auth();
        let _lock = ReentrancyLock::acquire(&env)?;

        Observations::validate_intervals(mid_term_interval, long_term_interval)?;
        let mut state = MarketState::load(&env)?;
        if let Some(observations) = state.observations.as_mut() {
            observations.set_intervals(mid_term_interval, long_term_interval)?;
        }
        config.mid_term_interval = mid_term_interval;
        config.long_term_interval = long_term_interval;
        write_config(&env, &config);
        state.save(&env);

        emit_config_updated(&env, mid_term_interval, long_term_interval, config.external_liquidity, &config.fee_recipient);
        Ok(())
    }

    pub fn set_external_liquidity(env: Env, external_liquidity: u128) -> Result<(), DuoError> {
        let mut config = read_config(&env)?;
        config.admin.require_auth();

        config.external_liquidity = external_liquidity;
        write_config(&env, &config);
        emit_config_updated(
            &env,
            config.mid_term_interval,
            config.long_term_interval,
            external_liquidity,
            &config.fee_recipient,
        );
        Ok(())
    }

    pub fn set_fee_recipient(env: Env, fee_recipient: Address) -> Result<(), DuoError> {
        let mut config = read_config(&env)?;
        config.admin.require_auth();

        config.fee_recipient = fee_recipient;
        write_config(&env, &config);
        emit_config_updated(
            &env,
            config.mid_term_interval,
            config.long_term_interval,
            config.external_liquidity,
            &config.fee_recipient,
        );
        Ok(())
    }

    // ========================================================
    // VIEW FUNCTIONS
    // ========================================================
    // Views read the stored state; interest since the last accrual is not
    // included.

    pub fn is_initialized(env: Env) -> bool {
        is_initialized(&env)
    }

    pub fn get_config(env: Env) -> Result<MarketConfig, DuoError> {
        read_config(&env)
    }

    pub fn get_reserves(env: Env) -> Result<ReservesView, DuoError> {
        let state = MarketState::load(&env)?;
        Ok(ReservesView {
            reserve_x: state.reserves.reserve_x,
            reserve_y: state.reserves.reserve_y,
            reference_reserve_x: state.reserves.reference_reserve_x,
            reference_reserve_y: state.reserves.reference_reserve_y,
            missing_x: state.missing_x(),
            missing_y: state.missing_y(),
            active_liquidity: state.active_liquidity(),
            last_update: state.reserves.last_update,
        })
    }

    pub fn total_assets(env: Env, slot: TokenSlot) -> Result<u128, DuoError> {
        Ok(MarketState::load(&env)?.total_assets[slot.index()])
    }

    pub fn total_supply(env: Env, slot: TokenSlot) -> Result<u128, DuoError> {
        Ok(MarketState::load(&env)?.total_shares[slot.index()])
    }

    /// Share balance of `account` in `slot`
    pub fn balance(env: Env, account: Address, slot: TokenSlot) -> u128 {
        ledger::balance(&env, &account, slot)
    }

    pub fn saturation_tolerance(env: Env, account: Address) -> u128 {
        read_tolerance(&env, &account, DEFAULT_SATURATION_TOLERANCE_WAD)
    }

    pub fn get_tick_range(env: Env) -> Result<(i32, i32), DuoError> {
        let state = MarketState::load(&env)?;
        market::tick_range(&env, &state)
    }

    pub fn get_oracle(env: Env) -> Result<OracleView, DuoError> {
        let state = MarketState::load(&env)?;
        let now = market::now(&env);
        let observations = state.observations()?;
        let current_tick = market::current_tick(&state)?;
        let (tick_min, tick_max) = observations.tick_range(current_tick, now);
        Ok(OracleView {
            current_tick,
            last_tick: observations.last_tick,
            mid_term_tick: observations.mid_term_tick(now),
            long_term_tick: observations.long_term_tick(now),
            lending_state_tick: observations.lending_state_tick(now),
            tick_min,
            tick_max,
        })
    }

    /// Asset amounts and L valuation of an account
    pub fn get_position(env: Env, account: Address) -> Result<PositionView, DuoError> {
        let state = MarketState::load(&env)?;
        let input = market::input_params(&env, &state, &account)?;
        let valuation = value_position(&input)?;
        let assets = input.user_assets;
        Ok(PositionView {
            deposit_l: assets[DEPOSIT_L],
            deposit_x: assets[DEPOSIT_X],
            deposit_y: assets[DEPOSIT_Y],
            borrow_l: assets[BORROW_L],
            borrow_x: assets[BORROW_X],
            borrow_y: assets[BORROW_Y],
            deposits_l: valuation.deposits_l,
            debts_l: valuation.debts_l,
            collateral_l: valuation.collateral_l,
            debt_l: valuation.debt_l,
            net_debt_x: valuation.net_debt_x,
        })
    }

    /// Quote a swap of `amount_in` against the effective reserves
    pub fn get_amount_out(env: Env, amount_in: u128, x_for_y: bool) -> Result<u128, DuoError> {
        let mut state = MarketState::load(&env)?;
        state.refresh_reference(env.ledger().sequence());
        let (effective_x, effective_y) = state.effective_reserves();
        let (reserve_in, reference_in, effective_in, effective_out) = if x_for_y {
            (state.reserves.reserve_x, state.reserves.reference_reserve_x, effective_x, effective_y)
        } else {
            (state.reserves.reserve_y, state.reserves.reference_reserve_y, effective_y, effective_x)
        };
        let fee_bips = calculate_swap_fee_bips(amount_in, reference_in, reserve_in)?;
        duoswap_math::get_amount_out(amount_in, effective_in, effective_out, fee_bips)
    }
}

// ============================================================
// INTERNAL HELPERS
// ============================================================

/// Load config and state, then accrue to the current ledger time
fn open(env: &Env, account: &Address) -> Result<(MarketConfig, MarketState), DuoError> {
    let config = read_config(env)?;
    let mut state = MarketState::load(env)?;
    market::accrue(env, &mut state, &config, account)?;
    Ok((config, state))
}

fn callback(env: &Env, to: &Address, amount_x: u128, amount_y: u128, data: &Bytes) {
    if data.is_empty() {
        return;
    }
    PairCalleeClient::new(env, to).pair_callback(to, &amount_x, &amount_y, data);
}

/// Collect the liquidator's promised repayment and retire the borrower's
/// debt with it. L debt is paid in X and Y at the reserve ratio.
fn repay_for(
    env: &Env,
    state: &mut MarketState,
    config: &MarketConfig,
    liquidator: &Address,
    borrower: &Address,
    request: &LiquidationRequest,
) -> Result<(), DuoError> {
    let (mut owed_x, mut owed_y) = (request.repay_x, request.repay_y);
    let (mut liquidity_x, mut liquidity_y) = (0u128, 0u128);
    if request.repay_l > 0 {
        let active = state.active_liquidity();
        liquidity_x = mul_div(request.repay_l, state.reserves.reserve_x, active, true)?;
        liquidity_y = mul_div(request.repay_l, state.reserves.reserve_y, active, true)?;
        owed_x = owed_x.checked_add(liquidity_x).ok_or(DuoError::Overflow)?;
        owed_y = owed_y.checked_add(liquidity_y).ok_or(DuoError::Overflow)?;
    }

    collect_promised(env, &config.token_x, liquidator, owed_x)?;
    collect_promised(env, &config.token_y, liquidator, owed_y)?;

    if request.repay_l > 0 {
        ledger::burn_debt(env, state, borrower, TokenSlot::BorrowL, request.repay_l)?;
        state.reserves.reserve_x = to_u112(checked_sum(state.reserves.reserve_x, liquidity_x)?)?;
        state.reserves.reserve_y = to_u112(checked_sum(state.reserves.reserve_y, liquidity_y)?)?;
        market::record_price(env, state)?;
    }
    if request.repay_x > 0 {
        ledger::burn_debt(env, state, borrower, TokenSlot::BorrowX, request.repay_x)?;
    }
    if request.repay_y > 0 {
        ledger::burn_debt(env, state, borrower, TokenSlot::BorrowY, request.repay_y)?;
    }
    Ok(())
}

/// Pull `promised` from `from` and check the pair's balance grew by at
/// least that much
fn collect_promised(env: &Env, token: &Address, from: &Address, promised: u128) -> Result<(), DuoError> {
    if promised == 0 {
        return Ok(());
    }
    let before = market::token_balance(env, token)?;
    market::pull(env, token, from, promised)?;
    let received = market::token_balance(env, token)?.saturating_sub(before);
    if received < promised {
        return Err(DuoError::RepayBelowPromised);
    }
    Ok(())
}

#[inline]
fn checked_sum(a: u128, b: u128) -> Result<u128, DuoError> {
    a.checked_add(b).ok_or(DuoError::Overflow)
}

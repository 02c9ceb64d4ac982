// Pair events module for DuoSwap
// One publisher per state-changing operation, compact topic names

use duoswap_interest::InterestAccrual;
use duoswap_math::TokenSlot;
use soroban_sdk::{Address, Env, Symbol};

use crate::market::BadDebt;
use crate::types::LiquidationMode;

/// Topics: ("Init",)
/// Data: (token_x, token_y, saturation)
pub fn emit_initialized(env: &Env, token_x: &Address, token_y: &Address, saturation: &Address) {
    env.events().publish(
        (Symbol::new(env, "Init"),),
        (token_x.clone(), token_y.clone(), saturation.clone()),
    );
}

/// Topics: ("Mint", to)
/// Data: (amount_x, amount_y, liquidity_assets, liquidity_shares)
pub fn emit_liquidity_minted(
    env: &Env,
    to: &Address,
    amount_x: u128,
    amount_y: u128,
    liquidity_assets: u128,
    liquidity_shares: u128,
) {
    env.events().publish(
        (Symbol::new(env, "Mint"), to.clone()),
        (amount_x, amount_y, liquidity_assets, liquidity_shares),
    );
}

/// Topics: ("Burn", to)
/// Data: (amount_x, amount_y, liquidity_assets, liquidity_shares)
pub fn emit_liquidity_burned(
    env: &Env,
    to: &Address,
    amount_x: u128,
    amount_y: u128,
    liquidity_assets: u128,
    liquidity_shares: u128,
) {
    env.events().publish(
        (Symbol::new(env, "Burn"), to.clone()),
        (amount_x, amount_y, liquidity_assets, liquidity_shares),
    );
}

/// Topics: ("Deposit", to)
/// Data: (amount_x, amount_y)
pub fn emit_deposit(env: &Env, to: &Address, amount_x: u128, amount_y: u128) {
    env.events()
        .publish((Symbol::new(env, "Deposit"), to.clone()), (amount_x, amount_y));
}

/// Topics: ("Withdraw", to)
/// Data: (amount_x, amount_y)
pub fn emit_withdraw(env: &Env, to: &Address, amount_x: u128, amount_y: u128) {
    env.events()
        .publish((Symbol::new(env, "Withdraw"), to.clone()), (amount_x, amount_y));
}

/// Topics: ("Borrow", to)
/// Data: (amount_x, amount_y)
pub fn emit_borrow(env: &Env, to: &Address, amount_x: u128, amount_y: u128) {
    env.events()
        .publish((Symbol::new(env, "Borrow"), to.clone()), (amount_x, amount_y));
}

/// Topics: ("Repay", on_behalf_of)
/// Data: (sender, amount_x, amount_y)
pub fn emit_repay(env: &Env, sender: &Address, on_behalf_of: &Address, amount_x: u128, amount_y: u128) {
    env.events().publish(
        (Symbol::new(env, "Repay"), on_behalf_of.clone()),
        (sender.clone(), amount_x, amount_y),
    );
}

/// Topics: ("BorrowLiq", to)
/// Data: (liquidity, amount_x, amount_y)
pub fn emit_borrow_liquidity(env: &Env, to: &Address, liquidity: u128, amount_x: u128, amount_y: u128) {
    env.events().publish(
        (Symbol::new(env, "BorrowLiq"), to.clone()),
        (liquidity, amount_x, amount_y),
    );
}

/// Topics: ("RepayLiq", on_behalf_of)
/// Data: (sender, amount_x, amount_y, liquidity)
pub fn emit_repay_liquidity(
    env: &Env,
    sender: &Address,
    on_behalf_of: &Address,
    amount_x: u128,
    amount_y: u128,
    liquidity: u128,
) {
    env.events().publish(
        (Symbol::new(env, "RepayLiq"), on_behalf_of.clone()),
        (sender.clone(), amount_x, amount_y, liquidity),
    );
}

/// Topics: ("Swap", to)
/// Data: (amount_x_in, amount_y_in, amount_x_out, amount_y_out, fee_bips)
pub fn emit_swap(
    env: &Env,
    to: &Address,
    amount_x_in: u128,
    amount_y_in: u128,
    amount_x_out: u128,
    amount_y_out: u128,
    fee_bips: u128,
) {
    env.events().publish(
        (Symbol::new(env, "Swap"), to.clone()),
        (amount_x_in, amount_y_in, amount_x_out, amount_y_out, fee_bips),
    );
}

/// Topics: ("Liquidate", borrower)
/// Data: (liquidator, mode, seized_l, repaid_l, premium_bips, bad_debt)
pub fn emit_liquidation(
    env: &Env,
    borrower: &Address,
    liquidator: &Address,
    mode: LiquidationMode,
    seized_l: u128,
    repaid_l: u128,
    premium_bips: u128,
    bad_debt: bool,
) {
    env.events().publish(
        (Symbol::new(env, "Liquidate"), borrower.clone()),
        (liquidator.clone(), mode as u32, seized_l, repaid_l, premium_bips, bad_debt),
    );
}

/// Topics: ("BadDebt", borrower)
/// Data: (seized_l, seized_x, seized_y, written_off_l, written_off_x, written_off_y)
pub fn emit_bad_debt(env: &Env, borrower: &Address, outcome: &BadDebt) {
    env.events().publish(
        (Symbol::new(env, "BadDebt"), borrower.clone()),
        (
            outcome.seized[0],
            outcome.seized[1],
            outcome.seized[2],
            outcome.written_off[0],
            outcome.written_off[1],
            outcome.written_off[2],
        ),
    );
}

/// Topics: ("Transfer", from, to)
/// Data: (slot, shares)
pub fn emit_share_transfer(env: &Env, from: &Address, to: &Address, slot: TokenSlot, shares: u128) {
    env.events().publish(
        (Symbol::new(env, "Transfer"), from.clone(), to.clone()),
        (slot as u32, shares),
    );
}

/// Topics: ("Interest",)
/// Data: (interest_l, interest_x, interest_y, protocol_fee_x, protocol_fee_y,
///        reserve_interest_x, reserve_interest_y)
pub fn emit_interest_accrued(env: &Env, accrual: &InterestAccrual) {
    env.events().publish(
        (Symbol::new(env, "Interest"),),
        (
            accrual.interest_l,
            accrual.interest_x,
            accrual.interest_y,
            accrual.protocol_fee_x,
            accrual.protocol_fee_y,
            accrual.reserve_interest_x,
            accrual.reserve_interest_y,
        ),
    );
}

/// Topics: ("Tolerance", account)
/// Data: tolerance_wad
pub fn emit_tolerance_set(env: &Env, account: &Address, tolerance_wad: u128) {
    env.events()
        .publish((Symbol::new(env, "Tolerance"), account.clone()), tolerance_wad);
}

/// Topics: ("Config",)
/// Data: (mid_term_interval, long_term_interval, external_liquidity, fee_recipient)
pub fn emit_config_updated(env: &Env, mid: u32, long: u32, external_liquidity: u128, fee_recipient: &Address) {
    env.events().publish(
        (Symbol::new(env, "Config"),),
        (mid, long, external_liquidity, fee_recipient.clone()),
    );
}

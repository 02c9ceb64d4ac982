// Collaborator interfaces

use soroban_sdk::{contractclient, Address, Bytes, Env};

use crate::types::PositionSnapshot;

/// Saturation risk tracker. Owns the per-tranche risk tree; the pair only
/// reports positions and asks for penalties and liquidation limits.
#[allow(dead_code)]
#[contractclient(name = "SaturationClient")]
pub trait SaturationInterface {
    fn init(env: Env, first_tick: i32);

    fn update(env: Env, account: Address, snapshot: PositionSnapshot);

    /// Returns (penalty assets added to L debt, penalty shares owed by `account`)
    fn accrue_penalties(
        env: Env,
        account: Address,
        external_liquidity: u128,
        duration: u32,
        borrow_l_assets: u128,
        borrow_l_shares: u128,
    ) -> (u128, u128);

    fn calc_sat_change_ratio_bips(env: Env, account: Address, snapshot: PositionSnapshot) -> u128;

    fn liquidation_check_hard_premiums(
        env: Env,
        account: Address,
        repaid_l: u128,
        premium_bips: u128,
    ) -> bool;

    fn sat_percentage_wad(env: Env) -> u128;
}

/// Implemented by receivers of optimistic transfers
#[allow(dead_code)]
#[contractclient(name = "PairCalleeClient")]
pub trait PairCallee {
    fn pair_callback(env: Env, sender: Address, amount_x: u128, amount_y: u128, data: Bytes);
}

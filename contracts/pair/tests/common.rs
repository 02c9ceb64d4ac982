#![allow(dead_code)]

use soroban_sdk::{
    contract, contractimpl, contracttype, testutils::Address as _, testutils::Ledger as _, token,
    Address, Bytes, Env,
};
use duoswap_pair::types::PositionSnapshot;
use duoswap_pair::{DuoPair, DuoPairClient};

// Test constants
pub const INITIAL_RESERVE: u128 = 1_000_000;
pub const WALLET: i128 = 100_000_000;

// ============================================================
// MOCK SATURATION
// ============================================================

#[contracttype]
#[derive(Clone)]
enum MockKey {
    SatWad,
    Ratio,
    Approve,
    Penalty,
    InitTick,
    Snapshot(Address),
}

/// Saturation collaborator with canned answers
#[contract]
pub struct MockSaturation;

#[contractimpl]
impl MockSaturation {
    pub fn init(env: Env, first_tick: i32) {
        env.storage().instance().set(&MockKey::InitTick, &first_tick);
    }

    pub fn update(env: Env, account: Address, snapshot: PositionSnapshot) {
        env.storage().instance().set(&MockKey::Snapshot(account), &snapshot);
    }

    pub fn accrue_penalties(
        env: Env,
        _account: Address,
        _external_liquidity: u128,
        _duration: u32,
        _borrow_l_assets: u128,
        _borrow_l_shares: u128,
    ) -> (u128, u128) {
        env.storage().instance().get(&MockKey::Penalty).unwrap_or((0, 0))
    }

    pub fn calc_sat_change_ratio_bips(env: Env, _account: Address, _snapshot: PositionSnapshot) -> u128 {
        env.storage().instance().get(&MockKey::Ratio).unwrap_or(10_000)
    }

    pub fn liquidation_check_hard_premiums(
        env: Env,
        _account: Address,
        _repaid_l: u128,
        _premium_bips: u128,
    ) -> bool {
        env.storage().instance().get(&MockKey::Approve).unwrap_or(false)
    }

    pub fn sat_percentage_wad(env: Env) -> u128 {
        env.storage().instance().get(&MockKey::SatWad).unwrap_or(0)
    }

    // Test controls

    pub fn set_sat_wad(env: Env, sat_wad: u128) {
        env.storage().instance().set(&MockKey::SatWad, &sat_wad);
    }

    pub fn set_ratio(env: Env, ratio_bips: u128) {
        env.storage().instance().set(&MockKey::Ratio, &ratio_bips);
    }

    pub fn set_approve(env: Env, approve: bool) {
        env.storage().instance().set(&MockKey::Approve, &approve);
    }

    pub fn set_penalty(env: Env, assets: u128, shares: u128) {
        env.storage().instance().set(&MockKey::Penalty, &(assets, shares));
    }

    pub fn init_tick(env: Env) -> Option<i32> {
        env.storage().instance().get(&MockKey::InitTick)
    }

    pub fn last_snapshot(env: Env, account: Address) -> Option<PositionSnapshot> {
        env.storage().instance().get(&MockKey::Snapshot(account))
    }
}

// ============================================================
// CALLBACK RECEIVER
// ============================================================

#[contracttype]
#[derive(Clone)]
enum CalleeKey {
    Payment,
    Received,
}

/// Pays a configured amount of one token back to the pair when called
#[contract]
pub struct PayingCallee;

#[contractimpl]
impl PayingCallee {
    pub fn configure(env: Env, pair: Address, token: Address, amount: i128) {
        env.storage().instance().set(&CalleeKey::Payment, &(pair, token, amount));
    }

    pub fn pair_callback(env: Env, _sender: Address, amount_x: u128, amount_y: u128, _data: Bytes) {
        env.storage().instance().set(&CalleeKey::Received, &(amount_x, amount_y));
        let payment: Option<(Address, Address, i128)> = env.storage().instance().get(&CalleeKey::Payment);
        if let Some((pair, token, amount)) = payment {
            if amount > 0 {
                token::Client::new(&env, &token).transfer(&env.current_contract_address(), &pair, &amount);
            }
        }
    }

    pub fn received(env: Env) -> Option<(u128, u128)> {
        env.storage().instance().get(&CalleeKey::Received)
    }
}

// ============================================================
// FEE-ON-TRANSFER TOKEN
// ============================================================

#[contracttype]
#[derive(Clone)]
enum FeeTokenKey {
    Balance(Address),
    FeeBips,
}

/// Token that burns a cut of every transfer
#[contract]
pub struct FeeToken;

#[contractimpl]
impl FeeToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage().instance().set(&FeeTokenKey::Balance(to), &(balance + amount));
    }

    pub fn set_fee_bips(env: Env, fee_bips: i128) {
        env.storage().instance().set(&FeeTokenKey::FeeBips, &fee_bips);
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage().instance().get(&FeeTokenKey::Balance(id)).unwrap_or(0)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        let from_balance = Self::balance(env.clone(), from.clone());
        assert!(from_balance >= amount, "insufficient balance");
        env.storage().instance().set(&FeeTokenKey::Balance(from), &(from_balance - amount));

        let fee_bips: i128 = env.storage().instance().get(&FeeTokenKey::FeeBips).unwrap_or(0);
        let received = amount - amount * fee_bips / 10_000;
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage().instance().set(&FeeTokenKey::Balance(to), &(to_balance + received));
    }
}

// ============================================================
// SETUP
// ============================================================

pub struct TestMarket<'a> {
    pub pair: DuoPairClient<'a>,
    pub saturation: MockSaturationClient<'a>,
    pub admin: Address,
    pub fee_recipient: Address,
    pub token_x: Address,
    pub token_y: Address,
}

/// Initialized market without liquidity
pub fn setup_market(env: &Env) -> TestMarket<'_> {
    let admin = Address::generate(env);
    let token_x = create_token(env, &admin);
    let token_y = create_token(env, &admin);
    setup_market_with_tokens(env, admin, token_x, token_y)
}

/// Initialized market over the given tokens
pub fn setup_market_with_tokens(env: &Env, admin: Address, token_x: Address, token_y: Address) -> TestMarket<'_> {
    let fee_recipient = Address::generate(env);
    let saturation_id = env.register(MockSaturation, ());
    let pair_id = env.register(DuoPair, ());
    let pair = DuoPairClient::new(env, &pair_id);
    pair.initialize(&admin, &token_x, &token_y, &saturation_id, &fee_recipient);

    TestMarket {
        pair,
        saturation: MockSaturationClient::new(env, &saturation_id),
        admin,
        fee_recipient,
        token_x,
        token_y,
    }
}

/// Market with 1M / 1M of liquidity from a funded provider
pub fn setup_market_with_liquidity(env: &Env) -> (TestMarket<'_>, Address) {
    let market = setup_market(env);
    let provider = funded_user(env, &market);
    market
        .pair
        .deposit_liquidity(&provider, &INITIAL_RESERVE, &INITIAL_RESERVE);
    (market, provider)
}

/// Create a test token
pub fn create_token(env: &Env, admin: &Address) -> Address {
    let token_id = env.register_stellar_asset_contract_v2(admin.clone());
    token_id.address()
}

/// Mint tokens to an address
pub fn mint_tokens(env: &Env, token: &Address, to: &Address, amount: i128) {
    use soroban_sdk::token::StellarAssetClient;
    let client = StellarAssetClient::new(env, token);
    client.mint(to, &amount);
}

pub fn token_balance(env: &Env, token: &Address, account: &Address) -> i128 {
    token::Client::new(env, token).balance(account)
}

/// New account holding WALLET of both tokens
pub fn funded_user(env: &Env, market: &TestMarket) -> Address {
    let user = Address::generate(env);
    mint_tokens(env, &market.token_x, &user, WALLET);
    mint_tokens(env, &market.token_y, &user, WALLET);
    user
}

/// Start a new ledger so the swap-fee reference reserves are refreshed
pub fn next_ledger(env: &Env, seconds: u64) {
    env.ledger().with_mut(|li| {
        li.sequence_number += 1;
        li.timestamp += seconds;
    });
}

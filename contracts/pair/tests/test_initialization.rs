mod common;

use duoswap_math::{DuoError, TokenSlot};
use duoswap_pair::{DuoPair, DuoPairClient};
use soroban_sdk::{testutils::Address as _, Address, Env};

#[test]
fn test_initialize_stores_config() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let config = market.pair.get_config();

    assert!(market.pair.is_initialized());
    assert_eq!(config.admin, market.admin);
    assert_eq!(config.token_x, market.token_x);
    assert_eq!(config.token_y, market.token_y);
    assert_eq!(config.fee_recipient, market.fee_recipient);
    assert_eq!(config.mid_term_interval, 12);
    assert_eq!(config.long_term_interval, 900);
    assert_eq!(config.external_liquidity, 0);
}

#[test]
fn test_initialize_twice_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let config = market.pair.get_config();

    let result = market.pair.try_initialize(
        &config.admin,
        &config.token_x,
        &config.token_y,
        &config.saturation,
        &config.fee_recipient,
    );
    assert_eq!(result, Err(Ok(DuoError::AlreadyInitialized)));
}

#[test]
fn test_initialize_same_token_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let token = common::create_token(&env, &admin);
    let pair = DuoPairClient::new(&env, &env.register(DuoPair, ()));

    let result = pair.try_initialize(&admin, &token, &token, &Address::generate(&env), &admin);
    assert_eq!(result, Err(Ok(DuoError::InvalidTokenSlot)));
}

#[test]
fn test_operations_before_initialize_fail() {
    let env = Env::default();
    env.mock_all_auths();

    let pair = DuoPairClient::new(&env, &env.register(DuoPair, ()));
    let user = Address::generate(&env);

    assert!(!pair.is_initialized());
    assert_eq!(pair.try_deposit(&user, &100, &0), Err(Ok(DuoError::NotInitialized)));
    assert_eq!(pair.try_get_config(), Err(Ok(DuoError::NotInitialized)));
}

#[test]
fn test_empty_market_views() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let reserves = market.pair.get_reserves();

    assert_eq!(reserves.reserve_x, 0);
    assert_eq!(reserves.reserve_y, 0);
    assert_eq!(reserves.active_liquidity, 0);
    for slot in TokenSlot::ALL {
        assert_eq!(market.pair.total_supply(&slot), 0);
        assert_eq!(market.pair.total_assets(&slot), 0);
    }
    // No oracle until the first liquidity deposit
    assert_eq!(market.pair.try_get_oracle(), Err(Ok(DuoError::NotInitialized)));
}

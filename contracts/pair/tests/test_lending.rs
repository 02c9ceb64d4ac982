mod common;

use duoswap_math::{DuoError, TokenSlot};
use soroban_sdk::{Bytes, Env};

// ============================================================
// DEPOSIT / WITHDRAW
// ============================================================

#[test]
fn test_deposit_and_withdraw() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let lender = common::funded_user(&env, &market);

    market.pair.deposit(&lender, &100_000, &50_000);
    assert_eq!(market.pair.balance(&lender, &TokenSlot::DepositX), 100_000);
    assert_eq!(market.pair.balance(&lender, &TokenSlot::DepositY), 50_000);
    assert_eq!(market.pair.total_assets(&TokenSlot::DepositX), 100_000);
    assert_eq!(
        common::token_balance(&env, &market.token_x, &market.pair.address),
        100_000
    );

    market.pair.withdraw(&lender, &40_000, &0);
    assert_eq!(market.pair.balance(&lender, &TokenSlot::DepositX), 60_000);
    assert_eq!(
        common::token_balance(&env, &market.token_x, &lender),
        common::WALLET - 60_000
    );
}

#[test]
fn test_deposit_nothing_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let lender = common::funded_user(&env, &market);

    assert_eq!(market.pair.try_deposit(&lender, &0, &0), Err(Ok(DuoError::InvalidAmount)));
}

#[test]
fn test_withdraw_more_than_deposited_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let lender = common::funded_user(&env, &market);
    market.pair.deposit(&lender, &100_000, &0);

    let result = market.pair.try_withdraw(&lender, &100_001, &0);
    assert_eq!(result, Err(Ok(DuoError::InsufficientShares)));
}

// ============================================================
// BORROW
// ============================================================

#[test]
fn test_collateralized_borrow_then_same_asset_deposit_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, _provider) = common::setup_market_with_liquidity(&env);
    let borrower = common::funded_user(&env, &market);

    market.pair.deposit(&borrower, &100_000, &0);
    market.pair.borrow(&borrower, &0, &50_000, &Bytes::new(&env));

    assert_eq!(market.pair.balance(&borrower, &TokenSlot::BorrowY), 50_000);
    assert_eq!(
        common::token_balance(&env, &market.token_y, &borrower),
        common::WALLET + 50_000
    );

    // Y lent out of the reserve shows up as missing
    let reserves = market.pair.get_reserves();
    assert_eq!(reserves.missing_y, 50_000);
    assert_eq!(reserves.reserve_y, common::INITIAL_RESERVE);

    let result = market.pair.try_deposit(&borrower, &0, &10_000);
    assert_eq!(result, Err(Ok(DuoError::SameAssetCollateralAndDebt)));
}

#[test]
fn test_borrow_without_collateral_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, _provider) = common::setup_market_with_liquidity(&env);
    let borrower = common::funded_user(&env, &market);

    let result = market.pair.try_borrow(&borrower, &0, &10_000, &Bytes::new(&env));
    assert_eq!(result, Err(Ok(DuoError::DepositNotGreaterThanDebt)));
}

#[test]
fn test_borrow_above_ltv_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, _provider) = common::setup_market_with_liquidity(&env);
    let borrower = common::funded_user(&env, &market);
    market.pair.deposit(&borrower, &100_000, &0);

    let result = market.pair.try_borrow(&borrower, &0, &60_000, &Bytes::new(&env));
    assert_eq!(result, Err(Ok(DuoError::LtvExceeded)));
}

#[test]
fn test_borrow_past_leverage_bound_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, _provider) = common::setup_market_with_liquidity(&env);
    let borrower = common::funded_user(&env, &market);
    market.pair.deposit(&borrower, &100_000, &0);

    let result = market.pair.try_borrow(&borrower, &0, &70_000, &Bytes::new(&env));
    assert_eq!(result, Err(Ok(DuoError::LeverageExceeded)));
}

#[test]
fn test_borrow_without_liquidity_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let borrower = common::funded_user(&env, &market);
    market.pair.deposit(&borrower, &100_000, &0);

    let result = market.pair.try_borrow(&borrower, &0, &10_000, &Bytes::new(&env));
    assert_eq!(result, Err(Ok(DuoError::InsufficientLiquidity)));
}

#[test]
fn test_borrow_reports_position_to_saturation() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, _provider) = common::setup_market_with_liquidity(&env);
    let borrower = common::funded_user(&env, &market);
    market.pair.deposit(&borrower, &100_000, &0);
    market.pair.borrow(&borrower, &0, &50_000, &Bytes::new(&env));

    let snapshot = market.saturation.last_snapshot(&borrower).unwrap();
    assert_eq!(snapshot.deposit_x, 100_000);
    assert_eq!(snapshot.borrow_y, 50_000);
    assert_eq!(snapshot.saturation_tolerance_wad, duoswap_pair::DEFAULT_SATURATION_TOLERANCE_WAD);
    assert!(snapshot.tick_min < 0 && snapshot.tick_max > 0);
}

#[test]
fn test_borrow_calls_back_receiver() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, _provider) = common::setup_market_with_liquidity(&env);
    let callee = env.register(common::PayingCallee, ());
    let callee_client = common::PayingCalleeClient::new(&env, &callee);
    common::mint_tokens(&env, &market.token_x, &callee, 100_000);
    market.pair.deposit(&callee, &100_000, &0);

    market.pair.borrow(&callee, &0, &20_000, &Bytes::from_slice(&env, b"go"));
    assert_eq!(callee_client.received(), Some((0, 20_000)));
}

// ============================================================
// REPAY
// ============================================================

#[test]
fn test_partial_and_capped_repay() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, _provider) = common::setup_market_with_liquidity(&env);
    let borrower = common::funded_user(&env, &market);
    market.pair.deposit(&borrower, &100_000, &0);
    market.pair.borrow(&borrower, &0, &50_000, &Bytes::new(&env));

    assert_eq!(market.pair.repay(&borrower, &borrower, &0, &20_000), (0, 20_000));
    assert_eq!(market.pair.balance(&borrower, &TokenSlot::BorrowY), 30_000);

    // Overpayment is capped at the outstanding debt
    let payer = common::funded_user(&env, &market);
    assert_eq!(market.pair.repay(&payer, &borrower, &0, &100_000), (0, 30_000));
    assert_eq!(market.pair.balance(&borrower, &TokenSlot::BorrowY), 0);
    assert_eq!(
        common::token_balance(&env, &market.token_y, &payer),
        common::WALLET - 30_000
    );
    assert_eq!(market.pair.get_reserves().missing_y, 0);

    // With the debt gone, Y may be deposited again
    market.pair.deposit(&borrower, &0, &10_000);
}

#[test]
fn test_repay_without_debt_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, provider) = common::setup_market_with_liquidity(&env);

    let result = market.pair.try_repay(&provider, &provider, &1_000, &1_000);
    assert_eq!(result, Err(Ok(DuoError::InvalidAmount)));
}

// ============================================================
// SHARE TRANSFERS
// ============================================================

#[test]
fn test_transfer_deposit_shares() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let lender = common::funded_user(&env, &market);
    let other = common::funded_user(&env, &market);
    market.pair.deposit(&lender, &100_000, &0);

    market.pair.transfer_shares(&lender, &other, &TokenSlot::DepositX, &30_000);
    assert_eq!(market.pair.balance(&lender, &TokenSlot::DepositX), 70_000);
    assert_eq!(market.pair.balance(&other, &TokenSlot::DepositX), 30_000);
    assert_eq!(market.pair.total_supply(&TokenSlot::DepositX), 100_000);
}

#[test]
fn test_transfer_debt_shares_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let market = common::setup_market(&env);
    let lender = common::funded_user(&env, &market);
    let other = common::funded_user(&env, &market);

    let result = market.pair.try_transfer_shares(&lender, &other, &TokenSlot::BorrowX, &1);
    assert_eq!(result, Err(Ok(DuoError::InvalidTokenSlot)));
}

#[test]
fn test_transfer_leaving_sender_insolvent_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let (market, _provider) = common::setup_market_with_liquidity(&env);
    let borrower = common::funded_user(&env, &market);
    let other = common::funded_user(&env, &market);
    market.pair.deposit(&borrower, &100_000, &0);
    market.pair.borrow(&borrower, &0, &50_000, &Bytes::new(&env));

    let result = market.pair.try_transfer_shares(&borrower, &other, &TokenSlot::DepositX, &50_000);
    assert_eq!(result, Err(Ok(DuoError::LeverageExceeded)));
}

extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

use crate::test::{add_pool, mint_stake, zero_splits};
use crate::{ContractError, FarmContract, FarmContractClient};

// ── Boosted test helpers ─────────────────────────────────────────────────────

/// Like `test::setup`, but with a weight-source token wired in.
fn setup_boosted(
    reward_per_sec: i128,
) -> (
    Env,
    FarmContractClient<'static>,
    Address, // owner
    Address, // reward_token
    Address, // weight_token
) {
    let env = Env::default();
    env.mock_all_auths();

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let weight_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(FarmContract, ());
    let client = FarmContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(
        &owner,
        &reward_token,
        &reward_per_sec,
        &0,
        &zero_splits(&env),
        &Some(weight_token.clone()),
    );

    StellarAssetClient::new(&env, &reward_token).set_admin(&contract_id);

    (env, client, owner, reward_token, weight_token)
}

fn mint_weight(env: &Env, weight_token: &Address, recipient: &Address, amount: i128) {
    StellarAssetClient::new(env, weight_token).mint(recipient, &amount);
}

// ── Factor derivation ────────────────────────────────────────────────────────

#[test]
fn test_weight_source_recorded() {
    let (_env, client, _, _, weight_token) = setup_boosted(100);
    assert_eq!(client.get_weight_source(), Some(weight_token));
}

#[test]
fn test_deposit_reads_weight_at_checkpoint() {
    let (env, client, owner, _, weight_token) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);
    mint_weight(&env, &weight_token, &staker, 10);

    client.deposit(&staker, &pool_id, &1_000);

    // factor = min(1_000, isqrt(1_000 x 10)) = 100.
    let pos = client.get_position(&pool_id, &staker);
    assert_eq!(pos.stake, 1_000);
    assert_eq!(pos.factor, 100);
    assert_eq!(client.get_pool(&pool_id).total_effective, 1_100);
}

#[test]
fn test_zero_weight_means_zero_factor() {
    let (env, client, owner, _, _) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);

    client.deposit(&staker, &pool_id, &1_000);

    assert_eq!(client.get_position(&pool_id, &staker).factor, 0);
    assert_eq!(client.get_pool(&pool_id).total_effective, 1_000);
}

#[test]
fn test_factor_capped_at_stake() {
    let (env, client, owner, _, weight_token) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let whale = Address::generate(&env);
    mint_stake(&env, &stake_token, &whale, 100);
    mint_weight(&env, &weight_token, &whale, 1_000_000);

    client.deposit(&whale, &pool_id, &100);

    // Effective stake never exceeds twice the raw stake.
    assert_eq!(client.get_position(&pool_id, &whale).factor, 100);
    assert_eq!(client.get_pool(&pool_id).total_effective, 200);
}

// ── Boost resync ─────────────────────────────────────────────────────────────

#[test]
fn test_sync_boost_applies_new_weight() {
    let (env, client, owner, _, weight_token) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);

    client.deposit(&staker, &pool_id, &1_000);
    assert_eq!(client.get_position(&pool_id, &staker).factor, 0);

    // Weight arrives after the deposit; the farm is blind to it until
    // someone syncs.
    mint_weight(&env, &weight_token, &staker, 10);
    assert_eq!(client.get_position(&pool_id, &staker).factor, 0);

    client.sync_boost(&staker);

    let pos = client.get_position(&pool_id, &staker);
    assert_eq!(pos.factor, 100);
    assert_eq!(client.get_pool(&pool_id).total_effective, 1_100);
}

#[test]
fn test_sync_boost_is_idempotent() {
    let (env, client, owner, _, weight_token) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);
    mint_weight(&env, &weight_token, &staker, 10);

    env.ledger().set_timestamp(0);
    client.deposit(&staker, &pool_id, &1_000);

    env.ledger().set_timestamp(10);
    client.sync_boost(&staker);
    let pos_first = client.get_position(&pool_id, &staker);
    let pool_first = client.get_pool(&pool_id);

    client.sync_boost(&staker);
    assert_eq!(client.get_position(&pool_id, &staker), pos_first);
    assert_eq!(client.get_pool(&pool_id), pool_first);
}

#[test]
fn test_sync_boost_pays_pending_at_old_factor() {
    let (env, client, owner, reward_token, weight_token) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);

    env.ledger().set_timestamp(0);
    client.deposit(&staker, &pool_id, &1_000);

    // A decade accrues at factor 0, then weight shows up.
    env.ledger().set_timestamp(10);
    mint_weight(&env, &weight_token, &staker, 10);
    client.sync_boost(&staker);

    // The old-factor accrual paid out; the new factor starts clean.
    assert_eq!(
        TokenClient::new(&env, &reward_token).balance(&staker),
        1_000
    );
    let pos = client.get_position(&pool_id, &staker);
    assert_eq!(pos.factor, 100);
    assert_eq!(client.pending_reward(&pool_id, &staker), 0);

    // Eleven more seconds at effective 1_100 of 1_100 total.
    env.ledger().set_timestamp(21);
    assert_eq!(client.pending_reward(&pool_id, &staker), 1_100);
}

#[test]
fn test_boosted_rewards_split_by_effective_stake() {
    let (env, client, owner, _, weight_token) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    mint_stake(&env, &stake_token, &alice, 1_000);
    mint_stake(&env, &stake_token, &bob, 1_000);
    mint_weight(&env, &weight_token, &alice, 10);

    env.ledger().set_timestamp(0);
    client.deposit(&alice, &pool_id, &1_000); // effective 1_100
    client.deposit(&bob, &pool_id, &1_000); // effective 1_000

    // 2_100 emitted over 2_100 effective units: exactly one per unit.
    env.ledger().set_timestamp(21);
    assert_eq!(client.pending_reward(&pool_id, &alice), 1_100);
    assert_eq!(client.pending_reward(&pool_id, &bob), 1_000);
}

#[test]
fn test_withdraw_refreshes_factor_after_weight_loss() {
    let (env, client, owner, _, weight_token) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);
    mint_weight(&env, &weight_token, &staker, 10);

    client.deposit(&staker, &pool_id, &1_000);
    assert_eq!(client.get_position(&pool_id, &staker).factor, 100);

    // The weight walks away; the very next touch de-boosts the position
    // without waiting for an explicit sync.
    TokenClient::new(&env, &weight_token).burn(&staker, &10);
    client.withdraw(&staker, &pool_id, &0);

    assert_eq!(client.get_position(&pool_id, &staker).factor, 0);
    assert_eq!(client.get_pool(&pool_id).total_effective, 1_000);
}

#[test]
fn test_sync_boost_applies_weight_loss() {
    let (env, client, owner, reward_token, weight_token) = setup_boosted(110);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);
    mint_weight(&env, &weight_token, &staker, 10);

    env.ledger().set_timestamp(0);
    client.deposit(&staker, &pool_id, &1_000);
    assert_eq!(client.get_position(&pool_id, &staker).factor, 100);

    // The weight burns away mid-interval; an explicit sync (no deposit or
    // withdraw touch) must both pay the old-factor accrual and de-boost.
    env.ledger().set_timestamp(10);
    TokenClient::new(&env, &weight_token).burn(&staker, &10);
    client.sync_boost(&staker);

    // 1_100 emitted over 1_100 effective units, all to the lone staker.
    assert_eq!(
        TokenClient::new(&env, &reward_token).balance(&staker),
        1_100
    );
    let pos = client.get_position(&pool_id, &staker);
    assert_eq!(pos.factor, 0);
    assert_eq!(client.get_pool(&pool_id).total_effective, 1_000);
    assert_eq!(client.pending_reward(&pool_id, &staker), 0);
}

#[test]
fn test_sync_boost_covers_every_pool() {
    let (env, client, owner, _, weight_token) = setup_boosted(100);
    let (first, first_token) = add_pool(&env, &client, &owner, 50);
    let (second, second_token) = add_pool(&env, &client, &owner, 50);

    let staker = Address::generate(&env);
    mint_stake(&env, &first_token, &staker, 1_000);
    mint_stake(&env, &second_token, &staker, 400);

    client.deposit(&staker, &first, &1_000);
    client.deposit(&staker, &second, &400);

    mint_weight(&env, &weight_token, &staker, 10);
    client.sync_boost(&staker);

    // factor = min(stake, isqrt(stake x 10)) per pool.
    assert_eq!(client.get_position(&first, &staker).factor, 100);
    assert_eq!(client.get_position(&second, &staker).factor, 63);
    assert_eq!(client.get_pool(&first).total_effective, 1_100);
    assert_eq!(client.get_pool(&second).total_effective, 463);
}

#[test]
fn test_sync_boost_without_weight_source_fails() {
    let (env, client, _owner, _) = crate::test::setup(100);
    assert_eq!(client.get_weight_source(), None);

    let anyone = Address::generate(&env);
    let result = client.try_sync_boost(&anyone);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::BoostNotConfigured),
        _ => unreachable!("Expected BoostNotConfigured error"),
    }
}

#[test]
fn test_full_exit_stops_boost_tracking() {
    let (env, client, owner, _, weight_token) = setup_boosted(100);
    let (pool_id, stake_token) = add_pool(&env, &client, &owner, 100);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);
    mint_weight(&env, &weight_token, &staker, 10);

    client.deposit(&staker, &pool_id, &1_000);
    client.withdraw(&staker, &pool_id, &1_000);

    // A zeroed position keeps no factor and no pool membership; syncing
    // is a harmless no-op.
    let pos = client.get_position(&pool_id, &staker);
    assert_eq!(pos.stake, 0);
    assert_eq!(pos.factor, 0);
    assert_eq!(client.get_pool(&pool_id).total_effective, 0);
    client.sync_boost(&staker);
}

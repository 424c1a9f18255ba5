//! Storage schema and typed accessors for the farm contract.
//!
//! Global configuration and counters live in instance storage; pools,
//! positions, and per-user bookkeeping use persistent tuple keys so their
//! lifetimes can be extended independently.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

// ── Instance keys ────────────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const SPLITS: Symbol = symbol_short!("SPLITS");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");
const REWARD_PER_SEC: Symbol = symbol_short!("RWD_SEC");
const TOTAL_ALLOC: Symbol = symbol_short!("TOT_ALOC");
const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");
const DUST: Symbol = symbol_short!("DUST");

// Per-entity persistent storage uses tuple keys:  (prefix, id...)
const POOL: Symbol = symbol_short!("POOL");
const POSITION: Symbol = symbol_short!("POS");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const USER_POOLS: Symbol = symbol_short!("USR_PLS");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Types ────────────────────────────────────────────────────────────────────

/// Immutable-after-init farm configuration (owner is mutable via the
/// two-step transfer).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FarmConfig {
    /// Address that may register pools, tune emission, and sweep dust.
    pub owner: Address,
    /// SAC address of the emitted reward token; the farm must be its admin.
    pub reward_token: Address,
    /// Token whose balances drive per-user boost factors. `None` disables
    /// boosting for the lifetime of the deployment.
    pub weight_source: Option<Address>,
    /// Emission does not accrue before this ledger timestamp.
    pub start_time: u64,
}

/// Beneficiary addresses and their basis-point cuts of every emission.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SplitConfig {
    pub dev: Address,
    pub dev_bp: u32,
    pub treasury: Address,
    pub treasury_bp: u32,
    pub investor: Address,
    pub investor_bp: u32,
}

/// Which beneficiary slot a split mutation targets.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BeneficiaryRole {
    Dev,
    Treasury,
    Investor,
}

/// One staking pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub stake_token: Address,
    /// Relative emission weight; zero retires the pool without touching
    /// deposits.
    pub alloc_point: u64,
    /// Timestamp the accumulator was last brought up to.
    pub last_reward_time: u64,
    /// Reward per effective-stake unit, scaled by `ACC_PRECISION`.
    pub acc_reward_per_share: i128,
    /// Sum of `stake + factor` over every position in the pool.
    pub total_effective: i128,
    /// Optional secondary-reward adapter notified on stake changes.
    pub rewarder: Option<Address>,
}

/// A user's position in one pool. Never deleted once created; a fully
/// withdrawn position is stored zeroed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserPosition {
    pub stake: i128,
    /// Checkpoint subtracted from the accumulator product when computing
    /// pending rewards.
    pub reward_debt: i128,
    /// Boost factor as of the last checkpoint; zero in unboosted farms.
    pub factor: i128,
}

// ── TTL helpers ──────────────────────────────────────────────────────────────

fn extend_ttl_pool_key(env: &Env, key: &(Symbol, u32)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl_position_key(env: &Env, key: &(Symbol, u32, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl_address_key(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Config & globals ─────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&CONFIG)
}

pub fn load_config(env: &Env) -> Result<FarmConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_config(env: &Env, cfg: &FarmConfig) {
    env.storage().instance().set(&CONFIG, cfg);
}

pub fn load_splits(env: &Env) -> Result<SplitConfig, ContractError> {
    env.storage()
        .instance()
        .get(&SPLITS)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_splits(env: &Env, splits: &SplitConfig) {
    env.storage().instance().set(&SPLITS, splits);
}

pub fn pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

pub fn set_pending_owner(env: &Env, who: &Address) {
    env.storage().instance().set(&PENDING_OWNER, who);
}

pub fn clear_pending_owner(env: &Env) {
    env.storage().instance().remove(&PENDING_OWNER);
}

pub fn reward_per_sec(env: &Env) -> i128 {
    env.storage().instance().get(&REWARD_PER_SEC).unwrap_or(0)
}

pub fn set_reward_per_sec(env: &Env, rate: i128) {
    env.storage().instance().set(&REWARD_PER_SEC, &rate);
}

pub fn total_alloc_point(env: &Env) -> u64 {
    env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0)
}

pub fn set_total_alloc_point(env: &Env, total: u64) {
    env.storage().instance().set(&TOTAL_ALLOC, &total);
}

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

pub fn set_pool_count(env: &Env, count: u32) {
    env.storage().instance().set(&POOL_COUNT, &count);
}

pub fn dust(env: &Env) -> i128 {
    env.storage().instance().get(&DUST).unwrap_or(0)
}

pub fn set_dust(env: &Env, amount: i128) {
    env.storage().instance().set(&DUST, &amount);
}

// ── Pools ────────────────────────────────────────────────────────────────────

fn pool_key(pool_id: u32) -> (Symbol, u32) {
    (POOL, pool_id)
}

pub fn load_pool(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
    env.storage()
        .persistent()
        .get(&pool_key(pool_id))
        .ok_or(ContractError::PoolNotFound)
}

pub fn save_pool(env: &Env, pool_id: u32, pool: &Pool) {
    let key = pool_key(pool_id);
    env.storage().persistent().set(&key, pool);
    extend_ttl_pool_key(env, &key);
}

pub fn stake_token_registered(env: &Env, token: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&(STAKE_TOKEN, token.clone()))
}

pub fn register_stake_token(env: &Env, token: &Address) {
    let key = (STAKE_TOKEN, token.clone());
    env.storage().persistent().set(&key, &true);
    extend_ttl_address_key(env, &key);
}

// ── Positions ────────────────────────────────────────────────────────────────

fn position_key(pool_id: u32, user: &Address) -> (Symbol, u32, Address) {
    (POSITION, pool_id, user.clone())
}

pub fn load_position(env: &Env, pool_id: u32, user: &Address) -> UserPosition {
    env.storage()
        .persistent()
        .get(&position_key(pool_id, user))
        .unwrap_or_else(|| UserPosition {
            stake: 0,
            reward_debt: 0,
            factor: 0,
        })
}

pub fn save_position(env: &Env, pool_id: u32, user: &Address, pos: &UserPosition) {
    let key = position_key(pool_id, user);
    env.storage().persistent().set(&key, pos);
    extend_ttl_position_key(env, &key);
}

// ── Per-user pool membership ─────────────────────────────────────────────────
// Consumed by boost syncing, which must touch every pool a user stakes in.

pub fn user_pools(env: &Env, user: &Address) -> Vec<u32> {
    env.storage()
        .persistent()
        .get(&(USER_POOLS, user.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn track_user_pool(env: &Env, user: &Address, pool_id: u32) {
    let mut pools = user_pools(env, user);
    if pools.first_index_of(pool_id).is_none() {
        pools.push_back(pool_id);
        let key = (USER_POOLS, user.clone());
        env.storage().persistent().set(&key, &pools);
        extend_ttl_address_key(env, &key);
    }
}

pub fn untrack_user_pool(env: &Env, user: &Address, pool_id: u32) {
    let mut pools = user_pools(env, user);
    if let Some(index) = pools.first_index_of(pool_id) {
        pools.remove(index);
        let key = (USER_POOLS, user.clone());
        env.storage().persistent().set(&key, &pools);
        extend_ttl_address_key(env, &key);
    }
}

#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::storage::BeneficiaryRole;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub reward_token: Address,
    pub reward_per_sec: i128,
    pub start_time: u64,
    pub timestamp: u64,
}

/// Fired when the owner registers a new pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub stake_token: Address,
    pub alloc_point: u64,
    pub timestamp: u64,
}

/// Fired when the owner reweights or rewires a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pool_id: u32,
    pub alloc_point: u64,
    pub timestamp: u64,
}

/// Fired when a user deposits stake (including zero-amount claims).
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub new_stake: i128,
    pub timestamp: u64,
}

/// Fired when a user withdraws stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub new_stake: i128,
    pub timestamp: u64,
}

/// Fired when a user abandons pending rewards to recover stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawnEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired whenever pending primary reward is paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestedEvent {
    pub pool_id: u32,
    pub user: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when the owner changes the global emission rate.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionRateUpdatedEvent {
    pub old_rate: i128,
    pub new_rate: i128,
    pub timestamp: u64,
}

/// Fired when a beneficiary address is replaced.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BeneficiarySetEvent {
    pub role: BeneficiaryRole,
    pub beneficiary: Address,
    pub timestamp: u64,
}

/// Fired when a beneficiary's basis-point cut changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BeneficiaryBpSetEvent {
    pub role: BeneficiaryRole,
    pub bp: u32,
    pub timestamp: u64,
}

/// Fired when a boost resync lands a different factor.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoostSyncedEvent {
    pub pool_id: u32,
    pub user: Address,
    pub old_factor: i128,
    pub new_factor: i128,
    pub timestamp: u64,
}

/// Fired when a rewarder notification fails and is skipped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewarderSkippedEvent {
    pub pool_id: u32,
    pub user: Address,
    pub rewarder: Address,
    pub timestamp: u64,
}

/// Fired when the owner sweeps accumulated rounding dust.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DustSweptEvent {
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when an ownership transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub timestamp: u64,
}

/// Fired when an ownership transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    reward_token: Address,
    reward_per_sec: i128,
    start_time: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            reward_token,
            reward_per_sec,
            start_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_added(env: &Env, pool_id: u32, stake_token: Address, alloc_point: u64) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), stake_token.clone()),
        PoolAddedEvent {
            pool_id,
            stake_token,
            alloc_point,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_updated(env: &Env, pool_id: u32, alloc_point: u64) {
    env.events().publish(
        (symbol_short!("POOL_SET"),),
        PoolUpdatedEvent {
            pool_id,
            alloc_point,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(env: &Env, pool_id: u32, user: Address, amount: i128, new_stake: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone()),
        DepositedEvent {
            pool_id,
            user,
            amount,
            new_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, pool_id: u32, user: Address, amount: i128, new_stake: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone()),
        WithdrawnEvent {
            pool_id,
            user,
            amount,
            new_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdrawn(env: &Env, pool_id: u32, user: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("EMERG_WD"), user.clone()),
        EmergencyWithdrawnEvent {
            pool_id,
            user,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvested(env: &Env, pool_id: u32, user: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("HARVEST"), user.clone()),
        HarvestedEvent {
            pool_id,
            user,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emission_rate_updated(env: &Env, old_rate: i128, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_SET"),),
        EmissionRateUpdatedEvent {
            old_rate,
            new_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_beneficiary_set(env: &Env, role: BeneficiaryRole, beneficiary: Address) {
    env.events().publish(
        (symbol_short!("BENEF_SET"), beneficiary.clone()),
        BeneficiarySetEvent {
            role,
            beneficiary,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_beneficiary_bp_set(env: &Env, role: BeneficiaryRole, bp: u32) {
    env.events().publish(
        (symbol_short!("BENEF_BP"),),
        BeneficiaryBpSetEvent {
            role,
            bp,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_boost_synced(
    env: &Env,
    pool_id: u32,
    user: Address,
    old_factor: i128,
    new_factor: i128,
) {
    env.events().publish(
        (symbol_short!("BOOST_SYN"), user.clone()),
        BoostSyncedEvent {
            pool_id,
            user,
            old_factor,
            new_factor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewarder_skipped(env: &Env, pool_id: u32, user: Address, rewarder: Address) {
    env.events().publish(
        (symbol_short!("RWD_SKIP"),),
        RewarderSkippedEvent {
            pool_id,
            user,
            rewarder,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_dust_swept(env: &Env, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("DUST_SWP"),),
        DustSweptEvent {
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerProposedEvent {
            current_owner,
            proposed_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerAcceptedEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

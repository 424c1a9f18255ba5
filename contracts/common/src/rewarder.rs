//! Cross-contract interface for secondary-reward adapters.
//!
//! A pool may carry an optional rewarder contract that streams a second
//! token on top of the primary emission. The farm drives it through this
//! interface and never holds or accounts the secondary token itself.

use soroban_sdk::{contractclient, Address, Env};

/// Capability a rewarder contract must expose to be attached to a pool.
///
/// The farm invokes `on_stake_changed` after every raw-stake mutation
/// (deposit, withdraw, emergency withdraw) using a try-invocation, so a
/// failing or misbehaving adapter can never block primary accounting.
/// `pending_reward` doubles as the registration probe: a pool will not
/// accept an adapter this call fails against.
#[contractclient(name = "RewarderClient")]
pub trait RewarderAdapter {
    /// Notify the adapter that `user`'s raw stake is now `new_stake`.
    ///
    /// Called with the farm as the direct invoker; implementations gate on
    /// that address so third parties cannot forge stake changes.
    fn on_stake_changed(env: Env, user: Address, new_stake: i128);

    /// Secondary reward currently owed to `user`, including any shortfall
    /// carried from underfunded payouts.
    fn pending_reward(env: Env, user: Address) -> i128;
}

#![no_std]

pub mod events;
pub mod storage;

use common::math;
use common::rewarder::RewarderClient;
use soroban_sdk::{contract, contractimpl, token, Address, Env};

use storage::{BeneficiaryRole, FarmConfig, Pool, SplitConfig, UserPosition};

/// Upper bound on registered pools, keeping a full settle pass within the
/// ledger's execution budget.
pub const MAX_POOLS: u32 = 64;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    PoolNotFound = 5,
    DuplicateStakeToken = 6,
    TokensIdentical = 7,
    InvalidStakeToken = 8,
    InvalidRewardToken = 9,
    InvalidWeightSource = 10,
    InvalidRewarder = 11,
    PoolLimitReached = 12,
    InsufficientStake = 13,
    InsufficientRewardBalance = 14,
    InvalidBasisPoints = 15,
    SplitCeilingExceeded = 16,
    MathOverflow = 17,
    BoostNotConfigured = 18,
    NoPendingOwner = 19,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct FarmContract;

#[contractimpl]
impl FarmContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the farm.
    ///
    /// * `reward_token`   - SAC address of the emitted token. The farm mints
    ///   it at settle time, so the deployment must hand it token admin.
    /// * `reward_per_sec` - tokens emitted per second across all pools.
    /// * `start_time`     - timestamp emission begins; pools added earlier
    ///   start accruing then.
    /// * `splits`         - beneficiary addresses and basis-point cuts.
    /// * `weight_source`  - token whose balances drive boost factors, or
    ///   `None` for a plain farm. Fixed for the deployment's lifetime.
    pub fn initialize(
        env: Env,
        owner: Address,
        reward_token: Address,
        reward_per_sec: i128,
        start_time: u64,
        splits: SplitConfig,
        weight_source: Option<Address>,
    ) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_per_sec < 0 {
            return Err(ContractError::InvalidAmount);
        }
        Self::validate_split_bps(splits.dev_bp, splits.treasury_bp, splits.investor_bp)?;
        if token::Client::new(&env, &reward_token).try_decimals().is_err() {
            return Err(ContractError::InvalidRewardToken);
        }
        if let Some(source) = &weight_source {
            if token::Client::new(&env, source).try_decimals().is_err() {
                return Err(ContractError::InvalidWeightSource);
            }
        }

        let cfg = FarmConfig {
            owner: owner.clone(),
            reward_token: reward_token.clone(),
            weight_source,
            start_time,
        };
        storage::save_config(&env, &cfg);
        storage::save_splits(&env, &splits);
        storage::set_reward_per_sec(&env, reward_per_sec);
        // POOL_CNT, TOT_ALOC, and DUST start at zero; unwrap_or(0) handles
        // absent keys, so no explicit init needed.

        events::publish_initialized(&env, owner, reward_token, reward_per_sec, start_time);

        Ok(())
    }

    // ── Pool registry ───────────────────────────────────────────────────────

    /// Register a new pool and return its id.
    ///
    /// Every existing pool is settled first: the total allocation is about
    /// to change, and emission accrued under the old weights must be banked
    /// before it does.
    pub fn add_pool(
        env: Env,
        caller: Address,
        stake_token: Address,
        alloc_point: u64,
        rewarder: Option<Address>,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let cfg = storage::load_config(&env)?;
        if stake_token == cfg.reward_token {
            return Err(ContractError::TokensIdentical);
        }
        if storage::stake_token_registered(&env, &stake_token) {
            return Err(ContractError::DuplicateStakeToken);
        }
        let pool_id = storage::pool_count(&env);
        if pool_id >= MAX_POOLS {
            return Err(ContractError::PoolLimitReached);
        }
        if token::Client::new(&env, &stake_token).try_decimals().is_err() {
            return Err(ContractError::InvalidStakeToken);
        }
        if let Some(rewarder) = &rewarder {
            Self::validate_rewarder(&env, rewarder)?;
        }

        Self::settle_all(&env)?;

        let new_total = storage::total_alloc_point(&env)
            .checked_add(alloc_point)
            .ok_or(ContractError::MathOverflow)?;
        storage::set_total_alloc_point(&env, new_total);

        let now = env.ledger().timestamp();
        let pool = Pool {
            stake_token: stake_token.clone(),
            alloc_point,
            last_reward_time: now.max(cfg.start_time),
            acc_reward_per_share: 0,
            total_effective: 0,
            rewarder,
        };
        storage::save_pool(&env, pool_id, &pool);
        storage::register_stake_token(&env, &stake_token);
        storage::set_pool_count(&env, pool_id + 1);

        events::publish_pool_added(&env, pool_id, stake_token, alloc_point);

        Ok(pool_id)
    }

    /// Reweight an existing pool and optionally swap its rewarder.
    ///
    /// `rewarder` is only applied when `update_rewarder` is set, so the
    /// weight can be tuned without re-validating an attached adapter.
    pub fn set_pool(
        env: Env,
        caller: Address,
        pool_id: u32,
        alloc_point: u64,
        rewarder: Option<Address>,
        update_rewarder: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        // Existence check up front so bad ids reject without settling.
        storage::load_pool(&env, pool_id)?;
        if update_rewarder {
            if let Some(rewarder) = &rewarder {
                Self::validate_rewarder(&env, rewarder)?;
            }
        }

        Self::settle_all(&env)?;

        let mut pool = storage::load_pool(&env, pool_id)?;
        let new_total = storage::total_alloc_point(&env)
            .checked_sub(pool.alloc_point)
            .and_then(|t| t.checked_add(alloc_point))
            .ok_or(ContractError::MathOverflow)?;
        storage::set_total_alloc_point(&env, new_total);

        pool.alloc_point = alloc_point;
        if update_rewarder {
            pool.rewarder = rewarder;
        }
        storage::save_pool(&env, pool_id, &pool);

        events::publish_pool_updated(&env, pool_id, alloc_point);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens into a pool.
    ///
    /// The pool is settled and any pending reward paid out first, so the
    /// new tokens never earn retroactively. A zero amount is a pure claim
    /// that also refreshes the caller's boost factor.
    pub fn deposit(
        env: Env,
        user: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let cfg = storage::load_config(&env)?;
        let mut pool = Self::settle_pool_internal(&env, pool_id)?;
        let mut pos = storage::load_position(&env, pool_id, &user);
        let old_effective = Self::effective(&pos)?;

        Self::harvest(&env, &cfg, &pool, pool_id, &user, &pos)?;

        if amount > 0 {
            token::Client::new(&env, &pool.stake_token).transfer(
                &user,
                &env.current_contract_address(),
                &amount,
            );
            let had_stake = pos.stake > 0;
            pos.stake = pos
                .stake
                .checked_add(amount)
                .ok_or(ContractError::MathOverflow)?;
            if !had_stake {
                storage::track_user_pool(&env, &user, pool_id);
            }
        }

        pos.factor = Self::current_factor(&env, &cfg, &user, pos.stake)?;
        Self::checkpoint(&mut pool, &mut pos, old_effective)?;
        storage::save_position(&env, pool_id, &user, &pos);
        storage::save_pool(&env, pool_id, &pool);

        events::publish_deposited(&env, pool_id, user.clone(), amount, pos.stake);
        Self::notify_rewarder(&env, pool_id, &pool, &user, pos.stake);

        Ok(())
    }

    /// Withdraw `amount` stake tokens from a pool.
    ///
    /// Settles and pays pending reward first; a zero amount is a pure
    /// claim, mirroring `deposit`.
    pub fn withdraw(
        env: Env,
        user: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let cfg = storage::load_config(&env)?;
        let mut pool = Self::settle_pool_internal(&env, pool_id)?;
        let mut pos = storage::load_position(&env, pool_id, &user);
        if amount > pos.stake {
            return Err(ContractError::InsufficientStake);
        }
        let old_effective = Self::effective(&pos)?;

        Self::harvest(&env, &cfg, &pool, pool_id, &user, &pos)?;

        if amount > 0 {
            pos.stake = pos
                .stake
                .checked_sub(amount)
                .ok_or(ContractError::MathOverflow)?;
            if pos.stake == 0 {
                storage::untrack_user_pool(&env, &user, pool_id);
            }
        }

        pos.factor = Self::current_factor(&env, &cfg, &user, pos.stake)?;
        Self::checkpoint(&mut pool, &mut pos, old_effective)?;
        storage::save_position(&env, pool_id, &user, &pos);
        storage::save_pool(&env, pool_id, &pool);

        if amount > 0 {
            token::Client::new(&env, &pool.stake_token).transfer(
                &env.current_contract_address(),
                &user,
                &amount,
            );
        }

        events::publish_withdrawn(&env, pool_id, user.clone(), amount, pos.stake);
        Self::notify_rewarder(&env, pool_id, &pool, &user, pos.stake);

        Ok(())
    }

    /// Recover the full raw stake, forfeiting all pending reward.
    ///
    /// Deliberately skips settlement so the exit still works when reward
    /// accounting cannot run (emission overflow, broken splits). Returns
    /// the amount of stake handed back.
    pub fn emergency_withdraw(env: Env, user: Address, pool_id: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let mut pool = storage::load_pool(&env, pool_id)?;
        let mut pos = storage::load_position(&env, pool_id, &user);
        let amount = pos.stake;
        let old_effective = Self::effective(&pos)?;

        pool.total_effective = pool
            .total_effective
            .checked_sub(old_effective)
            .ok_or(ContractError::MathOverflow)?;
        pos = UserPosition {
            stake: 0,
            reward_debt: 0,
            factor: 0,
        };
        storage::save_position(&env, pool_id, &user, &pos);
        storage::save_pool(&env, pool_id, &pool);
        storage::untrack_user_pool(&env, &user, pool_id);

        if amount > 0 {
            token::Client::new(&env, &pool.stake_token).transfer(
                &env.current_contract_address(),
                &user,
                &amount,
            );
        }

        events::publish_emergency_withdrawn(&env, pool_id, user.clone(), amount);
        Self::notify_rewarder(&env, pool_id, &pool, &user, 0);

        Ok(amount)
    }

    // ── Settlement ──────────────────────────────────────────────────────────

    /// Bring one pool's accumulator up to the current timestamp. Anyone may
    /// call this; it only banks emission that is already owed.
    pub fn settle_pool(env: Env, pool_id: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::settle_pool_internal(&env, pool_id)?;
        Ok(())
    }

    /// Settle every registered pool in id order.
    pub fn settle_all_pools(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::settle_all(&env)
    }

    // ── Boost ───────────────────────────────────────────────────────────────

    /// Re-derive `user`'s boost factor from the weight source in every pool
    /// they stake in, paying out pending reward at the old factor first.
    ///
    /// Permissionless: weight balances move outside the farm's sight, so
    /// anyone may trigger the resync that brings a stale factor back in
    /// line. Running it twice at one timestamp is a no-op.
    pub fn sync_boost(env: Env, user: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let cfg = storage::load_config(&env)?;
        if cfg.weight_source.is_none() {
            return Err(ContractError::BoostNotConfigured);
        }

        for pool_id in storage::user_pools(&env, &user).iter() {
            let mut pool = Self::settle_pool_internal(&env, pool_id)?;
            let mut pos = storage::load_position(&env, pool_id, &user);
            let old_effective = Self::effective(&pos)?;

            Self::harvest(&env, &cfg, &pool, pool_id, &user, &pos)?;

            let old_factor = pos.factor;
            pos.factor = Self::current_factor(&env, &cfg, &user, pos.stake)?;
            Self::checkpoint(&mut pool, &mut pos, old_effective)?;
            storage::save_position(&env, pool_id, &user, &pos);
            storage::save_pool(&env, pool_id, &pool);

            if pos.factor != old_factor {
                events::publish_boost_synced(&env, pool_id, user.clone(), old_factor, pos.factor);
            }
        }

        Ok(())
    }

    // ── Owner functions ─────────────────────────────────────────────────────

    /// Change the global emission rate.
    ///
    /// Every pool is settled at the old rate first, so no staker gains or
    /// loses retroactively.
    pub fn update_emission_rate(
        env: Env,
        caller: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if new_rate < 0 {
            return Err(ContractError::InvalidAmount);
        }

        Self::settle_all(&env)?;

        let old_rate = storage::reward_per_sec(&env);
        storage::set_reward_per_sec(&env, new_rate);

        events::publish_emission_rate_updated(&env, old_rate, new_rate);

        Ok(())
    }

    /// Replace a beneficiary address. Callable by the owner or by the
    /// current holder of that role.
    pub fn set_beneficiary(
        env: Env,
        caller: Address,
        role: BeneficiaryRole,
        new_address: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let cfg = storage::load_config(&env)?;
        let mut splits = storage::load_splits(&env)?;
        let current = match role {
            BeneficiaryRole::Dev => splits.dev.clone(),
            BeneficiaryRole::Treasury => splits.treasury.clone(),
            BeneficiaryRole::Investor => splits.investor.clone(),
        };
        if caller != cfg.owner && caller != current {
            return Err(ContractError::Unauthorized);
        }

        match role {
            BeneficiaryRole::Dev => splits.dev = new_address.clone(),
            BeneficiaryRole::Treasury => splits.treasury = new_address.clone(),
            BeneficiaryRole::Investor => splits.investor = new_address.clone(),
        }
        storage::save_splits(&env, &splits);

        events::publish_beneficiary_set(&env, role, new_address);

        Ok(())
    }

    /// Change a beneficiary's basis-point cut. Callable by the owner or by
    /// the current holder of that role.
    ///
    /// Every pool is settled under the old split first; individual cuts and
    /// their sum are capped at 10_000 bp.
    pub fn set_beneficiary_bp(
        env: Env,
        caller: Address,
        role: BeneficiaryRole,
        new_bp: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let cfg = storage::load_config(&env)?;
        let mut splits = storage::load_splits(&env)?;
        let current = match role {
            BeneficiaryRole::Dev => splits.dev.clone(),
            BeneficiaryRole::Treasury => splits.treasury.clone(),
            BeneficiaryRole::Investor => splits.investor.clone(),
        };
        if caller != cfg.owner && caller != current {
            return Err(ContractError::Unauthorized);
        }

        let (dev_bp, treasury_bp, investor_bp) = match role {
            BeneficiaryRole::Dev => (new_bp, splits.treasury_bp, splits.investor_bp),
            BeneficiaryRole::Treasury => (splits.dev_bp, new_bp, splits.investor_bp),
            BeneficiaryRole::Investor => (splits.dev_bp, splits.treasury_bp, new_bp),
        };
        Self::validate_split_bps(dev_bp, treasury_bp, investor_bp)?;

        Self::settle_all(&env)?;

        splits.dev_bp = dev_bp;
        splits.treasury_bp = treasury_bp;
        splits.investor_bp = investor_bp;
        storage::save_splits(&env, &splits);

        events::publish_beneficiary_bp_set(&env, role, new_bp);

        Ok(())
    }

    /// Transfer accumulated rounding dust out of the reward float. Returns
    /// the amount actually swept.
    pub fn sweep_dust(env: Env, caller: Address, to: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let dust = storage::dust(&env);
        if dust <= 0 {
            return Ok(0);
        }

        let cfg = storage::load_config(&env)?;
        let client = token::Client::new(&env, &cfg.reward_token);
        let float = client.balance(&env.current_contract_address());
        let amount = dust.min(float);
        if amount > 0 {
            client.transfer(&env.current_contract_address(), &to, &amount);
        }
        storage::set_dust(
            &env,
            dust.checked_sub(amount).ok_or(ContractError::MathOverflow)?,
        );

        events::publish_dust_swept(&env, to, amount);

        Ok(amount)
    }

    // ── Owner transfer (two-step) ───────────────────────────────────────────

    /// Propose a new owner. The proposed address must call `accept_owner`
    /// to complete the transfer.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        Self::require_owner(&env, &current_owner)?;

        storage::set_pending_owner(&env, &new_owner);

        events::publish_owner_proposed(&env, current_owner, new_owner);

        Ok(())
    }

    /// Accept a pending ownership transfer. Only the proposed owner can
    /// complete it.
    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();

        let pending = storage::pending_owner(&env).ok_or(ContractError::NoPendingOwner)?;
        if new_owner != pending {
            return Err(ContractError::Unauthorized);
        }

        let mut cfg = storage::load_config(&env)?;
        let old_owner = cfg.owner.clone();
        cfg.owner = new_owner.clone();
        storage::save_config(&env, &cfg);
        storage::clear_pending_owner(&env);

        events::publish_owner_accepted(&env, old_owner, new_owner);

        Ok(())
    }

    // ── View functions ──────────────────────────────────────────────────────

    /// Reward claimable right now, computed against a simulated settle.
    /// Does not mutate state.
    pub fn pending_reward(env: Env, pool_id: u32, user: Address) -> Result<i128, ContractError> {
        let pool = storage::load_pool(&env, pool_id)?;
        let pos = storage::load_position(&env, pool_id, &user);

        let mut acc = pool.acc_reward_per_share;
        let now = env.ledger().timestamp();
        if now > pool.last_reward_time && pool.total_effective > 0 {
            let pool_reward = math::accrued_emission(
                storage::reward_per_sec(&env),
                now - pool.last_reward_time,
                pool.alloc_point,
                storage::total_alloc_point(&env),
            )
            .ok_or(ContractError::MathOverflow)?;
            if pool_reward > 0 {
                let splits = storage::load_splits(&env)?;
                let (_, _, _, depositor_share) = Self::split_emission(&splits, pool_reward)?;
                if depositor_share > 0 {
                    let delta = math::acc_delta(depositor_share, pool.total_effective)
                        .ok_or(ContractError::MathOverflow)?;
                    acc = acc.checked_add(delta).ok_or(ContractError::MathOverflow)?;
                }
            }
        }

        let eff = Self::effective(&pos)?;
        math::pending(eff, acc, pos.reward_debt).ok_or(ContractError::MathOverflow)
    }

    /// Return a user's position in a pool (zeroed if they never deposited).
    pub fn get_position(env: Env, pool_id: u32, user: Address) -> UserPosition {
        storage::load_position(&env, pool_id, &user)
    }

    pub fn get_pool(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        storage::load_pool(&env, pool_id)
    }

    /// Number of registered pools; valid ids are `0..pool_length`.
    pub fn pool_length(env: Env) -> u32 {
        storage::pool_count(&env)
    }

    pub fn get_emission_per_sec(env: Env) -> i128 {
        storage::reward_per_sec(&env)
    }

    pub fn get_total_alloc_point(env: Env) -> u64 {
        storage::total_alloc_point(&env)
    }

    pub fn get_splits(env: Env) -> Result<SplitConfig, ContractError> {
        storage::load_splits(&env)
    }

    pub fn get_config(env: Env) -> Result<FarmConfig, ContractError> {
        storage::load_config(&env)
    }

    /// Weight token driving boost factors, or `None` for a plain farm.
    pub fn get_weight_source(env: Env) -> Result<Option<Address>, ContractError> {
        Ok(storage::load_config(&env)?.weight_source)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Ok(storage::load_config(&env)?.owner)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        storage::pending_owner(&env)
    }

    /// Rounding dust credited to no position and sweepable by the owner.
    pub fn get_dust(env: Env) -> i128 {
        storage::dust(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    // ── Internal: settlement ────────────────────────────────────────────────

    /// Bank emission owed to a pool since `last_reward_time`.
    ///
    /// Beneficiary cuts are minted straight to their addresses; the
    /// depositor share is minted to the farm's own float and folded into
    /// `acc_reward_per_share`. Time over an empty pool is forfeited.
    fn settle_pool_internal(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
        let mut pool = storage::load_pool(env, pool_id)?;
        let now = env.ledger().timestamp();
        if now <= pool.last_reward_time {
            return Ok(pool);
        }
        if pool.total_effective <= 0 {
            pool.last_reward_time = now;
            storage::save_pool(env, pool_id, &pool);
            return Ok(pool);
        }

        let elapsed = now - pool.last_reward_time;
        let pool_reward = math::accrued_emission(
            storage::reward_per_sec(env),
            elapsed,
            pool.alloc_point,
            storage::total_alloc_point(env),
        )
        .ok_or(ContractError::MathOverflow)?;

        if pool_reward > 0 {
            let cfg = storage::load_config(env)?;
            let splits = storage::load_splits(env)?;
            let (dev_cut, treasury_cut, investor_cut, depositor_share) =
                Self::split_emission(&splits, pool_reward)?;

            let minter = token::StellarAssetClient::new(env, &cfg.reward_token);
            if dev_cut > 0 {
                minter.mint(&splits.dev, &dev_cut);
            }
            if treasury_cut > 0 {
                minter.mint(&splits.treasury, &treasury_cut);
            }
            if investor_cut > 0 {
                minter.mint(&splits.investor, &investor_cut);
            }
            if depositor_share > 0 {
                minter.mint(&env.current_contract_address(), &depositor_share);

                let delta = math::acc_delta(depositor_share, pool.total_effective)
                    .ok_or(ContractError::MathOverflow)?;
                pool.acc_reward_per_share = pool
                    .acc_reward_per_share
                    .checked_add(delta)
                    .ok_or(ContractError::MathOverflow)?;

                // Whatever the truncating per-share division failed to
                // credit stays in the float; track it for sweep_dust.
                let credited = math::accumulated(pool.total_effective, delta)
                    .ok_or(ContractError::MathOverflow)?;
                let lost = depositor_share
                    .checked_sub(credited)
                    .ok_or(ContractError::MathOverflow)?;
                if lost > 0 {
                    let dust = storage::dust(env)
                        .checked_add(lost)
                        .ok_or(ContractError::MathOverflow)?;
                    storage::set_dust(env, dust);
                }
            }
        }

        pool.last_reward_time = now;
        storage::save_pool(env, pool_id, &pool);
        Ok(pool)
    }

    fn settle_all(env: &Env) -> Result<(), ContractError> {
        let count = storage::pool_count(env);
        for pool_id in 0..count {
            Self::settle_pool_internal(env, pool_id)?;
        }
        Ok(())
    }

    /// Beneficiary cuts and the remaining depositor share of one emission.
    fn split_emission(
        splits: &SplitConfig,
        pool_reward: i128,
    ) -> Result<(i128, i128, i128, i128), ContractError> {
        let dev_cut = math::bp_cut(pool_reward, splits.dev_bp).ok_or(ContractError::MathOverflow)?;
        let treasury_cut =
            math::bp_cut(pool_reward, splits.treasury_bp).ok_or(ContractError::MathOverflow)?;
        let investor_cut =
            math::bp_cut(pool_reward, splits.investor_bp).ok_or(ContractError::MathOverflow)?;
        let depositor_share = pool_reward
            .checked_sub(dev_cut)
            .and_then(|r| r.checked_sub(treasury_cut))
            .and_then(|r| r.checked_sub(investor_cut))
            .ok_or(ContractError::MathOverflow)?;
        Ok((dev_cut, treasury_cut, investor_cut, depositor_share))
    }

    // ── Internal: positions ─────────────────────────────────────────────────

    fn effective(pos: &UserPosition) -> Result<i128, ContractError> {
        pos.stake
            .checked_add(pos.factor)
            .ok_or(ContractError::MathOverflow)
    }

    /// Pay out whatever the position is owed at the pool's current
    /// accumulator. Callers settle the pool first.
    fn harvest(
        env: &Env,
        cfg: &FarmConfig,
        pool: &Pool,
        pool_id: u32,
        user: &Address,
        pos: &UserPosition,
    ) -> Result<(), ContractError> {
        let eff = Self::effective(pos)?;
        let owed = math::pending(eff, pool.acc_reward_per_share, pos.reward_debt)
            .ok_or(ContractError::MathOverflow)?;
        if owed > 0 {
            Self::pay_reward(env, &cfg.reward_token, user, owed)?;
            events::publish_harvested(env, pool_id, user.clone(), owed);
        }
        Ok(())
    }

    /// Fold the position's new effective stake into the pool total and
    /// re-checkpoint its reward debt.
    fn checkpoint(
        pool: &mut Pool,
        pos: &mut UserPosition,
        old_effective: i128,
    ) -> Result<(), ContractError> {
        let new_effective = Self::effective(pos)?;
        pool.total_effective = pool
            .total_effective
            .checked_sub(old_effective)
            .and_then(|t| t.checked_add(new_effective))
            .ok_or(ContractError::MathOverflow)?;
        pos.reward_debt = math::accumulated(new_effective, pool.acc_reward_per_share)
            .ok_or(ContractError::MathOverflow)?;
        Ok(())
    }

    /// Transfer `amount` reward tokens out of the farm's float, failing
    /// loudly rather than short-paying.
    fn pay_reward(
        env: &Env,
        reward_token: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let client = token::Client::new(env, reward_token);
        if client.balance(&env.current_contract_address()) < amount {
            return Err(ContractError::InsufficientRewardBalance);
        }
        client.transfer(&env.current_contract_address(), to, &amount);
        Ok(())
    }

    /// Current boost factor for `stake` units, read live from the weight
    /// source. Zero when boosting is disabled or the stake is empty.
    fn current_factor(
        env: &Env,
        cfg: &FarmConfig,
        user: &Address,
        stake: i128,
    ) -> Result<i128, ContractError> {
        let source = match &cfg.weight_source {
            Some(source) => source,
            None => return Ok(0),
        };
        if stake <= 0 {
            return Ok(0);
        }
        let weight = token::Client::new(env, source).balance(user);
        math::boost_factor(stake, weight).ok_or(ContractError::MathOverflow)
    }

    // ── Internal: rewarder protocol ─────────────────────────────────────────

    /// Probe an adapter before attaching it; anything that traps on the
    /// view cannot be driven by the farm.
    fn validate_rewarder(env: &Env, rewarder: &Address) -> Result<(), ContractError> {
        let probe =
            RewarderClient::new(env, rewarder).try_pending_reward(&env.current_contract_address());
        if probe.is_err() {
            return Err(ContractError::InvalidRewarder);
        }
        Ok(())
    }

    /// Mirror a raw-stake change to the pool's rewarder, if any. Failures
    /// are surfaced as an event and otherwise ignored so a broken adapter
    /// can never trap primary accounting.
    fn notify_rewarder(env: &Env, pool_id: u32, pool: &Pool, user: &Address, new_stake: i128) {
        if let Some(rewarder) = &pool.rewarder {
            let result = RewarderClient::new(env, rewarder).try_on_stake_changed(user, &new_stake);
            if result.is_err() {
                events::publish_rewarder_skipped(env, pool_id, user.clone(), rewarder.clone());
            }
        }
    }

    // ── Internal: guards ────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !storage::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` is not the stored owner.
    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let cfg = storage::load_config(env)?;
        if *caller != cfg.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn validate_split_bps(
        dev_bp: u32,
        treasury_bp: u32,
        investor_bp: u32,
    ) -> Result<(), ContractError> {
        for bp in [dev_bp, treasury_bp, investor_bp] {
            if bp as i128 > math::BP_DENOMINATOR {
                return Err(ContractError::InvalidBasisPoints);
            }
        }
        let sum = dev_bp as u64 + treasury_bp as u64 + investor_bp as u64;
        if sum as i128 > math::BP_DENOMINATOR {
            return Err(ContractError::SplitCeilingExceeded);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_boost;

//! Checked fixed-point arithmetic for the reward accumulator.
//!
//! All functions return `Option<i128>`: `None` signals i128 overflow and is
//! mapped to a contract error by the caller. Division truncates toward zero
//! by design; the truncated remainder is the only place value can be lost,
//! and the farm tracks it as dust.

/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// Per-share values are multiplied by this constant before storage to
/// preserve sub-unit precision without floating point. 10^12 gives 12
/// decimal places, comfortably above Stellar's 7 token decimals.
pub const ACC_PRECISION: i128 = 1_000_000_000_000;

/// Denominator for basis-point splits. 10_000 bp = 100%.
pub const BP_DENOMINATOR: i128 = 10_000;

// ── Emission & accumulator ──────────────────────────────────────────────────

/// Reward emitted to one pool over an elapsed interval.
///
/// ```text
/// reward = reward_per_sec x elapsed x alloc_point / total_alloc_point
/// ```
///
/// Returns `Some(0)` when the pool has no allocation or when no pool has
/// any allocation, so callers never divide by zero.
pub fn accrued_emission(
    reward_per_sec: i128,
    elapsed: u64,
    alloc_point: u64,
    total_alloc_point: u64,
) -> Option<i128> {
    if total_alloc_point == 0 || alloc_point == 0 {
        return Some(0);
    }
    reward_per_sec
        .checked_mul(elapsed as i128)?
        .checked_mul(alloc_point as i128)?
        .checked_div(total_alloc_point as i128)
}

/// Cut of `amount` owed to a beneficiary at `bp` basis points.
pub fn bp_cut(amount: i128, bp: u32) -> Option<i128> {
    amount.checked_mul(bp as i128)?.checked_div(BP_DENOMINATOR)
}

/// Accumulator increment for distributing `amount` across
/// `total_effective` staked units.
///
/// ```text
/// delta = amount x ACC_PRECISION / total_effective
/// ```
///
/// The division truncates; the undistributed remainder is at most
/// `total_effective / ACC_PRECISION` whole tokens (zero for any realistic
/// pool). Callers must ensure `total_effective > 0`.
pub fn acc_delta(amount: i128, total_effective: i128) -> Option<i128> {
    if total_effective <= 0 {
        return None;
    }
    amount.checked_mul(ACC_PRECISION)?.checked_div(total_effective)
}

/// Scale an effective stake by the accumulator, truncating.
///
/// Used both for reward-debt checkpoints and for the minuend of a pending
/// computation:
///
/// ```text
/// accumulated = effective x acc_per_share / ACC_PRECISION
/// ```
pub fn accumulated(effective: i128, acc_per_share: i128) -> Option<i128> {
    effective.checked_mul(acc_per_share)?.checked_div(ACC_PRECISION)
}

/// Reward owed to a position since its last checkpoint.
///
/// ```text
/// pending = effective x acc_per_share / ACC_PRECISION - reward_debt
/// ```
///
/// Non-negative whenever `reward_debt` was checkpointed against an earlier
/// (monotonically non-decreasing) accumulator value.
pub fn pending(effective: i128, acc_per_share: i128, reward_debt: i128) -> Option<i128> {
    accumulated(effective, acc_per_share)?.checked_sub(reward_debt)
}

// ── Boost factor ────────────────────────────────────────────────────────────

/// Integer square root, rounding down. Returns 0 for non-positive input.
pub fn isqrt(value: i128) -> i128 {
    if value <= 0 {
        return 0;
    }
    // Newton's method over u128 so `x + v / x` cannot overflow. The seed
    // ceil(v / 2) is >= floor(sqrt(v)) for every v >= 1 and strictly below
    // v for every v >= 2, so the loop always runs until convergence.
    let v = value as u128;
    let mut x = v;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + v / x) / 2;
    }
    x as i128
}

/// Boost factor granted for `stake` units backed by a `weight` balance in
/// the external weight source.
///
/// ```text
/// factor = min(stake, isqrt(stake x weight))
/// ```
///
/// Zero weight yields zero factor, and the cap means the effective stake
/// `stake + factor` never exceeds twice the raw stake.
pub fn boost_factor(stake: i128, weight: i128) -> Option<i128> {
    if stake <= 0 || weight <= 0 {
        return Some(0);
    }
    let product = stake.checked_mul(weight)?;
    Some(isqrt(product).min(stake))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.

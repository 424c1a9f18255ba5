//! Shared building blocks for the Kelpfarm contract suite.
//!
//! This crate provides:
//! - [`math`] — checked fixed-point reward arithmetic used by the farm and
//!   rewarder contracts (accumulator deltas, basis-point cuts, boost factors).
//! - [`rewarder`] — the cross-contract interface a secondary-reward adapter
//!   must expose, plus the generated [`rewarder::RewarderClient`].
//!
//! Every money-bearing computation here returns `Option<i128>` and maps
//! overflow to `None`; callers convert that into their own error codes.

#![cfg_attr(not(feature = "std"), no_std)]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod math;
pub mod rewarder;

pub use math::{ACC_PRECISION, BP_DENOMINATOR};
pub use rewarder::{RewarderAdapter, RewarderClient};

//! Engine Settings
//!
//! Runtime parameters handed to the executor and schedulers, derived from
//! the loaded `Config`.

use alloy::primitives::{address, Address, Selector};
use rand::Rng;
use std::time::Duration;

use crate::domain::{
    ForwardSizing, GasBounds, LiquidityThresholds, ReverseSizing, SlippagePolicy, SwapPair,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_SWAP_COUNT, MAX_SWAP_COUNT,
};

pub const DEFAULT_CHAIN_ID: u64 = 984;
pub const DEFAULT_ROUTER: Address = address!("B489bce5c9c9364da2D1D1Bc5CE4274F63141885");
pub const DEFAULT_WRAPPED_NATIVE: Address = address!("Bc022C9dEb5AF250A526321d16Ef52E39b4DBD84");
pub const OPNT: Address = address!("2aEc1Db9197Ff284011A6A1d0752AD03F5782B0d");
pub const TUSDT: Address = address!("3e01b4d892e0d0a219ef8bbe7e260a6bc8d9b31b");
pub const TBNB: Address = address!("92cf36713a5622351c9489d5556b90b321873607");

/// Router selector for the native -> token swap
pub const FORWARD_SWAP_SELECTOR: [u8; 4] = [0xa2, 0x4f, 0xef, 0xef];
/// Router selector for the token -> native swap
pub const REVERSE_SWAP_SELECTOR: [u8; 4] = [0xe0, 0xf4, 0x4d, 0xf2];

pub const DEFAULT_SWAP_GAS_LIMIT: u64 = 300_000;
pub const DEFAULT_APPROVE_GAS_LIMIT: u64 = 100_000;
pub const DEFAULT_DEADLINE_MINUTES: u64 = 20;

/// Pair set used when the config does not list any
pub fn default_pairs() -> Vec<SwapPair> {
    vec![
        SwapPair::new(OPNT, "OPNT", 18),
        SwapPair::new(TUSDT, "TUSDT", 18),
        SwapPair::new(TBNB, "tBNB", 18),
    ]
}

/// Everything the swap executor needs
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub chain_id: u64,
    pub router: Address,
    pub wrapped_native: Address,
    pub forward_selector: Selector,
    pub reverse_selector: Selector,
    pub swap_gas_limit: u64,
    pub approve_gas_limit: u64,
    pub deadline: Duration,
    pub max_attempts: u8,
    pub gas: GasBounds,
    pub liquidity: LiquidityThresholds,
    pub slippage: SlippagePolicy,
    pub forward_sizing: ForwardSizing,
    pub reverse_sizing: ReverseSizing,
    pub explorer_url: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            router: DEFAULT_ROUTER,
            wrapped_native: DEFAULT_WRAPPED_NATIVE,
            forward_selector: Selector::from(FORWARD_SWAP_SELECTOR),
            reverse_selector: Selector::from(REVERSE_SWAP_SELECTOR),
            swap_gas_limit: DEFAULT_SWAP_GAS_LIMIT,
            approve_gas_limit: DEFAULT_APPROVE_GAS_LIMIT,
            deadline: Duration::from_secs(DEFAULT_DEADLINE_MINUTES * 60),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            gas: GasBounds::default(),
            liquidity: LiquidityThresholds::default(),
            slippage: SlippagePolicy::default(),
            forward_sizing: ForwardSizing::default(),
            reverse_sizing: ReverseSizing::default(),
            explorer_url: "https://testnet.iopn.tech/tx/".to_string(),
        }
    }
}

impl EngineSettings {
    /// Explorer link for log lines
    pub fn explorer_link(&self, tx_hash: impl std::fmt::Display) -> String {
        format!("{}{}", self.explorer_url, tx_hash)
    }
}

/// Uniform random delay in whole milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub fn from_secs(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_secs(min),
            max: Duration::from_secs(max),
        }
    }

    pub fn zero() -> Self {
        Self::from_secs(0, 0)
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(rng.gen_range(min..=max))
    }
}

/// Scheduler pacing and swap count bounds
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    /// Between consecutive forward or reverse swaps
    pub swap_delay: DelayRange,
    /// Between wallets
    pub wallet_delay: DelayRange,
    /// After the reverse phase, before the final balance read
    pub settle_delay: Duration,
    /// After the whole fleet completes
    pub cycle_rest: Duration,
    pub default_swap_count: u32,
    pub max_swap_count: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            swap_delay: DelayRange::from_secs(5, 30),
            wallet_delay: DelayRange::from_secs(10, 60),
            settle_delay: Duration::from_secs(3),
            cycle_rest: Duration::from_secs(86_400),
            default_swap_count: DEFAULT_SWAP_COUNT,
            max_swap_count: MAX_SWAP_COUNT,
        }
    }
}

impl ScheduleSettings {
    /// No waiting anywhere; used by tests and dry runs
    pub fn immediate() -> Self {
        Self {
            swap_delay: DelayRange::zero(),
            wallet_delay: DelayRange::zero(),
            settle_delay: Duration::ZERO,
            cycle_rest: Duration::ZERO,
            ..Self::default()
        }
    }
}

//! Domain Layer - Core swap engine logic
//!
//! Pure value types and policies with no network access:
//! - `swap`: pairs, requests, outcomes
//! - `sizing`: randomized percentage-of-balance amounts
//! - `liquidity`: quote sufficiency classification
//! - `slippage`: minimum-output factor per attempt
//! - `gas`: gas price clamping
//! - `cycle`: per-wallet cycle accumulator
//! - `wallet`: balance snapshots
//! - `swap_count`: swap count input validation

pub mod swap;
pub mod sizing;
pub mod liquidity;
pub mod slippage;
pub mod gas;
pub mod cycle;
pub mod wallet;
pub mod swap_count;

pub use swap::{
    FailureReason, SwapDirection, SwapOutcome, SwapPair, SwapReport, SwapRequest, SwapStage,
    DEFAULT_MAX_ATTEMPTS,
};
pub use sizing::{ForwardSizing, PercentRange, ReverseSizing, SizedAmount, to_base_units};
pub use liquidity::{LiquidityThresholds, Sufficiency};
pub use slippage::SlippagePolicy;
pub use gas::{GasBounds, GWEI};
pub use cycle::{CycleReport, CycleState};
pub use wallet::{BalanceSnapshot, TokenBalance, display_units};
pub use swap_count::{parse_swap_count, DEFAULT_SWAP_COUNT, MAX_SWAP_COUNT};

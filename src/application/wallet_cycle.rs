//! Wallet Cycle Scheduler
//!
//! One wallet's pass: N randomized forward swaps, then a reverse swap for
//! every token touched, then a settle pause and a final balance read.
//! Strictly sequential; the wallet's nonce is never raced.

use alloy::primitives::U256;
use rand::Rng;

use super::executor::SwapExecutor;
use super::settings::{DelayRange, ScheduleSettings};
use crate::domain::{
    display_units, BalanceSnapshot, CycleReport, CycleState, SwapPair, TokenBalance,
};
use crate::ports::{ChainError, ChainPort};

/// Why a wallet was passed over without sending anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Client or balance query failed
    Unavailable(ChainError),
    /// No token balance and not enough native currency for a forward swap
    LowBalances,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletOutcome {
    Completed(CycleReport),
    Skipped(SkipReason),
}

pub struct WalletCycleScheduler<'a> {
    executor: &'a SwapExecutor,
    pairs: &'a [SwapPair],
    schedule: &'a ScheduleSettings,
}

impl<'a> WalletCycleScheduler<'a> {
    pub fn new(executor: &'a SwapExecutor, pairs: &'a [SwapPair], schedule: &'a ScheduleSettings) -> Self {
        Self {
            executor,
            pairs,
            schedule,
        }
    }

    /// Native balance plus every configured pair token. Tokens that are empty
    /// or fail to load are left out. Decimals are read from the token
    /// contract, falling back to the configured value.
    pub async fn snapshot(&self, chain: &dyn ChainPort) -> Result<BalanceSnapshot, ChainError> {
        let owner = chain.address();
        let native = chain.native_balance(owner).await?;
        let mut snapshot = BalanceSnapshot::new(owner, native);

        for pair in self.pairs {
            let balance = match chain.token_balance(pair.output, owner).await {
                Ok(balance) if !balance.is_zero() => balance,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!("{} balance unavailable: {}", pair.symbol, e);
                    continue;
                }
            };

            let decimals = match chain.token_decimals(pair.output).await {
                Ok(decimals) => decimals,
                Err(e) => {
                    tracing::debug!("{} decimals unavailable, using {}: {}", pair.symbol, pair.decimals, e);
                    pair.decimals
                }
            };

            snapshot = snapshot.with_token(
                pair.output,
                TokenBalance {
                    symbol: pair.symbol.clone(),
                    balance,
                    decimals,
                },
            );
        }

        Ok(snapshot)
    }

    pub fn should_skip(&self, snapshot: &BalanceSnapshot) -> bool {
        !snapshot.has_tokens() && !self.executor.settings().forward_sizing.can_afford(snapshot.native)
    }

    pub async fn run<R: Rng + Send + ?Sized>(
        &self,
        chain: &dyn ChainPort,
        swap_count: u32,
        rng: &mut R,
    ) -> WalletOutcome {
        let snapshot = match self.snapshot(chain).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Wallet {} unavailable: {}", chain.address(), e);
                return WalletOutcome::Skipped(SkipReason::Unavailable(e));
            }
        };

        tracing::info!(
            "Wallet {} (OPN: {})",
            snapshot.short_address(),
            snapshot.native_display()
        );

        if self.should_skip(&snapshot) {
            tracing::warn!("Low balances - skip");
            return WalletOutcome::Skipped(SkipReason::LowBalances);
        }

        let mut state = CycleState::new();
        self.forward_phase(chain, &snapshot, swap_count, &mut state, rng).await;
        self.reverse_phase(chain, &mut state, rng).await;

        pause(self.schedule.settle_delay).await;
        let final_native = match chain.native_balance(snapshot.address).await {
            Ok(native) => {
                tracing::info!("Final OPN: {}", display_units(native, 18));
                Some(native)
            }
            Err(e) => {
                tracing::warn!("Final balance unavailable: {}", e);
                None
            }
        };

        WalletOutcome::Completed(state.into_report(final_native))
    }

    async fn forward_phase<R: Rng + Send + ?Sized>(
        &self,
        chain: &dyn ChainPort,
        snapshot: &BalanceSnapshot,
        swap_count: u32,
        state: &mut CycleState,
        rng: &mut R,
    ) {
        if self.pairs.is_empty() {
            return;
        }

        tracing::info!("Running {} forward swaps...", swap_count);
        for current in 1..=swap_count {
            let pair = &self.pairs[rng.gen_range(0..self.pairs.len())];
            state.touch(pair.output);

            tracing::info!("Forward {}/{}: OPN -> {}", current, swap_count, pair.symbol);
            let report = self.executor.forward(chain, pair, snapshot.native, rng).await;
            if !report.is_success() {
                tracing::warn!("Forward {}/{}: {}", current, swap_count, report.outcome);
            }
            state.record_forward(&report);

            sleep_random(self.schedule.swap_delay, rng, "next forward").await;
        }

        tracing::info!(
            "Forwards done: {}/{}",
            state.forward_succeeded,
            state.forward_total()
        );
    }

    async fn reverse_phase<R: Rng + Send + ?Sized>(
        &self,
        chain: &dyn ChainPort,
        state: &mut CycleState,
        rng: &mut R,
    ) {
        let owner = chain.address();
        let touched: Vec<SwapPair> = state
            .touched()
            .filter_map(|token| self.pairs.iter().find(|p| p.output == *token))
            .cloned()
            .collect();

        tracing::info!("Starting reverses for {} tokens...", touched.len());
        let reverse_sizing = self.executor.settings().reverse_sizing;

        for (i, pair) in touched.iter().enumerate() {
            match chain.token_balance(pair.output, owner).await {
                Ok(balance) if reverse_sizing.above_dust(balance, pair.decimals) => {
                    self.reverse_one(chain, pair, balance, state, rng).await;
                }
                Ok(_) => tracing::debug!("{} balance is dust, no reverse", pair.symbol),
                Err(e) => tracing::warn!("{} balance unavailable, no reverse: {}", pair.symbol, e),
            }

            if i + 1 < touched.len() {
                sleep_random(self.schedule.swap_delay, rng, "next reverse").await;
            }
        }

        tracing::info!(
            "Reverses done: {}/{}",
            state.reverse_succeeded,
            state.touched_count()
        );
    }

    async fn reverse_one<R: Rng + Send + ?Sized>(
        &self,
        chain: &dyn ChainPort,
        pair: &SwapPair,
        balance: U256,
        state: &mut CycleState,
        rng: &mut R,
    ) {
        tracing::info!("Reverse: {} -> OPN", pair.symbol);
        if let Some(report) = self.executor.reverse(chain, pair, balance, rng).await {
            if !report.is_success() {
                tracing::warn!("Reverse {}: {}", pair.symbol, report.outcome);
            }
            state.record_reverse(&report);
        }
    }
}

pub(crate) async fn sleep_random<R: Rng + Send + ?Sized>(range: DelayRange, rng: &mut R, before: &str) {
    let delay = range.draw(rng);
    if !delay.is_zero() {
        tracing::debug!("Waiting {}s before {}...", delay.as_secs(), before);
    }
    pause(delay).await;
}

pub(crate) async fn pause(delay: std::time::Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

//! Fleet Scheduler
//!
//! Walks every wallet in order with proxy rotation and a random pause between
//! wallets, rests after the last one, and starts over. The swap count is
//! asked once per process and reused by every later wallet and cycle.

use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

use super::executor::SwapExecutor;
use super::settings::ScheduleSettings;
use super::wallet_cycle::{pause, sleep_random, SkipReason, WalletCycleScheduler, WalletOutcome};
use crate::domain::{display_units, parse_swap_count, SwapPair};
use crate::ports::{ChainConnector, SwapCountPrompt};

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("No wallets configured")]
    NoWallets,
    #[error("No swap pairs configured")]
    NoPairs,
}

/// Wallet-independent fleet parameters
#[derive(Debug, Clone, Default)]
pub struct FleetConfig {
    /// Proxy list, cycled by wallet index; empty means direct connections
    pub proxies: Vec<String>,
    /// Forward swaps per wallet. `None` until answered, then fixed for the
    /// lifetime of the process.
    pub swap_count: Option<u32>,
}

impl FleetConfig {
    pub fn new(proxies: Vec<String>) -> Self {
        Self {
            proxies,
            swap_count: None,
        }
    }

    pub fn with_swap_count(mut self, swap_count: u32) -> Self {
        self.swap_count = Some(swap_count);
        self
    }

    pub fn proxy_for(&self, wallet_index: usize) -> Option<&str> {
        if self.proxies.is_empty() {
            return None;
        }
        Some(self.proxies[wallet_index % self.proxies.len()].as_str())
    }
}

/// Totals for one pass over the fleet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetCycleReport {
    pub completed: usize,
    pub skipped: usize,
    pub forward_succeeded: u32,
    pub forward_failed: u32,
    pub reverse_succeeded: u32,
    pub reverse_attempted: u32,
}

impl FleetCycleReport {
    fn record(&mut self, outcome: &WalletOutcome) {
        match outcome {
            WalletOutcome::Completed(report) => {
                self.completed += 1;
                self.forward_succeeded += report.forward_succeeded;
                self.forward_failed += report.forward_failed;
                self.reverse_succeeded += report.reverse_succeeded;
                self.reverse_attempted += report.reverse_attempted;
            }
            WalletOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

pub struct FleetScheduler<R: Rng + Send> {
    connector: Arc<dyn ChainConnector>,
    prompt: Arc<dyn SwapCountPrompt>,
    executor: SwapExecutor,
    pairs: Vec<SwapPair>,
    schedule: ScheduleSettings,
    rng: R,
}

impl<R: Rng + Send> FleetScheduler<R> {
    pub fn new(
        connector: Arc<dyn ChainConnector>,
        prompt: Arc<dyn SwapCountPrompt>,
        executor: SwapExecutor,
        pairs: Vec<SwapPair>,
        schedule: ScheduleSettings,
        rng: R,
    ) -> Self {
        Self {
            connector,
            prompt,
            executor,
            pairs,
            schedule,
            rng,
        }
    }

    /// Swap count for this cycle, asking the prompt only if none is recorded yet
    pub fn resolve_swap_count(&self, config: &mut FleetConfig) -> u32 {
        if let Some(count) = config.swap_count {
            return count;
        }

        let default = self.schedule.default_swap_count;
        let max = self.schedule.max_swap_count;
        let count = match self.prompt.ask(default, max) {
            Ok(answer) => parse_swap_count(&answer, default, max),
            Err(e) => {
                tracing::warn!("Swap count prompt failed, using {}: {}", default, e);
                default
            }
        };
        config.swap_count = Some(count);
        count
    }

    /// One pass over every wallet
    pub async fn run_cycle(&mut self, config: &mut FleetConfig) -> Result<FleetCycleReport, FleetError> {
        let total = self.connector.wallet_count();
        if total == 0 {
            return Err(FleetError::NoWallets);
        }
        if self.pairs.is_empty() {
            return Err(FleetError::NoPairs);
        }

        let swap_count = self.resolve_swap_count(config);
        let scheduler = WalletCycleScheduler::new(&self.executor, &self.pairs, &self.schedule);
        let mut report = FleetCycleReport::default();

        for index in 0..total {
            tracing::info!("Wallet {}/{}", index + 1, total);

            let outcome = match self.connector.connect(index, config.proxy_for(index)) {
                Ok(chain) => scheduler.run(chain.as_ref(), swap_count, &mut self.rng).await,
                Err(e) => {
                    tracing::error!("Wallet {} client failed: {}", index + 1, e);
                    WalletOutcome::Skipped(SkipReason::Unavailable(e))
                }
            };

            if let WalletOutcome::Completed(cycle) = &outcome {
                tracing::info!(
                    "Wallet {}/{} done: forwards {}/{}, reverses {}/{}, final OPN {}",
                    index + 1,
                    total,
                    cycle.forward_succeeded,
                    cycle.forward_succeeded + cycle.forward_failed,
                    cycle.reverse_succeeded,
                    cycle.tokens_touched,
                    cycle
                        .final_native
                        .map(|n| display_units(n, 18))
                        .unwrap_or_else(|| "unknown".to_string())
                );
            }
            report.record(&outcome);

            if index + 1 < total {
                sleep_random(self.schedule.wallet_delay, &mut self.rng, "next wallet").await;
            }
        }

        Ok(report)
    }

    /// Repeat fleet cycles with the rest interval in between. Runs until the
    /// process is stopped unless `max_cycles` is given.
    pub async fn run(&mut self, config: &mut FleetConfig, max_cycles: Option<u64>) -> Result<u64, FleetError> {
        let mut cycles = 0u64;
        loop {
            let report = self.run_cycle(config).await?;
            cycles += 1;

            tracing::info!(
                "Cycle {} complete: {} wallets run, {} skipped, forwards {}/{}, reverses {}/{}",
                cycles,
                report.completed,
                report.skipped,
                report.forward_succeeded,
                report.forward_succeeded + report.forward_failed,
                report.reverse_succeeded,
                report.reverse_attempted
            );

            if max_cycles.is_some_and(|max| cycles >= max) {
                return Ok(cycles);
            }

            tracing::info!(
                "Resting {}s before repeat ({} swaps)...",
                self.schedule.cycle_rest.as_secs(),
                config.swap_count.unwrap_or(self.schedule.default_swap_count)
            );
            pause(self.schedule.cycle_rest).await;
        }
    }
}

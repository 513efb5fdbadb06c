//! Swap Executor
//!
//! Drives one swap end to end: quote, approve (reverse only), build, submit,
//! confirm, and retry once with looser slippage after a revert. Every error
//! is converted into a `SwapOutcome` here; nothing propagates further up.

use alloy::primitives::{TxHash, U256};
use rand::Rng;

use super::gas_policy::GasPolicy;
use super::quoter::SwapQuoter;
use super::settings::EngineSettings;
use super::tx_builder::{Operation, TransactionBuilder};
use crate::domain::{
    display_units, FailureReason, Sufficiency, SwapDirection, SwapOutcome, SwapPair, SwapReport,
    SwapRequest, SwapStage,
};
use crate::ports::{ChainError, ChainPort, ReceiptSummary};

/// Result of a single attempt inside the retry loop
#[derive(Debug)]
enum Attempt {
    /// Terminal, no further attempts
    Done(SwapOutcome),
    /// Worth another try with the retry slippage; `last` is the outcome if
    /// no attempts remain
    Retry { last: SwapOutcome },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Approval {
    AlreadySufficient,
    Mined,
}

pub struct SwapExecutor {
    settings: EngineSettings,
    gas: GasPolicy,
    quoter: SwapQuoter,
    builder: TransactionBuilder,
}

impl SwapExecutor {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            gas: GasPolicy::new(settings.gas),
            quoter: SwapQuoter::new(settings.router, settings.wrapped_native, settings.liquidity),
            builder: TransactionBuilder::new(&settings),
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn quoter(&self) -> &SwapQuoter {
        &self.quoter
    }

    /// Size and run one native -> token swap. `snapshot_native` is used only
    /// when a fresh balance cannot be read.
    pub async fn forward<R: Rng + Send + ?Sized>(
        &self,
        chain: &dyn ChainPort,
        pair: &SwapPair,
        snapshot_native: U256,
        rng: &mut R,
    ) -> SwapReport {
        let balance = match chain.native_balance(chain.address()).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::warn!("Native balance refresh failed, using snapshot: {}", e);
                snapshot_native
            }
        };

        let sizing = &self.settings.forward_sizing;
        if !sizing.can_afford(balance) {
            tracing::error!("Low OPN: {}", display_units(balance, 18));
            return SwapReport::new(
                SwapOutcome::failed(FailureReason::InsufficientBalance, SwapStage::Sizing),
                0,
            );
        }

        let Some(sized) = sizing.size(balance, rng) else {
            tracing::error!("Balance {} cannot cover the minimum swap", display_units(balance, 18));
            return SwapReport::new(
                SwapOutcome::failed(FailureReason::InsufficientBalance, SwapStage::Sizing),
                0,
            );
        };

        tracing::info!(
            "Random amount: {} OPN ({:.1}% of balance{})",
            display_units(sized.amount, 18),
            sized.percent * 100.0,
            if sized.floored { ", floored" } else { "" }
        );

        let request = SwapRequest::new(SwapDirection::Forward, sized.amount, pair.clone());
        if pair.output == self.settings.wrapped_native {
            let op = Operation::Wrap { amount: request.amount_in };
            return self.convert(chain, &request, op).await;
        }
        self.execute(chain, request).await
    }

    /// Size and run one token -> native swap. `None` when the drawn amount is
    /// dust: nothing is sent and it does not count as a failure.
    pub async fn reverse<R: Rng + Send + ?Sized>(
        &self,
        chain: &dyn ChainPort,
        pair: &SwapPair,
        balance: U256,
        rng: &mut R,
    ) -> Option<SwapReport> {
        let Some(sized) = self.settings.reverse_sizing.size(balance, pair.decimals, rng) else {
            tracing::warn!("No/low balance for reverse {}", pair.symbol);
            return None;
        };

        tracing::info!(
            "Random amount: {} {} ({:.1}% of balance)",
            display_units(sized.amount, pair.decimals),
            pair.symbol,
            sized.percent * 100.0
        );

        let request = SwapRequest::new(SwapDirection::Reverse, sized.amount, pair.clone());
        if pair.output == self.settings.wrapped_native {
            let op = Operation::Unwrap { amount: request.amount_in };
            return Some(self.convert(chain, &request, op).await);
        }
        Some(self.execute(chain, request).await)
    }

    /// Router swap with the bounded retry loop
    pub async fn execute(&self, chain: &dyn ChainPort, request: SwapRequest) -> SwapReport {
        let mut request = request;
        let mut submissions = 0u8;

        loop {
            match self.attempt(chain, &request, &mut submissions).await {
                Attempt::Done(outcome) => return SwapReport::new(outcome, submissions),
                Attempt::Retry { last } => {
                    if request.attempt + 1 >= self.settings.max_attempts {
                        return SwapReport::new(last, submissions);
                    }
                    request = request.retry();
                    tracing::warn!(
                        "Retrying {} {} with lower slippage ({}% min)...",
                        request.direction,
                        request.pair.symbol,
                        self.settings.slippage.factor_for(request.attempt) / 10
                    );
                }
            }
        }
    }

    async fn attempt(
        &self,
        chain: &dyn ChainPort,
        request: &SwapRequest,
        submissions: &mut u8,
    ) -> Attempt {
        let direction = request.direction;
        let pair = &request.pair;

        let mut amount_out = match self.quote(chain, request).await {
            Ok(amount_out) => amount_out,
            Err(attempt) => return attempt,
        };

        if direction == SwapDirection::Reverse {
            match self.ensure_allowance(chain, pair, request.amount_in).await {
                Ok(Approval::AlreadySufficient) => {}
                Ok(Approval::Mined) => {
                    amount_out = match self.quote(chain, request).await {
                        Ok(amount_out) => amount_out,
                        Err(attempt) => return attempt,
                    };
                }
                Err(e) => {
                    tracing::error!("Approve {} failed: {}", pair.symbol, e);
                    return Attempt::Done(SwapOutcome::failed(
                        FailureReason::ApprovalFailed,
                        SwapStage::Approving,
                    ));
                }
            }
        }

        let gas_price = self.gas.price(chain).await;
        tracing::info!("Gas: {} gwei", display_units(U256::from(gas_price), 9));

        let amount_out_min = self.settings.slippage.amount_out_min(amount_out, request.attempt);
        let path = pair.path(direction, self.settings.wrapped_native);
        let op = match direction {
            SwapDirection::Forward => Operation::SwapNativeForTokens {
                amount_in: request.amount_in,
                amount_out_min,
                path,
            },
            SwapDirection::Reverse => Operation::SwapTokensForNative {
                amount_in: request.amount_in,
                amount_out_min,
                path,
            },
        };

        let tx = match self.builder.assemble(chain, &op, gas_price).await {
            Ok(tx) => tx,
            Err(e) => return self.classify(e, request, SwapStage::Building),
        };

        *submissions += 1;
        let tx_hash = match chain.send_transaction(&tx).await {
            Ok(hash) => hash,
            Err(e) => return self.classify(e, request, SwapStage::Submitting),
        };
        tracing::info!(
            "{} TX: {} | View: {}",
            capitalize(direction),
            tx_hash,
            self.settings.explorer_link(tx_hash)
        );

        match chain.wait_for_receipt(tx_hash).await {
            Ok(receipt) if receipt.success => {
                Attempt::Done(self.succeeded(direction, &receipt))
            }
            Ok(receipt) => {
                tracing::error!(
                    "{} reverted | Gas wasted: {}",
                    capitalize(direction),
                    receipt.gas_used
                );
                if receipt.log_count == 0 {
                    tracing::warn!("No logs - likely slippage/liquidity");
                }
                Attempt::Retry {
                    last: SwapOutcome::Reverted {
                        gas_used: receipt.gas_used,
                    },
                }
            }
            Err(e) => self.classify(e, request, SwapStage::Confirming),
        }
    }

    /// Quote and apply the sufficiency policy
    async fn quote(&self, chain: &dyn ChainPort, request: &SwapRequest) -> Result<U256, Attempt> {
        let pair = &request.pair;
        let quote = self
            .quoter
            .quote(chain, request.amount_in, pair, request.direction)
            .await
            .map_err(|e| self.classify(e, request, SwapStage::Quoting))?;

        let (out_decimals, out_symbol) = match request.direction {
            SwapDirection::Forward => (pair.decimals, pair.symbol.as_str()),
            SwapDirection::Reverse => (18, "OPN"),
        };
        tracing::info!(
            "Expected out: {} {}",
            display_units(quote.amount_out, out_decimals),
            out_symbol
        );

        match quote.sufficiency {
            Sufficiency::Zero => {
                tracing::error!("Zero {} liquidity for {} - skipping", request.direction, pair.symbol);
                Err(Attempt::Done(SwapOutcome::failed(
                    FailureReason::ZeroLiquidity,
                    SwapStage::Quoting,
                )))
            }
            Sufficiency::Low => {
                tracing::warn!(
                    "Low but positive {} liquidity for {} - proceeding with caution",
                    request.direction,
                    pair.symbol
                );
                Ok(quote.amount_out)
            }
            Sufficiency::Adequate => Ok(quote.amount_out),
        }
    }

    /// Approve the router for `amount` unless the allowance already covers it.
    /// A nonce conflict on submission is retried once with pending nonce + 1.
    async fn ensure_allowance(
        &self,
        chain: &dyn ChainPort,
        pair: &SwapPair,
        amount: U256,
    ) -> Result<Approval, ChainError> {
        let owner = chain.address();
        let router = self.settings.router;

        let allowance = chain.allowance(pair.output, owner, router).await?;
        if allowance >= amount {
            tracing::info!("Allowance OK for {} - skipping approve", pair.symbol);
            return Ok(Approval::AlreadySufficient);
        }

        let op = Operation::Approve {
            token: pair.output,
            spender: router,
            amount,
        };
        let gas_price = self.gas.approval_price();
        let tx = self.builder.assemble(chain, &op, gas_price).await?;

        let tx_hash = match chain.send_transaction(&tx).await {
            Ok(hash) => hash,
            Err(e) if e.is_nonce_conflict() => {
                tracing::warn!("Nonce error on approve {} - retry with +1", pair.symbol);
                let nonce = chain.pending_nonce(owner).await? + 1;
                let retry = self.builder.build(&op, owner, gas_price, nonce);
                chain.send_transaction(&retry).await?
            }
            Err(e) => return Err(e),
        };
        tracing::info!("Approve {}: {}", pair.symbol, tx_hash);

        let receipt = chain.wait_for_receipt(tx_hash).await?;
        if !receipt.success {
            return Err(ChainError::Reverted(format!("approval {} reverted", tx_hash)));
        }
        tracing::info!("Approved {}", pair.symbol);
        Ok(Approval::Mined)
    }

    /// Wrap or unwrap through the wrapped-native contract. Single attempt, no
    /// quote: the conversion is 1:1.
    async fn convert(&self, chain: &dyn ChainPort, request: &SwapRequest, op: Operation) -> SwapReport {
        let label = op.label();
        let gas_price = self.gas.price(chain).await;

        let tx = match self.builder.assemble(chain, &op, gas_price).await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!("{} {} failed: {}", label, request.pair.symbol, e);
                return SwapReport::new(SwapOutcome::failed(e.failure_reason(), SwapStage::Building), 0);
            }
        };

        let tx_hash: TxHash = match chain.send_transaction(&tx).await {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("{} {} failed: {}", label, request.pair.symbol, e);
                return SwapReport::new(
                    SwapOutcome::failed(e.failure_reason(), SwapStage::Submitting),
                    1,
                );
            }
        };
        tracing::info!(
            "{} TX ({}): {} | View: {}",
            capitalize(request.direction),
            label,
            tx_hash,
            self.settings.explorer_link(tx_hash)
        );

        let outcome = match chain.wait_for_receipt(tx_hash).await {
            Ok(receipt) if receipt.success => self.succeeded(request.direction, &receipt),
            Ok(receipt) => {
                tracing::error!("{} reverted | Gas wasted: {}", label, receipt.gas_used);
                SwapOutcome::Reverted {
                    gas_used: receipt.gas_used,
                }
            }
            Err(e) => {
                tracing::error!("{} {} not confirmed: {}", label, request.pair.symbol, e);
                SwapOutcome::failed(e.failure_reason(), SwapStage::Confirming)
            }
        };
        SwapReport::new(outcome, 1)
    }

    fn succeeded(&self, direction: SwapDirection, receipt: &ReceiptSummary) -> SwapOutcome {
        match receipt.block_number {
            Some(block) => tracing::info!(
                "{} success | Gas used: {} | Block: {}",
                capitalize(direction),
                receipt.gas_used,
                block
            ),
            None => tracing::info!(
                "{} success | Gas used: {}",
                capitalize(direction),
                receipt.gas_used
            ),
        }
        SwapOutcome::Succeeded {
            tx_hash: receipt.tx_hash,
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
        }
    }

    /// Only revert- and funds-shaped errors earn another attempt
    fn classify(&self, err: ChainError, request: &SwapRequest, stage: SwapStage) -> Attempt {
        tracing::error!(
            "{} {} error while {}: {}",
            capitalize(request.direction),
            request.pair.symbol,
            stage,
            err
        );
        let outcome = SwapOutcome::failed(err.failure_reason(), stage);
        if err.is_retryable() {
            Attempt::Retry { last: outcome }
        } else {
            Attempt::Done(outcome)
        }
    }
}

fn capitalize(direction: SwapDirection) -> &'static str {
    match direction {
        SwapDirection::Forward => "Forward",
        SwapDirection::Reverse => "Reverse",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings::{DEFAULT_ROUTER, DEFAULT_WRAPPED_NATIVE, OPNT};
    use crate::application::tx_builder::decode_amount_out_min;
    use crate::domain::to_base_units;
    use crate::ports::mocks::MockChain;
    use alloy::primitives::{address, Address};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WALLET: Address = address!("00000000000000000000000000000000000000aa");

    fn ether(value: f64) -> U256 {
        to_base_units(value, 18)
    }

    fn executor() -> SwapExecutor {
        SwapExecutor::new(EngineSettings::default())
    }

    fn opnt() -> SwapPair {
        SwapPair::new(OPNT, "OPNT", 18)
    }

    #[tokio::test]
    async fn test_forward_success_single_submission() {
        let chain = MockChain::new(WALLET)
            .with_native_balance(ether(1.0))
            .with_default_quote(ether(5.0));
        let mut rng = StdRng::seed_from_u64(1);

        let report = executor().forward(&chain, &opnt(), ether(1.0), &mut rng).await;

        assert!(report.is_success());
        assert_eq!(report.submissions, 1);
        let sent = chain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, DEFAULT_ROUTER);
        assert_eq!(
            decode_amount_out_min(&sent[0].data, SwapDirection::Forward),
            Some(ether(5.0) * U256::from(950u64) / U256::from(1000u64))
        );
    }

    #[tokio::test]
    async fn test_zero_quote_never_submits() {
        let chain = MockChain::new(WALLET).with_native_balance(ether(1.0));
        let mut rng = StdRng::seed_from_u64(2);

        let report = executor().forward(&chain, &opnt(), ether(1.0), &mut rng).await;

        assert_eq!(
            report.outcome,
            SwapOutcome::failed(FailureReason::ZeroLiquidity, SwapStage::Quoting)
        );
        assert_eq!(report.submissions, 0);
        assert!(chain.send_attempts().is_empty());
        assert_eq!(chain.quote_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_low_balance_fails_before_quoting() {
        let chain = MockChain::new(WALLET).with_native_balance(ether(0.001));
        let mut rng = StdRng::seed_from_u64(3);

        let report = executor().forward(&chain, &opnt(), ether(1.0), &mut rng).await;

        assert_eq!(
            report.outcome,
            SwapOutcome::failed(FailureReason::InsufficientBalance, SwapStage::Sizing)
        );
        assert!(chain.quote_calls().is_empty());
    }

    #[tokio::test]
    async fn test_balance_refresh_failure_uses_snapshot() {
        let chain = MockChain::new(WALLET)
            .with_native_error(ChainError::Transport("down".into()))
            .with_default_quote(ether(5.0));
        let mut rng = StdRng::seed_from_u64(4);

        let report = executor().forward(&chain, &opnt(), ether(2.0), &mut rng).await;

        assert!(report.is_success());
        let (amount_in, _) = chain.quote_calls()[0].clone();
        assert!(amount_in >= ether(0.01) && amount_in <= ether(0.03));
    }

    #[tokio::test]
    async fn test_revert_then_success_uses_retry_slippage() {
        let chain = MockChain::new(WALLET)
            .with_native_balance(ether(1.0))
            .with_default_quote(ether(4.0))
            .with_receipt(false)
            .with_receipt(true);
        let mut rng = StdRng::seed_from_u64(5);

        let report = executor().forward(&chain, &opnt(), ether(1.0), &mut rng).await;

        assert!(report.is_success());
        assert_eq!(report.submissions, 2);
        let sent = chain.sent();
        assert_eq!(
            decode_amount_out_min(&sent[0].data, SwapDirection::Forward),
            Some(ether(3.8))
        );
        assert_eq!(
            decode_amount_out_min(&sent[1].data, SwapDirection::Forward),
            Some(ether(2.0))
        );
        assert_eq!(sent[0].value, sent[1].value);
    }

    #[tokio::test]
    async fn test_retry_cap_ends_reverted() {
        let chain = MockChain::new(WALLET)
            .with_native_balance(ether(1.0))
            .with_default_quote(ether(4.0))
            .with_receipt(false)
            .with_receipt(false)
            .with_receipt(false);
        let mut rng = StdRng::seed_from_u64(6);

        let report = executor().forward(&chain, &opnt(), ether(1.0), &mut rng).await;

        assert_eq!(report.outcome, SwapOutcome::Reverted { gas_used: 45_000 });
        assert_eq!(report.submissions, 2);
        assert_eq!(chain.send_attempts().len(), 2);
    }

    #[tokio::test]
    async fn test_funds_error_is_retried() {
        let chain = MockChain::new(WALLET)
            .with_native_balance(ether(1.0))
            .with_default_quote(ether(4.0))
            .with_send_result(Err(ChainError::InsufficientFunds("insufficient funds".into())));
        let mut rng = StdRng::seed_from_u64(7);

        let report = executor().forward(&chain, &opnt(), ether(1.0), &mut rng).await;

        assert!(report.is_success());
        assert_eq!(report.submissions, 2);
    }

    #[tokio::test]
    async fn test_retryable_error_on_last_attempt_fails() {
        let chain = MockChain::new(WALLET)
            .with_native_balance(ether(1.0))
            .with_quote(Err(ChainError::Reverted("execution reverted".into())))
            .with_quote(Err(ChainError::Reverted("execution reverted".into())));
        let mut rng = StdRng::seed_from_u64(8);

        let report = executor().forward(&chain, &opnt(), ether(1.0), &mut rng).await;

        assert_eq!(
            report.outcome,
            SwapOutcome::failed(FailureReason::Reverted, SwapStage::Quoting)
        );
        assert_eq!(report.submissions, 0);
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let chain = MockChain::new(WALLET)
            .with_native_balance(ether(1.0))
            .with_default_quote(ether(4.0))
            .with_send_result(Err(ChainError::Transport("connection refused".into())));
        let mut rng = StdRng::seed_from_u64(9);

        let report = executor().forward(&chain, &opnt(), ether(1.0), &mut rng).await;

        assert_eq!(
            report.outcome,
            SwapOutcome::failed(FailureReason::Transport, SwapStage::Submitting)
        );
        assert_eq!(chain.send_attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_reverse_skips_approval_when_allowed() {
        let chain = MockChain::new(WALLET)
            .with_allowance(OPNT, U256::MAX)
            .with_default_quote(ether(0.5));
        let mut rng = StdRng::seed_from_u64(10);

        let report = executor()
            .reverse(&chain, &opnt(), ether(100.0), &mut rng)
            .await
            .unwrap();

        assert!(report.is_success());
        let sent = chain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, DEFAULT_ROUTER);
        assert_eq!(chain.quote_calls()[0].1, vec![OPNT, DEFAULT_WRAPPED_NATIVE]);
    }

    #[tokio::test]
    async fn test_reverse_approves_then_requotes() {
        let chain = MockChain::new(WALLET)
            .with_base_nonce(3)
            .with_default_quote(ether(0.5));
        let mut rng = StdRng::seed_from_u64(11);

        let report = executor()
            .reverse(&chain, &opnt(), ether(100.0), &mut rng)
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.submissions, 1);
        let approvals = chain.sent_to(OPNT);
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0].nonce, 3);
        assert_eq!(approvals[0].gas_limit, 100_000);
        assert_eq!(approvals[0].gas_price, 15 * crate::domain::GWEI);
        assert_eq!(chain.quote_calls().len(), 2);
        assert_eq!(chain.sent_to(DEFAULT_ROUTER)[0].nonce, 4);
    }

    #[tokio::test]
    async fn test_approval_nonce_conflict_retries_with_plus_one() {
        let chain = MockChain::new(WALLET)
            .with_base_nonce(7)
            .with_default_quote(ether(0.5))
            .with_send_result(Err(ChainError::NonceConflict("invalid nonce".into())));
        let mut rng = StdRng::seed_from_u64(12);

        let report = executor()
            .reverse(&chain, &opnt(), ether(100.0), &mut rng)
            .await
            .unwrap();

        assert!(report.is_success());
        let attempts = chain.send_attempts();
        assert_eq!(attempts[0].nonce, 7);
        assert_eq!(attempts[1].to, OPNT);
        assert_eq!(attempts[1].nonce, 8);
    }

    #[tokio::test]
    async fn test_approval_failure_aborts_swap() {
        let chain = MockChain::new(WALLET)
            .with_default_quote(ether(0.5))
            .with_send_result(Err(ChainError::Rejected("gas too low".into())));
        let mut rng = StdRng::seed_from_u64(13);

        let report = executor()
            .reverse(&chain, &opnt(), ether(100.0), &mut rng)
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            SwapOutcome::failed(FailureReason::ApprovalFailed, SwapStage::Approving)
        );
        assert!(chain.sent_to(DEFAULT_ROUTER).is_empty());
    }

    #[tokio::test]
    async fn test_reverted_approval_aborts_swap() {
        let chain = MockChain::new(WALLET)
            .with_default_quote(ether(0.5))
            .with_receipt(false);
        let mut rng = StdRng::seed_from_u64(14);

        let report = executor()
            .reverse(&chain, &opnt(), ether(100.0), &mut rng)
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            SwapOutcome::failed(FailureReason::ApprovalFailed, SwapStage::Approving)
        );
        assert_eq!(chain.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_reverse_dust_is_noop() {
        let chain = MockChain::new(WALLET).with_default_quote(ether(0.5));
        let mut rng = StdRng::seed_from_u64(15);

        let report = executor()
            .reverse(&chain, &opnt(), ether(0.000_005), &mut rng)
            .await;

        assert!(report.is_none());
        assert!(chain.quote_calls().is_empty());
        assert!(chain.send_attempts().is_empty());
    }

    #[tokio::test]
    async fn test_unwrap_bypasses_router() {
        let wopn = SwapPair::new(DEFAULT_WRAPPED_NATIVE, "WOPN", 18);
        let chain = MockChain::new(WALLET);
        let mut rng = StdRng::seed_from_u64(16);

        let report = executor()
            .reverse(&chain, &wopn, ether(10.0), &mut rng)
            .await
            .unwrap();

        assert!(report.is_success());
        assert!(chain.quote_calls().is_empty());
        let sent = chain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, DEFAULT_WRAPPED_NATIVE);
        assert_eq!(&sent[0].data[..4], &[0x2e, 0x1a, 0x7d, 0x4d]);
    }

    #[tokio::test]
    async fn test_unwrap_is_single_attempt() {
        let wopn = SwapPair::new(DEFAULT_WRAPPED_NATIVE, "WOPN", 18);
        let chain = MockChain::new(WALLET).with_receipt(false);
        let mut rng = StdRng::seed_from_u64(17);

        let report = executor()
            .reverse(&chain, &wopn, ether(10.0), &mut rng)
            .await
            .unwrap();

        assert_eq!(report.outcome, SwapOutcome::Reverted { gas_used: 45_000 });
        assert_eq!(chain.send_attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_forward_into_wrapped_native_deposits() {
        let wopn = SwapPair::new(DEFAULT_WRAPPED_NATIVE, "WOPN", 18);
        let chain = MockChain::new(WALLET).with_native_balance(ether(1.0));
        let mut rng = StdRng::seed_from_u64(18);

        let report = executor().forward(&chain, &wopn, ether(1.0), &mut rng).await;

        assert!(report.is_success());
        let sent = chain.sent();
        assert_eq!(sent[0].to, DEFAULT_WRAPPED_NATIVE);
        assert_eq!(&sent[0].data[..], &[0xd0, 0xe3, 0x0d, 0xb0]);
        assert!(!sent[0].value.is_zero());
    }
}

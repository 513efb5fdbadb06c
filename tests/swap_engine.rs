//! Swap Engine Integration Tests
//!
//! Drives the fleet and wallet schedulers end to end against in-memory
//! chains:
//! 1. Forward swap -> touched token -> reverse swap
//! 2. Quote and receipt failures through the retry loop
//! 3. Fleet rotation, proxy cycling and the one-time swap count prompt
//!
//! All tests are deterministic (seeded RNG, no delays, no network).

use alloy::primitives::{address, Address, U256};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use opn_farmer::application::settings::{DEFAULT_ROUTER, DEFAULT_WRAPPED_NATIVE, OPNT, TUSDT};
use opn_farmer::application::tx_builder::decode_amount_out_min;
use opn_farmer::application::{
    EngineSettings, FleetConfig, FleetScheduler, ScheduleSettings, SwapExecutor,
    WalletCycleScheduler, WalletOutcome,
};
use opn_farmer::domain::{to_base_units, SwapDirection, SwapPair};
use opn_farmer::ports::mocks::{MockChain, MockConnector, ScriptedPrompt};

// ============================================================================
// Test Fixtures
// ============================================================================

const WALLET_A: Address = address!("000000000000000000000000000000000000a001");
const WALLET_B: Address = address!("000000000000000000000000000000000000b002");

fn ether(value: f64) -> U256 {
    to_base_units(value, 18)
}

fn opnt_only() -> Vec<SwapPair> {
    vec![SwapPair::new(OPNT, "OPNT", 18)]
}

fn funded_wallet(address: Address) -> MockChain {
    MockChain::new(address)
        .with_native_balance(ether(1.0))
        .with_default_quote(ether(5.0))
}

fn fleet(
    chains: Vec<Arc<MockChain>>,
    prompt_answer: &str,
    pairs: Vec<SwapPair>,
) -> (FleetScheduler<StdRng>, Arc<MockConnector>, Arc<ScriptedPrompt>) {
    let connector = Arc::new(MockConnector::new(chains));
    let prompt = Arc::new(ScriptedPrompt::new(prompt_answer));
    let scheduler = FleetScheduler::new(
        connector.clone(),
        prompt.clone(),
        SwapExecutor::new(EngineSettings::default()),
        pairs,
        ScheduleSettings::immediate(),
        StdRng::seed_from_u64(2024),
    );
    (scheduler, connector, prompt)
}

async fn run_wallet(chain: &MockChain, pairs: &[SwapPair], swap_count: u32) -> WalletOutcome {
    let executor = SwapExecutor::new(EngineSettings::default());
    let schedule = ScheduleSettings::immediate();
    let scheduler = WalletCycleScheduler::new(&executor, pairs, &schedule);
    let mut rng = StdRng::seed_from_u64(77);
    scheduler.run(chain, swap_count, &mut rng).await
}

// ============================================================================
// Wallet Cycle
// ============================================================================

mod wallet_cycle {
    use super::*;

    #[tokio::test]
    async fn test_forward_then_reverse_touched_token() {
        let pairs = opnt_only();
        let chain = funded_wallet(WALLET_A)
            .with_token_balance(OPNT, ether(20.0))
            .with_allowance(OPNT, U256::MAX);

        let outcome = run_wallet(&chain, &pairs, 1).await;

        let WalletOutcome::Completed(report) = outcome else {
            panic!("expected completed cycle, got {:?}", outcome);
        };
        assert_eq!(report.forward_succeeded, 1);
        assert_eq!(report.forward_failed, 0);
        assert_eq!(report.tokens_touched, 1);
        assert_eq!(report.reverse_attempted, 1);
        assert_eq!(report.reverse_succeeded, 1);
        assert_eq!(report.final_native, Some(ether(1.0)));

        let sent = chain.sent_to(DEFAULT_ROUTER);
        assert_eq!(sent.len(), 2);
        // Forward pays native value, reverse pays none
        assert!(!sent[0].value.is_zero());
        assert!(sent[1].value.is_zero());
        assert_eq!(chain.quote_calls()[1].1, vec![OPNT, DEFAULT_WRAPPED_NATIVE]);
    }

    #[tokio::test]
    async fn test_zero_quote_sends_nothing() {
        let pairs = opnt_only();
        let chain = MockChain::new(WALLET_A).with_native_balance(ether(1.0));

        let outcome = run_wallet(&chain, &pairs, 2).await;

        let WalletOutcome::Completed(report) = outcome else {
            panic!("expected completed cycle, got {:?}", outcome);
        };
        assert_eq!(report.forward_failed, 2);
        assert_eq!(report.forward_succeeded, 0);
        // Touched, but the balance is empty so no reverse is attempted
        assert_eq!(report.tokens_touched, 1);
        assert_eq!(report.reverse_attempted, 0);
        assert!(chain.send_attempts().is_empty());
    }

    #[tokio::test]
    async fn test_revert_then_success_with_wider_slippage() {
        let pairs = opnt_only();
        let chain = funded_wallet(WALLET_A)
            .with_default_quote(ether(10.0))
            .with_receipt(false)
            .with_receipt(true);

        let outcome = run_wallet(&chain, &pairs, 1).await;

        let WalletOutcome::Completed(report) = outcome else {
            panic!("expected completed cycle, got {:?}", outcome);
        };
        assert_eq!(report.forward_succeeded, 1);

        let sent = chain.sent_to(DEFAULT_ROUTER);
        assert_eq!(sent.len(), 2);
        assert_eq!(
            decode_amount_out_min(&sent[0].data, SwapDirection::Forward),
            Some(ether(9.5))
        );
        assert_eq!(
            decode_amount_out_min(&sent[1].data, SwapDirection::Forward),
            Some(ether(5.0))
        );
        assert_eq!(sent[1].nonce, sent[0].nonce + 1);
    }

    #[tokio::test]
    async fn test_persistent_revert_counts_one_failure() {
        let pairs = opnt_only();
        let chain = funded_wallet(WALLET_A)
            .with_receipt(false)
            .with_receipt(false);

        let outcome = run_wallet(&chain, &pairs, 1).await;

        let WalletOutcome::Completed(report) = outcome else {
            panic!("expected completed cycle, got {:?}", outcome);
        };
        assert_eq!(report.forward_failed, 1);
        assert_eq!(chain.send_attempts().len(), 2);
    }

    #[tokio::test]
    async fn test_reverse_approval_uses_sequential_nonces() {
        let pairs = opnt_only();
        let chain = funded_wallet(WALLET_A)
            .with_base_nonce(5)
            .with_token_balance(OPNT, ether(20.0));

        let outcome = run_wallet(&chain, &pairs, 1).await;
        assert!(matches!(outcome, WalletOutcome::Completed(_)));

        let sent = chain.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].to, DEFAULT_ROUTER);
        assert_eq!(sent[1].to, OPNT);
        assert_eq!(sent[2].to, DEFAULT_ROUTER);
        let nonces: Vec<u64> = sent.iter().map(|tx| tx.nonce).collect();
        assert_eq!(nonces, vec![5, 6, 7]);
    }

    #[tokio::test]
    async fn test_wrapped_native_round_trip_skips_router() {
        let pairs = vec![SwapPair::new(DEFAULT_WRAPPED_NATIVE, "WOPN", 18)];
        let chain = funded_wallet(WALLET_A).with_token_balance(DEFAULT_WRAPPED_NATIVE, ether(2.0));

        let outcome = run_wallet(&chain, &pairs, 1).await;

        let WalletOutcome::Completed(report) = outcome else {
            panic!("expected completed cycle, got {:?}", outcome);
        };
        assert_eq!(report.forward_succeeded, 1);
        assert_eq!(report.reverse_succeeded, 1);
        assert!(chain.quote_calls().is_empty());
        assert!(chain.sent_to(DEFAULT_ROUTER).is_empty());
        assert_eq!(chain.sent_to(DEFAULT_WRAPPED_NATIVE).len(), 2);
    }
}

// ============================================================================
// Fleet
// ============================================================================

mod fleet {
    use super::*;

    #[tokio::test]
    async fn test_prompt_asked_once_across_cycles() {
        let a = Arc::new(funded_wallet(WALLET_A));
        let b = Arc::new(funded_wallet(WALLET_B));
        let (mut scheduler, _, prompt) = fleet(vec![a.clone(), b.clone()], "2", opnt_only());

        let mut config = FleetConfig::default();
        let cycles = scheduler.run(&mut config, Some(2)).await.unwrap();

        assert_eq!(cycles, 2);
        assert_eq!(prompt.calls(), 1);
        assert_eq!(config.swap_count, Some(2));
        // 2 forwards per wallet per cycle
        assert_eq!(a.sent_to(DEFAULT_ROUTER).len(), 4);
        assert_eq!(b.sent_to(DEFAULT_ROUTER).len(), 4);
    }

    #[tokio::test]
    async fn test_proxies_rotate_by_wallet_index() {
        let chains = vec![
            Arc::new(funded_wallet(WALLET_A)),
            Arc::new(funded_wallet(WALLET_B)),
            Arc::new(funded_wallet(Address::with_last_byte(3))),
        ];
        let (mut scheduler, connector, _) = fleet(chains, "1", opnt_only());

        let mut config = FleetConfig::new(vec!["10.0.0.1:8080".into(), "10.0.0.2:8080".into()]);
        scheduler.run_cycle(&mut config).await.unwrap();

        assert_eq!(
            connector.connections(),
            vec![
                (0, Some("10.0.0.1:8080".to_string())),
                (1, Some("10.0.0.2:8080".to_string())),
                (2, Some("10.0.0.1:8080".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_low_wallet_is_skipped_and_fleet_continues() {
        let poor = Arc::new(MockChain::new(WALLET_A).with_native_balance(ether(0.0005)));
        let rich = Arc::new(funded_wallet(WALLET_B));
        let (mut scheduler, _, _) = fleet(vec![poor.clone(), rich.clone()], "1", opnt_only());

        let report = scheduler.run_cycle(&mut FleetConfig::default()).await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.completed, 1);
        assert_eq!(report.forward_succeeded, 1);
        assert!(poor.send_attempts().is_empty());
        assert_eq!(rich.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_untouched_holdings_are_left_alone() {
        let chain = Arc::new(funded_wallet(WALLET_A).with_token_balance(TUSDT, ether(50.0)));
        let (mut scheduler, _, _) = fleet(vec![chain.clone()], "3", opnt_only());

        scheduler.run_cycle(&mut FleetConfig::default()).await.unwrap();

        assert!(chain.sent_to(TUSDT).is_empty());
        assert!(chain
            .quote_calls()
            .iter()
            .all(|(_, path)| !path.contains(&TUSDT)));
    }
}

//! In-memory port implementations that record calls and replay scripted
//! responses. Used by unit and integration tests.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::chain::{ChainConnector, ChainError, ChainPort, ReceiptSummary, TxDescriptor};
use super::prompt::SwapCountPrompt;

/// Mock chain endpoint with a scripted router and receipt queue
#[derive(Debug)]
pub struct MockChain {
    address: Address,
    native: Mutex<Result<U256, ChainError>>,
    gas_price: Mutex<Result<Option<u128>, ChainError>>,
    base_nonce: u64,
    quotes: Mutex<VecDeque<Result<U256, ChainError>>>,
    default_quote: Mutex<U256>,
    allowances: Mutex<HashMap<Address, U256>>,
    token_balances: Mutex<HashMap<Address, U256>>,
    token_decimals: Mutex<HashMap<Address, Result<u8, ChainError>>>,
    send_results: Mutex<VecDeque<Result<(), ChainError>>>,
    receipts: Mutex<VecDeque<bool>>,
    sent: Mutex<Vec<TxDescriptor>>,
    send_attempts: Mutex<Vec<TxDescriptor>>,
    quote_calls: Mutex<Vec<(U256, Vec<Address>)>>,
}

impl MockChain {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            native: Mutex::new(Ok(U256::ZERO)),
            gas_price: Mutex::new(Ok(None)),
            base_nonce: 0,
            quotes: Mutex::new(VecDeque::new()),
            default_quote: Mutex::new(U256::ZERO),
            allowances: Mutex::new(HashMap::new()),
            token_balances: Mutex::new(HashMap::new()),
            token_decimals: Mutex::new(HashMap::new()),
            send_results: Mutex::new(VecDeque::new()),
            receipts: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            send_attempts: Mutex::new(Vec::new()),
            quote_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_native_balance(self, balance: U256) -> Self {
        *self.native.lock().unwrap() = Ok(balance);
        self
    }

    pub fn with_native_error(self, error: ChainError) -> Self {
        *self.native.lock().unwrap() = Err(error);
        self
    }

    pub fn with_gas_price(self, price: Result<Option<u128>, ChainError>) -> Self {
        *self.gas_price.lock().unwrap() = price;
        self
    }

    pub fn with_base_nonce(mut self, nonce: u64) -> Self {
        self.base_nonce = nonce;
        self
    }

    /// Output returned once the scripted quote queue is empty
    pub fn with_default_quote(self, amount_out: U256) -> Self {
        *self.default_quote.lock().unwrap() = amount_out;
        self
    }

    /// Queue one quote response
    pub fn with_quote(self, amount_out: Result<U256, ChainError>) -> Self {
        self.quotes.lock().unwrap().push_back(amount_out);
        self
    }

    pub fn with_allowance(self, token: Address, amount: U256) -> Self {
        self.allowances.lock().unwrap().insert(token, amount);
        self
    }

    pub fn with_token_balance(self, token: Address, amount: U256) -> Self {
        self.token_balances.lock().unwrap().insert(token, amount);
        self
    }

    /// On-chain `decimals()` answer for `token`; defaults to 18
    pub fn with_token_decimals(self, token: Address, decimals: Result<u8, ChainError>) -> Self {
        self.token_decimals.lock().unwrap().insert(token, decimals);
        self
    }

    /// Queue one broadcast result; defaults to accepted
    pub fn with_send_result(self, result: Result<(), ChainError>) -> Self {
        self.send_results.lock().unwrap().push_back(result);
        self
    }

    /// Queue one receipt status; defaults to success
    pub fn with_receipt(self, success: bool) -> Self {
        self.receipts.lock().unwrap().push_back(success);
        self
    }

    /// Transactions accepted by the node
    pub fn sent(&self) -> Vec<TxDescriptor> {
        self.sent.lock().unwrap().clone()
    }

    /// Every broadcast attempt, accepted or not
    pub fn send_attempts(&self) -> Vec<TxDescriptor> {
        self.send_attempts.lock().unwrap().clone()
    }

    pub fn quote_calls(&self) -> Vec<(U256, Vec<Address>)> {
        self.quote_calls.lock().unwrap().clone()
    }

    /// Accepted transactions sent to `to`
    pub fn sent_to(&self, to: Address) -> Vec<TxDescriptor> {
        self.sent()
            .into_iter()
            .filter(|tx| tx.to == to)
            .collect()
    }
}

#[async_trait]
impl ChainPort for MockChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn native_balance(&self, _owner: Address) -> Result<U256, ChainError> {
        self.native.lock().unwrap().clone()
    }

    async fn gas_price(&self) -> Result<Option<u128>, ChainError> {
        self.gas_price.lock().unwrap().clone()
    }

    async fn pending_nonce(&self, _owner: Address) -> Result<u64, ChainError> {
        Ok(self.base_nonce + self.sent.lock().unwrap().len() as u64)
    }

    async fn amounts_out(
        &self,
        _router: Address,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>, ChainError> {
        self.quote_calls
            .lock()
            .unwrap()
            .push((amount_in, path.to_vec()));

        let next = self.quotes.lock().unwrap().pop_front();
        let amount_out = match next {
            Some(result) => result?,
            None => *self.default_quote.lock().unwrap(),
        };
        Ok(vec![amount_in, amount_out])
    }

    async fn allowance(
        &self,
        token: Address,
        _owner: Address,
        _spender: Address,
    ) -> Result<U256, ChainError> {
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&token)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn token_balance(&self, token: Address, _owner: Address) -> Result<U256, ChainError> {
        Ok(self
            .token_balances
            .lock()
            .unwrap()
            .get(&token)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainError> {
        self.token_decimals
            .lock()
            .unwrap()
            .get(&token)
            .cloned()
            .unwrap_or(Ok(18))
    }

    async fn send_transaction(&self, tx: &TxDescriptor) -> Result<TxHash, ChainError> {
        self.send_attempts.lock().unwrap().push(tx.clone());

        let result = self.send_results.lock().unwrap().pop_front().unwrap_or(Ok(()));
        result?;

        let mut sent = self.sent.lock().unwrap();
        sent.push(tx.clone());
        Ok(TxHash::with_last_byte(sent.len() as u8))
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary, ChainError> {
        let success = self.receipts.lock().unwrap().pop_front().unwrap_or(true);
        Ok(ReceiptSummary {
            tx_hash,
            success,
            gas_used: if success { 120_000 } else { 45_000 },
            block_number: Some(1_000),
            log_count: if success { 3 } else { 0 },
        })
    }
}

/// Connector that hands out pre-built mock chains and records proxy choices
#[derive(Debug, Default)]
pub struct MockConnector {
    chains: Vec<Arc<MockChain>>,
    connections: Mutex<Vec<(usize, Option<String>)>>,
}

impl MockConnector {
    pub fn new(chains: Vec<Arc<MockChain>>) -> Self {
        Self {
            chains,
            connections: Mutex::new(Vec::new()),
        }
    }

    /// `(wallet index, proxy)` for every connect call
    pub fn connections(&self) -> Vec<(usize, Option<String>)> {
        self.connections.lock().unwrap().clone()
    }
}

impl ChainConnector for MockConnector {
    fn wallet_count(&self) -> usize {
        self.chains.len()
    }

    fn connect(
        &self,
        wallet_index: usize,
        proxy: Option<&str>,
    ) -> Result<Arc<dyn ChainPort>, ChainError> {
        self.connections
            .lock()
            .unwrap()
            .push((wallet_index, proxy.map(str::to_string)));

        self.chains
            .get(wallet_index)
            .cloned()
            .map(|chain| chain as Arc<dyn ChainPort>)
            .ok_or_else(|| ChainError::Rejected(format!("no wallet at index {}", wallet_index)))
    }
}

/// Prompt with a fixed answer that counts how often it was asked
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answer: String,
    calls: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SwapCountPrompt for ScriptedPrompt {
    fn ask(&self, _default: u32, _max: u32) -> io::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

use alloy::consensus::{SignableTransaction as _, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718 as _;
use alloy::network::ReceiptResponse as _;
use alloy::primitives::{Address, TxHash, TxKind, U256};
use alloy::providers::{Provider as _, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::signers::{local::PrivateKeySigner, SignerSync as _};
use alloy::transports::http::Http;
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use super::contracts::{IRouter, IERC20};
use crate::ports::{ChainError, ChainPort, ReceiptSummary, TxDescriptor};

/// Receipt polling interval
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid proxy '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Transport options shared by every wallet client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub request_timeout: Duration,
    pub receipt_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            receipt_timeout: Duration::from_secs(180),
        }
    }
}

/// JSON-RPC chain client bound to one signing key
pub struct EvmChainClient {
    provider: RootProvider,
    signer: PrivateKeySigner,
    receipt_timeout: Duration,
}

impl EvmChainClient {
    /// Connect to `rpc_url`, optionally through an HTTP proxy (`host:port` or a full URL)
    pub fn new(
        rpc_url: &Url,
        signer: PrivateKeySigner,
        proxy: Option<&str>,
        options: &ClientOptions,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder().timeout(options.request_timeout);

        if let Some(proxy) = proxy {
            let proxy_url = proxy_url(proxy);
            let proxy = reqwest::Proxy::all(&proxy_url).map_err(|e| ClientError::InvalidProxy {
                proxy: proxy_url.clone(),
                reason: e.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;
        let http = Http::with_client(client, rpc_url.clone());
        let provider = RootProvider::new(RpcClient::new(http, false));

        Ok(Self {
            provider,
            signer,
            receipt_timeout: options.receipt_timeout,
        })
    }

    fn sign(&self, tx: &TxDescriptor) -> Result<(TxHash, Vec<u8>), ChainError> {
        let legacy = TxLegacy {
            chain_id: Some(tx.chain_id),
            nonce: tx.nonce,
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            to: TxKind::Call(tx.to),
            value: tx.value,
            input: tx.data.clone(),
        };

        let hash = legacy.signature_hash();
        let signature = self
            .signer
            .sign_hash_sync(&hash)
            .map_err(|e| ChainError::Rejected(format!("signing failed: {}", e)))?;
        let signed = legacy.into_signed(signature);
        let tx_hash = *signed.hash();

        Ok((tx_hash, TxEnvelope::Legacy(signed).encoded_2718()))
    }
}

/// Proxies without a scheme are plain HTTP proxies
pub fn proxy_url(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

/// Map a JSON-RPC failure onto the structured error set. Node error payloads
/// are classified by code and message; anything without a payload is a
/// transport problem.
pub fn classify_rpc_error(err: &RpcError<TransportErrorKind>) -> ChainError {
    if let Some(payload) = err.as_error_resp() {
        return ChainError::from_rpc_payload(payload.code, &payload.message);
    }
    match err {
        RpcError::DeserError { .. } => ChainError::Decode(err.to_string()),
        _ => ChainError::Transport(err.to_string()),
    }
}

fn classify_contract_error(err: alloy::contract::Error) -> ChainError {
    match err {
        alloy::contract::Error::TransportError(e) => classify_rpc_error(&e),
        other => ChainError::Decode(other.to_string()),
    }
}

#[async_trait]
impl ChainPort for EvmChainClient {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(owner)
            .await
            .map_err(|e| classify_rpc_error(&e))
    }

    async fn gas_price(&self) -> Result<Option<u128>, ChainError> {
        let price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| classify_rpc_error(&e))?;
        Ok((price > 0).then_some(price))
    }

    async fn pending_nonce(&self, owner: Address) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count(owner)
            .pending()
            .await
            .map_err(|e| classify_rpc_error(&e))
    }

    async fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>, ChainError> {
        IRouter::new(router, &self.provider)
            .getAmountsOut(amount_in, path.to_vec())
            .call()
            .await
            .map_err(classify_contract_error)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError> {
        IERC20::new(token, &self.provider)
            .allowance(owner, spender)
            .call()
            .await
            .map_err(classify_contract_error)
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        IERC20::new(token, &self.provider)
            .balanceOf(owner)
            .call()
            .await
            .map_err(classify_contract_error)
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainError> {
        IERC20::new(token, &self.provider)
            .decimals()
            .call()
            .await
            .map_err(classify_contract_error)
    }

    async fn send_transaction(&self, tx: &TxDescriptor) -> Result<TxHash, ChainError> {
        let (tx_hash, raw) = self.sign(tx)?;
        self.provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| classify_rpc_error(&e))?;
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary, ChainError> {
        poll_receipt(tx_hash, self.receipt_timeout, RECEIPT_POLL_INTERVAL, || async move {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| classify_rpc_error(&e))?;
            Ok::<_, ChainError>(receipt.map(|receipt| ReceiptSummary {
                tx_hash,
                success: receipt.status(),
                gas_used: receipt.gas_used,
                block_number: receipt.block_number,
                log_count: receipt.inner.logs().len(),
            }))
        })
        .await
    }
}

/// Poll `fetch` until it yields a receipt or `timeout` runs out. Every poll
/// error is treated as transient.
pub async fn poll_receipt<T, F, Fut>(
    tx_hash: TxHash,
    timeout: Duration,
    interval: Duration,
    mut fetch: F,
) -> Result<T, ChainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ChainError>>,
{
    let start = Instant::now();
    loop {
        match fetch().await {
            Ok(Some(receipt)) => return Ok(receipt),
            Ok(None) => {}
            Err(e) => debug!("Receipt poll for {} failed, retrying: {}", tx_hash, e),
        }

        if start.elapsed() >= timeout {
            return Err(ChainError::Timeout(tx_hash.to_string()));
        }
        tokio::time::sleep(interval).await;
    }
}

use alloy::signers::local::PrivateKeySigner;
use std::sync::Arc;
use tracing::warn;
use url::Url;

use super::rpc::{ClientError, ClientOptions, EvmChainClient};
use crate::ports::{ChainConnector, ChainError, ChainPort};

/// Hands out one chain client per wallet, routed through the wallet's proxy
/// when one is assigned
pub struct EvmConnector {
    rpc_url: Url,
    signers: Vec<PrivateKeySigner>,
    options: ClientOptions,
}

impl EvmConnector {
    pub fn new(
        rpc_url: &str,
        signers: Vec<PrivateKeySigner>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let rpc_url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| ClientError::InvalidUrl(format!("{}: {}", rpc_url, e)))?;
        Ok(Self {
            rpc_url,
            signers,
            options,
        })
    }
}

impl ChainConnector for EvmConnector {
    fn wallet_count(&self) -> usize {
        self.signers.len()
    }

    fn connect(
        &self,
        wallet_index: usize,
        proxy: Option<&str>,
    ) -> Result<Arc<dyn ChainPort>, ChainError> {
        let signer = self
            .signers
            .get(wallet_index)
            .cloned()
            .ok_or_else(|| ChainError::Rejected(format!("no wallet at index {}", wallet_index)))?;

        if let Some(proxy) = proxy {
            match EvmChainClient::new(&self.rpc_url, signer.clone(), Some(proxy), &self.options) {
                Ok(client) => return Ok(Arc::new(client)),
                Err(e) => {
                    let shown: String = proxy.chars().take(20).collect();
                    warn!("Proxy fail: {}... -> direct ({})", shown, e);
                }
            }
        }

        EvmChainClient::new(&self.rpc_url, signer, None, &self.options)
            .map(|client| Arc::new(client) as Arc<dyn ChainPort>)
            .map_err(|e| ChainError::Transport(e.to_string()))
    }
}

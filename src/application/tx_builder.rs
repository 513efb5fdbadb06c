//! Transaction Builder
//!
//! Encodes router, token and wrapped-native calls into submission-ready
//! legacy transactions. The router's swap functions are addressed by fixed
//! selectors followed by the ABI-encoded argument tuple.

use alloy::primitives::{Address, Bytes, Selector, U256};
use alloy::sol_types::{SolCall, SolValue};
use std::time::Duration;

use super::settings::EngineSettings;
use crate::adapters::evm::contracts::{IWrappedNative, IERC20};
use crate::domain::SwapDirection;
use crate::ports::{ChainError, ChainPort, TxDescriptor};

/// One on-chain operation the engine can send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Native -> token through the router; `amount_in` is sent as value
    SwapNativeForTokens {
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
    },
    /// Token -> native through the router
    SwapTokensForNative {
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
    },
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    /// Wrapped native -> native
    Unwrap { amount: U256 },
    /// Native -> wrapped native
    Wrap { amount: U256 },
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::SwapNativeForTokens { .. } => "forward swap",
            Operation::SwapTokensForNative { .. } => "reverse swap",
            Operation::Approve { .. } => "approve",
            Operation::Unwrap { .. } => "unwrap",
            Operation::Wrap { .. } => "wrap",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    chain_id: u64,
    router: Address,
    wrapped_native: Address,
    forward_selector: Selector,
    reverse_selector: Selector,
    swap_gas_limit: u64,
    approve_gas_limit: u64,
    deadline: Duration,
}

impl TransactionBuilder {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            chain_id: settings.chain_id,
            router: settings.router,
            wrapped_native: settings.wrapped_native,
            forward_selector: settings.forward_selector,
            reverse_selector: settings.reverse_selector,
            swap_gas_limit: settings.swap_gas_limit,
            approve_gas_limit: settings.approve_gas_limit,
            deadline: settings.deadline,
        }
    }

    /// Unix deadline for a swap built now
    pub fn deadline_from_now(&self) -> U256 {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        U256::from(now + self.deadline.as_secs())
    }

    /// Calldata for `op`; `recipient` receives swap output
    pub fn calldata(&self, op: &Operation, recipient: Address, deadline: U256) -> Bytes {
        let data = match op {
            Operation::SwapNativeForTokens {
                amount_out_min,
                path,
                ..
            } => with_selector(
                self.forward_selector,
                (*amount_out_min, path.clone(), recipient, deadline).abi_encode_params(),
            ),
            Operation::SwapTokensForNative {
                amount_in,
                amount_out_min,
                path,
            } => with_selector(
                self.reverse_selector,
                (*amount_in, *amount_out_min, path.clone(), recipient, deadline)
                    .abi_encode_params(),
            ),
            Operation::Approve { spender, amount, .. } => IERC20::approveCall {
                spender: *spender,
                amount: *amount,
            }
            .abi_encode(),
            Operation::Unwrap { amount } => IWrappedNative::withdrawCall { amount: *amount }.abi_encode(),
            Operation::Wrap { .. } => IWrappedNative::depositCall {}.abi_encode(),
        };
        Bytes::from(data)
    }

    /// Assemble a transaction with an explicit nonce and deadline
    pub fn build_with_deadline(
        &self,
        op: &Operation,
        recipient: Address,
        gas_price: u128,
        nonce: u64,
        deadline: U256,
    ) -> TxDescriptor {
        let (to, value, gas_limit) = match op {
            Operation::SwapNativeForTokens { amount_in, .. } => {
                (self.router, *amount_in, self.swap_gas_limit)
            }
            Operation::SwapTokensForNative { .. } => (self.router, U256::ZERO, self.swap_gas_limit),
            Operation::Approve { token, .. } => (*token, U256::ZERO, self.approve_gas_limit),
            Operation::Unwrap { .. } => (self.wrapped_native, U256::ZERO, self.swap_gas_limit),
            Operation::Wrap { amount } => (self.wrapped_native, *amount, self.swap_gas_limit),
        };

        TxDescriptor {
            to,
            data: self.calldata(op, recipient, deadline),
            value,
            gas_limit,
            gas_price,
            nonce,
            chain_id: self.chain_id,
        }
    }

    pub fn build(&self, op: &Operation, recipient: Address, gas_price: u128, nonce: u64) -> TxDescriptor {
        self.build_with_deadline(op, recipient, gas_price, nonce, self.deadline_from_now())
    }

    /// Build with a nonce fetched fresh from the pending transaction count
    pub async fn assemble(
        &self,
        chain: &dyn ChainPort,
        op: &Operation,
        gas_price: u128,
    ) -> Result<TxDescriptor, ChainError> {
        let sender = chain.address();
        let nonce = chain.pending_nonce(sender).await?;
        Ok(self.build(op, sender, gas_price, nonce))
    }
}

fn with_selector(selector: Selector, params: Vec<u8>) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + params.len());
    data.extend_from_slice(selector.as_slice());
    data.extend_from_slice(&params);
    data
}

/// Decode `amountOutMin` from router swap calldata
pub fn decode_amount_out_min(data: &[u8], direction: SwapDirection) -> Option<U256> {
    let offset = match direction {
        SwapDirection::Forward => 4,
        SwapDirection::Reverse => 4 + 32,
    };
    data.get(offset..offset + 32).map(U256::from_be_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings::{DEFAULT_ROUTER, DEFAULT_WRAPPED_NATIVE, OPNT};
    use crate::ports::mocks::MockChain;
    use alloy::primitives::address;

    const WALLET: Address = address!("00000000000000000000000000000000000000aa");

    fn builder() -> TransactionBuilder {
        TransactionBuilder::new(&EngineSettings::default())
    }

    #[test]
    fn test_forward_calldata_layout() {
        let op = Operation::SwapNativeForTokens {
            amount_in: U256::from(1_000u64),
            amount_out_min: U256::from(950u64),
            path: vec![DEFAULT_WRAPPED_NATIVE, OPNT],
        };
        let tx = builder().build_with_deadline(&op, WALLET, 11, 4, U256::from(1_700_000_000u64));

        assert_eq!(&tx.data[..4], &[0xa2, 0x4f, 0xef, 0xef]);
        assert_eq!(tx.to, DEFAULT_ROUTER);
        assert_eq!(tx.value, U256::from(1_000u64));
        assert_eq!(tx.gas_limit, 300_000);
        assert_eq!(tx.nonce, 4);
        assert_eq!(tx.chain_id, 984);
        assert_eq!(
            decode_amount_out_min(&tx.data, SwapDirection::Forward),
            Some(U256::from(950u64))
        );

        let decoded = <(U256, Vec<Address>, Address, U256)>::abi_decode_params(&tx.data[4..]).unwrap();
        assert_eq!(decoded.1, vec![DEFAULT_WRAPPED_NATIVE, OPNT]);
        assert_eq!(decoded.2, WALLET);
        assert_eq!(decoded.3, U256::from(1_700_000_000u64));
    }

    #[test]
    fn test_reverse_calldata_layout() {
        let op = Operation::SwapTokensForNative {
            amount_in: U256::from(5_000u64),
            amount_out_min: U256::from(250u64),
            path: vec![OPNT, DEFAULT_WRAPPED_NATIVE],
        };
        let tx = builder().build_with_deadline(&op, WALLET, 11, 0, U256::from(1u8));

        assert_eq!(&tx.data[..4], &[0xe0, 0xf4, 0x4d, 0xf2]);
        assert_eq!(tx.value, U256::ZERO);
        assert_eq!(
            decode_amount_out_min(&tx.data, SwapDirection::Reverse),
            Some(U256::from(250u64))
        );

        let decoded =
            <(U256, U256, Vec<Address>, Address, U256)>::abi_decode_params(&tx.data[4..]).unwrap();
        assert_eq!(decoded.0, U256::from(5_000u64));
        assert_eq!(decoded.2, vec![OPNT, DEFAULT_WRAPPED_NATIVE]);
    }

    #[test]
    fn test_approve_and_unwrap_targets() {
        let approve = builder().build(
            &Operation::Approve {
                token: OPNT,
                spender: DEFAULT_ROUTER,
                amount: U256::from(9u8),
            },
            WALLET,
            15,
            1,
        );
        assert_eq!(approve.to, OPNT);
        assert_eq!(approve.gas_limit, 100_000);
        assert_eq!(&approve.data[..4], &[0x09, 0x5e, 0xa7, 0xb3]);

        let unwrap = builder().build(&Operation::Unwrap { amount: U256::from(9u8) }, WALLET, 15, 2);
        assert_eq!(unwrap.to, DEFAULT_WRAPPED_NATIVE);
        assert_eq!(&unwrap.data[..4], &[0x2e, 0x1a, 0x7d, 0x4d]);
        assert_eq!(unwrap.value, U256::ZERO);

        let wrap = builder().build(&Operation::Wrap { amount: U256::from(9u8) }, WALLET, 15, 3);
        assert_eq!(wrap.to, DEFAULT_WRAPPED_NATIVE);
        assert_eq!(wrap.value, U256::from(9u8));
        assert_eq!(wrap.data.len(), 4);
    }

    #[test]
    fn test_deadline_is_twenty_minutes_out() {
        let now = chrono::Utc::now().timestamp() as u64;
        let deadline = builder().deadline_from_now();
        assert!(deadline >= U256::from(now + 1_200));
        assert!(deadline <= U256::from(now + 1_205));
    }

    #[tokio::test]
    async fn test_assemble_uses_pending_nonce() {
        let chain = MockChain::new(WALLET).with_base_nonce(12);
        let tx = builder()
            .assemble(&chain, &Operation::Unwrap { amount: U256::from(1u8) }, 11)
            .await
            .unwrap();
        assert_eq!(tx.nonce, 12);
    }
}

//! EVM chain adapter backed by alloy
//!
//! One `EvmChainClient` per wallet: HTTP JSON-RPC (optionally proxied),
//! legacy transaction signing, and error classification at the RPC boundary.

pub mod contracts;
pub mod rpc;
pub mod connector;

pub use connector::EvmConnector;
pub use rpc::{ClientError, ClientOptions, EvmChainClient};

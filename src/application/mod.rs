//! Application Layer - Swap engine use cases
//!
//! - `gas_policy`, `quoter`, `tx_builder`: per-transaction building blocks
//! - `executor`: one swap end to end, with retry
//! - `wallet_cycle`: forward and reverse phases for one wallet
//! - `fleet`: wallet rotation and the endless cycle loop

pub mod settings;
pub mod gas_policy;
pub mod quoter;
pub mod tx_builder;
pub mod executor;
pub mod wallet_cycle;
pub mod fleet;

pub use settings::{DelayRange, EngineSettings, ScheduleSettings};
pub use gas_policy::GasPolicy;
pub use quoter::{Quote, SwapQuoter};
pub use tx_builder::{Operation, TransactionBuilder};
pub use executor::SwapExecutor;
pub use wallet_cycle::{SkipReason, WalletCycleScheduler, WalletOutcome};
pub use fleet::{FleetConfig, FleetCycleReport, FleetError, FleetScheduler};

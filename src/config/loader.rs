//! Configuration Loader
//!
//! Loads and validates configuration from TOML files. Every section is
//! optional and defaults to the OPN testnet production values, so an empty
//! file (or no file) is a valid configuration.

use alloy::primitives::{Address, Selector};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::application::settings::{
    self, DelayRange, EngineSettings, ScheduleSettings, DEFAULT_APPROVE_GAS_LIMIT,
    DEFAULT_CHAIN_ID, DEFAULT_DEADLINE_MINUTES, DEFAULT_ROUTER, DEFAULT_SWAP_GAS_LIMIT,
    DEFAULT_WRAPPED_NATIVE, FORWARD_SWAP_SELECTOR, REVERSE_SWAP_SELECTOR,
};
use crate::domain::{
    liquidity, sizing, to_base_units, ForwardSizing, GasBounds, LiquidityThresholds, PercentRange,
    ReverseSizing, SlippagePolicy, SwapPair, DEFAULT_MAX_ATTEMPTS, DEFAULT_SWAP_COUNT, GWEI,
    MAX_SWAP_COUNT,
};

/// Default config path looked up when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub contracts: ContractsSection,
    #[serde(default = "default_pair_entries")]
    pub pairs: Vec<PairEntry>,
    #[serde(default)]
    pub gas: GasSection,
    #[serde(default)]
    pub sizing: SizingSection,
    #[serde(default)]
    pub liquidity: LiquiditySection,
    #[serde(default)]
    pub execution: ExecutionSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub files: FilesSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkSection::default(),
            contracts: ContractsSection::default(),
            pairs: default_pair_entries(),
            gas: GasSection::default(),
            sizing: SizingSection::default(),
            liquidity: LiquiditySection::default(),
            execution: ExecutionSection::default(),
            schedule: ScheduleSection::default(),
            files: FilesSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

/// RPC endpoint configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    pub rpc_url: String,
    pub chain_id: u64,
    /// Prefix for transaction links in log lines
    pub explorer_url: String,
    /// How long to wait for one confirmation
    pub receipt_timeout_secs: u64,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            rpc_url: "https://testnet-rpc.iopn.tech/".to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            explorer_url: "https://testnet.iopn.tech/tx/".to_string(),
            receipt_timeout_secs: 180,
            request_timeout_secs: 30,
        }
    }
}

impl NetworkSection {
    /// Get RPC URL with environment variable override
    /// Checks RPC_URL env var first, falls back to config value
    pub fn get_rpc_url(&self) -> String {
        std::env::var("RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }
}

/// Contract addresses and router selectors
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContractsSection {
    pub router: Address,
    pub wrapped_native: Address,
    pub forward_selector: Selector,
    pub reverse_selector: Selector,
}

impl Default for ContractsSection {
    fn default() -> Self {
        Self {
            router: DEFAULT_ROUTER,
            wrapped_native: DEFAULT_WRAPPED_NATIVE,
            forward_selector: Selector::from(FORWARD_SWAP_SELECTOR),
            reverse_selector: Selector::from(REVERSE_SWAP_SELECTOR),
        }
    }
}

/// One `[[pairs]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct PairEntry {
    pub output: Address,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    18
}

fn default_pair_entries() -> Vec<PairEntry> {
    settings::default_pairs()
        .into_iter()
        .map(|p| PairEntry {
            output: p.output,
            symbol: p.symbol,
            decimals: p.decimals,
        })
        .collect()
}

/// Gas pricing in gwei, gas limits in units
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GasSection {
    pub base_gwei: u64,
    pub min_gwei: u64,
    pub max_gwei: u64,
    pub swap_gas_limit: u64,
    pub approve_gas_limit: u64,
}

impl Default for GasSection {
    fn default() -> Self {
        Self {
            base_gwei: 11,
            min_gwei: 10,
            max_gwei: 15,
            swap_gas_limit: DEFAULT_SWAP_GAS_LIMIT,
            approve_gas_limit: DEFAULT_APPROVE_GAS_LIMIT,
        }
    }
}

/// Swap sizing; percentages are fractions (0.01 = 1%), amounts in token units
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SizingSection {
    pub forward_percent: f64,
    pub forward_tolerance: f64,
    pub forward_floor: f64,
    pub min_native_balance: f64,
    pub reverse_percent: f64,
    pub reverse_tolerance: f64,
    pub dust_threshold: f64,
}

impl Default for SizingSection {
    fn default() -> Self {
        Self {
            forward_percent: sizing::DEFAULT_FORWARD_PERCENT,
            forward_tolerance: sizing::DEFAULT_FORWARD_TOLERANCE,
            forward_floor: sizing::DEFAULT_FORWARD_FLOOR,
            min_native_balance: sizing::DEFAULT_MIN_NATIVE_BALANCE,
            reverse_percent: sizing::DEFAULT_REVERSE_PERCENT,
            reverse_tolerance: sizing::DEFAULT_REVERSE_TOLERANCE,
            dust_threshold: sizing::DEFAULT_DUST_THRESHOLD,
        }
    }
}

/// Minimum quoted output, in base units
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LiquiditySection {
    pub min_liquidity_out: u64,
    pub reverse_min_liquidity_out: u64,
}

impl Default for LiquiditySection {
    fn default() -> Self {
        Self {
            min_liquidity_out: liquidity::DEFAULT_MIN_LIQUIDITY_OUT as u64,
            reverse_min_liquidity_out: liquidity::DEFAULT_REVERSE_MIN_LIQUIDITY_OUT as u64,
        }
    }
}

/// Retry and slippage policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionSection {
    /// Per mille of the quote kept on the first attempt
    pub slippage_first: u16,
    /// Per mille of the quote kept on a retry
    pub slippage_retry: u16,
    pub deadline_minutes: u64,
    pub max_attempts: u8,
}

impl Default for ExecutionSection {
    fn default() -> Self {
        Self {
            slippage_first: 950,
            slippage_retry: 500,
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Delays in seconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    pub swap_delay_min_secs: u64,
    pub swap_delay_max_secs: u64,
    pub wallet_delay_min_secs: u64,
    pub wallet_delay_max_secs: u64,
    pub settle_secs: u64,
    /// Rest after a full fleet pass (24h; 30 for debugging)
    pub cycle_rest_secs: u64,
    pub default_swap_count: u32,
    pub max_swap_count: u32,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            swap_delay_min_secs: 5,
            swap_delay_max_secs: 30,
            wallet_delay_min_secs: 10,
            wallet_delay_max_secs: 60,
            settle_secs: 3,
            cycle_rest_secs: 86_400,
            default_swap_count: DEFAULT_SWAP_COUNT,
            max_swap_count: MAX_SWAP_COUNT,
        }
    }
}

/// Credential and proxy list locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesSection {
    pub private_keys: String,
    pub proxies: String,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            private_keys: "private_keys.txt".to_string(),
            proxies: "proxies.txt".to_string(),
        }
    }
}

impl FilesSection {
    /// Key file path with `~` expanded
    pub fn private_keys_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.private_keys).to_string())
    }

    /// Proxy file path with `~` expanded
    pub fn proxies_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.proxies).to_string())
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly given config, or `config.toml` if present, or defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.rpc_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "rpc_url cannot be empty".to_string(),
            ));
        }

        if self.pairs.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[pairs]] entry is required".to_string(),
            ));
        }

        if self.gas.min_gwei > self.gas.max_gwei {
            return Err(ConfigError::ValidationError(format!(
                "min_gwei ({}) must not exceed max_gwei ({})",
                self.gas.min_gwei, self.gas.max_gwei
            )));
        }

        if self.sizing.forward_tolerance < 0.0
            || self.sizing.forward_tolerance >= self.sizing.forward_percent
        {
            return Err(ConfigError::ValidationError(format!(
                "forward_tolerance must be in [0, forward_percent), got {}",
                self.sizing.forward_tolerance
            )));
        }

        if self.sizing.reverse_tolerance < 0.0
            || self.sizing.reverse_tolerance >= self.sizing.reverse_percent
        {
            return Err(ConfigError::ValidationError(format!(
                "reverse_tolerance must be in [0, reverse_percent), got {}",
                self.sizing.reverse_tolerance
            )));
        }

        if self.sizing.forward_percent + self.sizing.forward_tolerance > 1.0
            || self.sizing.reverse_percent + self.sizing.reverse_tolerance > 1.0
        {
            return Err(ConfigError::ValidationError(
                "swap percentages must stay at or below 100% of balance".to_string(),
            ));
        }

        if self.execution.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_attempts must be > 0".to_string(),
            ));
        }

        if self.execution.slippage_first > 1000 || self.execution.slippage_retry > 1000 {
            return Err(ConfigError::ValidationError(
                "slippage factors are per mille and must be <= 1000".to_string(),
            ));
        }

        if self.schedule.swap_delay_min_secs > self.schedule.swap_delay_max_secs
            || self.schedule.wallet_delay_min_secs > self.schedule.wallet_delay_max_secs
        {
            return Err(ConfigError::ValidationError(
                "delay ranges must have min <= max".to_string(),
            ));
        }

        if self.schedule.max_swap_count == 0
            || self.schedule.default_swap_count == 0
            || self.schedule.default_swap_count > self.schedule.max_swap_count
        {
            return Err(ConfigError::ValidationError(format!(
                "default_swap_count must be in [1, {}], got {}",
                self.schedule.max_swap_count, self.schedule.default_swap_count
            )));
        }

        Ok(())
    }

    pub fn swap_pairs(&self) -> Vec<SwapPair> {
        self.pairs
            .iter()
            .map(|p| SwapPair::new(p.output, p.symbol.clone(), p.decimals))
            .collect()
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        EngineSettings {
            chain_id: config.network.chain_id,
            router: config.contracts.router,
            wrapped_native: config.contracts.wrapped_native,
            forward_selector: config.contracts.forward_selector,
            reverse_selector: config.contracts.reverse_selector,
            swap_gas_limit: config.gas.swap_gas_limit,
            approve_gas_limit: config.gas.approve_gas_limit,
            deadline: Duration::from_secs(config.execution.deadline_minutes * 60),
            max_attempts: config.execution.max_attempts,
            gas: GasBounds {
                base: config.gas.base_gwei as u128 * GWEI,
                min: config.gas.min_gwei as u128 * GWEI,
                max: config.gas.max_gwei as u128 * GWEI,
            },
            liquidity: LiquidityThresholds {
                forward: alloy::primitives::U256::from(config.liquidity.min_liquidity_out),
                reverse: alloy::primitives::U256::from(config.liquidity.reverse_min_liquidity_out),
            },
            slippage: SlippagePolicy {
                first_attempt: config.execution.slippage_first,
                retry: config.execution.slippage_retry,
            },
            forward_sizing: ForwardSizing {
                range: PercentRange::new(
                    config.sizing.forward_percent,
                    config.sizing.forward_tolerance,
                ),
                floor: to_base_units(config.sizing.forward_floor, 18),
                min_balance: to_base_units(config.sizing.min_native_balance, 18),
            },
            reverse_sizing: ReverseSizing {
                range: PercentRange::new(
                    config.sizing.reverse_percent,
                    config.sizing.reverse_tolerance,
                ),
                dust: config.sizing.dust_threshold,
            },
            explorer_url: config.network.explorer_url.clone(),
        }
    }
}

impl From<&Config> for ScheduleSettings {
    fn from(config: &Config) -> Self {
        let schedule = &config.schedule;
        ScheduleSettings {
            swap_delay: DelayRange::from_secs(schedule.swap_delay_min_secs, schedule.swap_delay_max_secs),
            wallet_delay: DelayRange::from_secs(
                schedule.wallet_delay_min_secs,
                schedule.wallet_delay_max_secs,
            ),
            settle_delay: Duration::from_secs(schedule.settle_secs),
            cycle_rest: Duration::from_secs(schedule.cycle_rest_secs),
            default_swap_count: schedule.default_swap_count,
            max_swap_count: schedule.max_swap_count,
        }
    }
}

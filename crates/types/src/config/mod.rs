// Path: crates/types/src/config/mod.rs

//! Configuration structures for an upgrade scenario (`scenario.toml`).
use crate::app::VoteOption;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The governance module's default minimum deposit, in base units of the chain denom.
pub const DEFAULT_MIN_DEPOSIT_TOKENS: u128 = 10_000_000;

/// Connection-independent facts about the target chain.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// The chain id, e.g. `simd-1`.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    /// The staking/fee denomination used for deposits.
    #[serde(default = "default_denom")]
    pub denom: String,
    /// The bech32 human-readable prefix of account addresses.
    #[serde(default = "default_bech32_prefix")]
    pub bech32_prefix: String,
}

fn default_chain_id() -> String {
    "simd-1".to_string()
}
fn default_denom() -> String {
    "stake".to_string()
}
fn default_bech32_prefix() -> String {
    "cosmos".to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            denom: default_denom(),
            bech32_prefix: default_bech32_prefix(),
        }
    }
}

/// How the store-code proposal is assembled and voted on.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProposalConfig {
    /// The proposal title.
    #[serde(default = "default_title")]
    pub title: String,
    /// The proposal summary.
    #[serde(default = "default_summary")]
    pub summary: String,
    /// Free-form proposal metadata.
    #[serde(default = "default_metadata")]
    pub metadata: String,
    /// Whether to submit on the expedited track.
    #[serde(default)]
    pub expedited: bool,
    /// Deposit amount in base units. When unset, the ledger's minimum deposit is queried.
    #[serde(default)]
    pub deposit: Option<u64>,
    /// Gas limit for the submission transaction.
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Pins the proposal id instead of reading it from the submission events.
    /// Only safe when submission ordering within the scenario is deterministic.
    #[serde(default)]
    pub proposal_id: Option<u64>,
    /// The option cast by the vote collaborator.
    #[serde(default = "default_vote_option")]
    pub vote_option: VoteOption,
    /// Whether to query the stored code after the proposal passes.
    #[serde(default = "default_verify_code")]
    pub verify_code: bool,
}

fn default_title() -> String {
    "title:e2e".to_string()
}
fn default_summary() -> String {
    "summary:e2e".to_string()
}
fn default_metadata() -> String {
    "metadata:e2e".to_string()
}
fn default_gas_limit() -> u64 {
    60_000_000
}
fn default_vote_option() -> VoteOption {
    VoteOption::Yes
}
fn default_verify_code() -> bool {
    true
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            summary: default_summary(),
            metadata: default_metadata(),
            expedited: false,
            deposit: None,
            gas_limit: default_gas_limit(),
            proposal_id: None,
            vote_option: default_vote_option(),
            verify_code: default_verify_code(),
        }
    }
}

/// The polling schedule used while waiting for the proposal to pass.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Total time budget in milliseconds.
    #[serde(default = "default_poll_timeout_ms")]
    pub timeout_ms: u64,
    /// Time between status queries in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

fn default_poll_timeout_ms() -> u64 {
    30_000
}
fn default_poll_interval_ms() -> u64 {
    5_000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_poll_timeout_ms(),
            interval_ms: default_poll_interval_ms(),
        }
    }
}

impl PollConfig {
    /// The total time budget.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The time between evaluations.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// The complete configuration of one upgrade scenario.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Path to the light-client contract artifact.
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,
    /// Target chain settings.
    #[serde(default)]
    pub chain: ChainConfig,
    /// Proposal settings.
    #[serde(default)]
    pub proposal: ProposalConfig,
    /// Polling schedule.
    #[serde(default)]
    pub poll: PollConfig,
}

fn default_artifact() -> PathBuf {
    PathBuf::from("artifacts/rollkit_ibc.wasm")
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            artifact: default_artifact(),
            chain: ChainConfig::default(),
            proposal: ProposalConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the driver relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.denom.is_empty() {
            return Err(ConfigError::Invalid("chain.denom must not be empty".into()));
        }
        if self.proposal.gas_limit == 0 {
            return Err(ConfigError::Invalid("proposal.gas_limit must be positive".into()));
        }
        if self.poll.timeout_ms == 0 || self.poll.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll.timeout_ms and poll.interval_ms must be positive".into(),
            ));
        }
        if self.poll.interval_ms > self.poll.timeout_ms {
            return Err(ConfigError::Invalid(format!(
                "poll.interval_ms ({}) exceeds poll.timeout_ms ({})",
                self.poll.interval_ms, self.poll.timeout_ms
            )));
        }
        Ok(())
    }
}

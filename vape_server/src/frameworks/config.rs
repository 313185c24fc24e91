use crate::domain::ChainContext;
use alloy::primitives::Address;
use serde::Deserialize;
use std::str::FromStr;
use std::{env, fmt, io, time::Duration};
use url::Url;

// Runtime/server settings, read from the environment with defaults.

const EMBEDDED_CHAINS: &str = include_str!("../../chains.toml");

pub fn http_port() -> u16 {
    env_or("VAPE_SERVER_PORT", 3000)
}

pub fn rpc_url() -> String {
    env::var("ETH_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string())
}

// Falls back to the read node, which works for dev nodes with unlocked accounts.
pub fn wallet_rpc_url() -> String {
    env::var("WALLET_RPC_URL").unwrap_or_else(|_| rpc_url())
}

pub fn rpc_timeout() -> Duration {
    Duration::from_millis(env_or("RPC_TIMEOUT_MS", 5000))
}

// The wallet answers only once a person has signed, so it gets minutes, not seconds.
pub fn wallet_timeout() -> Duration {
    Duration::from_millis(env_or("WALLET_TIMEOUT_MS", 300_000))
}

pub fn poll_interval() -> Duration {
    Duration::from_millis(env_or("POLL_INTERVAL_MS", 4000))
}

pub fn default_chain_id() -> u64 {
    env_or("DEFAULT_CHAIN_ID", 5)
}

pub fn chains_config_path() -> Option<String> {
    env::var("CHAINS_CONFIG").ok()
}

pub fn hit_lookback_blocks() -> u64 {
    env_or("HIT_LOOKBACK_BLOCKS", 5000)
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(env::var(key).ok(), default)
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: io::Error },
    Parse(toml::de::Error),
    InvalidUrl { value: String, reason: String },
    InvalidAddress { chain_id: u64, value: String },
    DuplicateChain(u64),
    EmptyChainTable,
    UnsupportedChain(u64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "failed to read {path}: {source}"),
            ConfigError::Parse(err) => write!(f, "invalid chain table: {err}"),
            ConfigError::InvalidUrl { value, reason } => write!(f, "invalid url {value}: {reason}"),
            ConfigError::InvalidAddress { chain_id, value } => {
                write!(f, "chain {chain_id} has invalid address {value}")
            }
            ConfigError::DuplicateChain(chain_id) => write!(f, "chain {chain_id} is listed twice"),
            ConfigError::EmptyChainTable => write!(f, "chain table has no chains"),
            ConfigError::UnsupportedChain(chain_id) => {
                write!(f, "chain {chain_id} has no deployment in the chain table")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for io::Error {
    fn from(err: ConfigError) -> Self {
        io::Error::other(err.to_string())
    }
}

// Validates an http(s) endpoint.
pub fn validate_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        value: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

#[derive(Debug, Deserialize)]
struct ChainFile {
    chains: Vec<ChainEntry>,
}

#[derive(Debug, Deserialize)]
struct ChainEntry {
    chain_id: u64,
    name: String,
    explorer_url: String,
    game_address: String,
    token_address: String,
}

impl ChainEntry {
    fn into_context(self) -> Result<ChainContext, ConfigError> {
        validate_url(&self.explorer_url)?;
        let chain_id = self.chain_id;
        let address = |raw: &str| {
            raw.parse::<Address>()
                .map_err(|_| ConfigError::InvalidAddress {
                    chain_id,
                    value: raw.to_string(),
                })
        };

        Ok(ChainContext {
            chain_id,
            game_address: address(&self.game_address)?,
            token_address: address(&self.token_address)?,
            name: self.name,
            explorer_url: self.explorer_url,
        })
    }
}

/// Deployments per chain id, loaded from `chains.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTable {
    chains: Vec<ChainContext>,
}

impl ChainTable {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let file: ChainFile = toml::from_str(raw).map_err(ConfigError::Parse)?;
        if file.chains.is_empty() {
            return Err(ConfigError::EmptyChainTable);
        }

        let mut chains: Vec<ChainContext> = Vec::with_capacity(file.chains.len());
        for entry in file.chains {
            let chain = entry.into_context()?;
            if chains.iter().any(|known| known.chain_id == chain.chain_id) {
                return Err(ConfigError::DuplicateChain(chain.chain_id));
            }
            chains.push(chain);
        }

        Ok(Self { chains })
    }

    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(EMBEDDED_CHAINS)
    }

    // CHAINS_CONFIG when set, the bundled table otherwise.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_string(),
                    source,
                })?;
                Self::parse(&raw)
            }
            None => Self::embedded(),
        }
    }

    pub fn get(&self, chain_id: u64) -> Option<&ChainContext> {
        self.chains.iter().find(|chain| chain.chain_id == chain_id)
    }

    /// Picks the active chain: the node's chain when it answered, the
    /// configured default otherwise.
    pub fn resolve(&self, detected: Option<u64>, default: u64) -> Result<ChainContext, ConfigError> {
        let chain_id = detected.unwrap_or(default);
        self.get(chain_id)
            .cloned()
            .ok_or(ConfigError::UnsupportedChain(chain_id))
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub rpc_url: String,
    pub wallet_rpc_url: String,
    pub rpc_timeout: Duration,
    pub wallet_timeout: Duration,
    pub poll_interval: Duration,
    pub default_chain_id: u64,
    pub chains: ChainTable,
    pub hit_lookback_blocks: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = rpc_url();
        let wallet_rpc_url = wallet_rpc_url();
        validate_url(&rpc_url)?;
        validate_url(&wallet_rpc_url)?;

        Ok(Self {
            rpc_url,
            wallet_rpc_url,
            rpc_timeout: rpc_timeout(),
            wallet_timeout: wallet_timeout(),
            poll_interval: poll_interval(),
            default_chain_id: default_chain_id(),
            chains: ChainTable::load(chains_config_path().as_deref())?,
            hit_lookback_blocks: hit_lookback_blocks(),
        })
    }
}

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Per destination chain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: String,
    pub block_chain: String,
    /// Minimum balance, in drops, the sender must keep on top of the payment.
    #[serde(default)]
    pub min_reserve_fee: Option<u64>,
    /// Ledger account reserve in drops.
    #[serde(default)]
    pub account_reserve: Option<u64>,
    /// Transaction fee in drops.
    #[serde(default)]
    pub default_fee: Option<u64>,
}

/// Process-scoped configuration, loaded once at start and shared by handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Skips the destination chain check so one adapter can serve test swaps.
    #[serde(default)]
    pub is_test_mode: bool,
    #[serde(default)]
    pub sign_with_private_key: bool,
    #[serde(default)]
    pub chains: HashMap<String, ChainConfig>,
    /// Hex private keys by chain ID, only read when `sign_with_private_key` is set.
    #[serde(default)]
    pub signer_private_keys: HashMap<String, String>,
}

impl RouterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RouterConfig = serde_json::from_str(json).context("Failed to parse router config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).with_context(|| format!("Failed to read router config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, chain) in &self.chains {
            if key != &chain.chain_id {
                bail!("chain config key {} does not match chain_id {}", key, chain.chain_id);
            }
            if chain.block_chain.is_empty() {
                bail!("chain {} has empty block_chain", key);
            }
            if self.sign_with_private_key && !self.signer_private_keys.contains_key(key) {
                bail!("sign_with_private_key is set but chain {} has no signer private key", key);
            }
        }
        Ok(())
    }

    pub fn chain(&self, chain_id: &str) -> Option<&ChainConfig> {
        self.chains.get(chain_id)
    }

    pub fn signer_private_key(&self, chain_id: &str) -> Option<&str> {
        self.signer_private_keys.get(chain_id).map(String::as_str)
    }
}

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ConfigError, read_toml};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub chain: ChainConfig,

    /// Without a wallet the node's first managed account signs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletConfig>,

    pub ipfs: IpfsConfig,

    #[serde(default)]
    pub submit: SubmitConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChainConfig {
    pub rpc_url: Url,

    /// Address of the deployed HotelBooking contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<Address>,

    /// Build artifact to look the contract address up in, by network id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WalletConfig {
    pub mnemonic: String,
    #[serde(default)]
    pub account_index: u32,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("mnemonic", &"<redacted>")
            .field("account_index", &self.account_index)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IpfsConfig {
    pub base_url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubmitConfig {
    /// Seconds to wait for a receipt.
    #[serde(default = "default_receipt_timeout")]
    pub receipt_timeout: u64,

    /// Seconds between receipt queries.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl SubmitConfig {
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            receipt_timeout: default_receipt_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_receipt_timeout() -> u64 {
    120
}

fn default_poll_interval() -> u64 {
    1
}

impl ClientConfig {
    pub async fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let cfg: Self = read_toml(path.as_ref()).await?;
        cfg.check()
            .map_err(|e| ConfigError(path.as_ref().into(), e.into()))?;
        Ok(cfg)
    }

    fn check(&self) -> Result<(), String> {
        match (&self.chain.contract, &self.chain.artifact) {
            (Some(_), Some(_)) => {
                return Err("chain.contract and chain.artifact are mutually exclusive".into());
            }
            (None, None) => return Err("one of chain.contract or chain.artifact is required".into()),
            _ => {}
        }
        if self.submit.poll_interval == 0 {
            return Err("submit.poll-interval must be positive".into());
        }
        Ok(())
    }
}

impl FromStr for ClientConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cfg: Self = toml::from_str(s).map_err(|e| ConfigError(PathBuf::new(), Box::new(e)))?;
        cfg.check().map_err(|e| ConfigError(PathBuf::new(), e.into()))?;
        Ok(cfg)
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = toml::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

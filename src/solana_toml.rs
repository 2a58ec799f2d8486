//! Data shapes of the `Solana.toml` project configuration file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_CONFIG_FILE: &str = "Solana.toml";
pub const DEFAULT_ACCOUNTS_DIR: &str = "accounts";
pub const DEFAULT_ACCOUNTS_DIR_TEMP: &str = ".cache/staging/accounts";
pub const DEFAULT_ACCOUNTS_DIR_LOADED: &str = ".cache/loaded/accounts";
pub const DEFAULT_KEYPAIR_PATH: &str = "~/.config/solana/id.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SolanaToml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone: Option<CloneSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Cluster for all operations. Unset means the Solana CLI's own cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<SolanaCluster>,
    /// Local directory for cloned accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_dir: Option<String>,
    /// Path to the local authority keypair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keypair: Option<String>,
    /// RPC URLs overriding the public endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Networks>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Networks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mainnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localnet: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SolanaCluster {
    Mainnet,
    MainnetBeta,
    Devnet,
    Testnet,
    Localhost,
    Localnet,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClonePolicy {
    Always,
    Prompt,
}

/// An on-chain program or account to copy into the local environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloneTarget {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Source cluster: a known cluster name or an RPC URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone: Option<ClonePolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenCloneTarget {
    #[serde(flatten)]
    pub target: CloneTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holders: Option<Vec<TokenHolder>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenHolder {
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
}

/// Clone rules keyed by a logical name within each category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CloneSection {
    #[serde(default)]
    pub program: BTreeMap<String, CloneTarget>,
    #[serde(default)]
    pub account: BTreeMap<String, CloneTarget>,
    #[serde(default)]
    pub token: BTreeMap<String, TokenCloneTarget>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CloneSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_clone: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<bool>,
}

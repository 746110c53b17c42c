//! Serde model for the community configuration document.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCommunityTheme {
    pub primary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCommunityProfile {
    pub address: Address,
    pub chain_id: u64,
}

/// Pointer to a contract entry keyed elsewhere in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCommunityToken {
    pub address: Address,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCommunity {
    pub name: String,
    pub description: String,
    pub url: String,
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    pub logo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ConfigCommunityTheme>,
    pub profile: ConfigCommunityProfile,
    pub primary_token: ConfigCommunityToken,
    pub primary_account_factory: ConfigCommunityToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_card_manager: Option<ConfigCommunityToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_session_manager: Option<ConfigCommunityToken>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigToken {
    pub standard: String,
    pub name: String,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigScan {
    pub url: String,
    pub name: String,
}

/// One account variant deployed on one chain, keyed by
/// `{chain_id}:{account_factory_address}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigAccount {
    pub chain_id: u64,
    pub entrypoint_address: Address,
    pub paymaster_address: Address,
    pub account_factory_address: Address,
    pub paymaster_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCard {
    pub chain_id: u64,
    pub address: Address,
    pub instance_id: String,
    #[serde(rename = "type")]
    pub card_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSession {
    pub chain_id: u64,
    pub provider_address: Address,
    pub module_address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigChainNode {
    pub url: String,
    pub ws_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigChain {
    pub id: u64,
    pub node: ConfigChainNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigIpfs {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPlugin {
    pub name: String,
    pub icon: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_mode: Option<String>,
}

/// The full community document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub community: ConfigCommunity,
    pub tokens: HashMap<String, ConfigToken>,
    pub scan: ConfigScan,
    pub accounts: HashMap<String, ConfigAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<HashMap<String, ConfigCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<HashMap<String, ConfigSession>>,
    pub chains: HashMap<String, ConfigChain>,
    pub ipfs: ConfigIpfs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<ConfigPlugin>>,
    pub config_location: String,
    pub version: u64,
}

//! Derived lookups over a community document.

use crate::error::ConfigError;
use crate::types::{
    Config, ConfigAccount, ConfigCard, ConfigChain, ConfigCommunity, ConfigIpfs, ConfigPlugin,
    ConfigScan, ConfigSession, ConfigToken,
};
use alloy_primitives::Address;
use std::collections::HashMap;

/// Account execution envelope used by a community's contract accounts.
///
/// `Plain` accounts execute actions through their own `execute` method;
/// `SafeModule` accounts are Safes executing through a module-authorized
/// `execTransactionFromModule` call. Picking the wrong envelope produces
/// calldata that reverts on-chain, not a client-side error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountVariant {
    Plain,
    SafeModule,
}

impl AccountVariant {
    /// Derive the variant from an account entry's paymaster type tag.
    pub fn from_paymaster_type(paymaster_type: &str) -> Self {
        match paymaster_type {
            "cw-safe" | "safe" => Self::SafeModule,
            _ => Self::Plain,
        }
    }
}

/// A community document plus the lookups derived from it.
///
/// Immutable for the process lifetime; constructed once from the deserialized
/// document and shared by reference.
#[derive(Debug, Clone)]
pub struct CommunityConfig {
    config: Config,
}

/// Map keys are `{chain_id}:{address}` with the address in whatever casing
/// the document author used.
fn lookup<'a, T>(map: &'a HashMap<String, T>, chain_id: u64, address: Address) -> Option<&'a T> {
    let key = format!("{chain_id}:{address}");
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        .map(|(_, v)| v)
}

impl CommunityConfig {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn primary_token(&self) -> Result<&ConfigToken, ConfigError> {
        let ptr = &self.config.community.primary_token;
        lookup(&self.config.tokens, ptr.chain_id, ptr.address)
            .ok_or_else(|| ConfigError::MissingToken(format!("{}:{}", ptr.chain_id, ptr.address)))
    }

    pub fn primary_network(&self) -> Result<&ConfigChain, ConfigError> {
        let chain_id = self.primary_token()?.chain_id;
        self.config
            .chains
            .get(&chain_id.to_string())
            .ok_or_else(|| ConfigError::MissingChain(chain_id.to_string()))
    }

    /// RPC endpoint scoped to the community paymaster.
    pub fn primary_rpc_url(&self) -> Result<String, ConfigError> {
        let node_url = &self.primary_network()?.node.url;
        let account = self.primary_account_config()?;
        Ok(format!("{node_url}/v1/rpc/{}", account.paymaster_address))
    }

    pub fn primary_account_config(&self) -> Result<&ConfigAccount, ConfigError> {
        let chain_id = self.primary_network()?.id;
        let factory = self.config.community.primary_account_factory.address;
        lookup(&self.config.accounts, chain_id, factory)
            .ok_or_else(|| ConfigError::MissingAccount(format!("{chain_id}:{factory}")))
    }

    /// Account entry for an explicit factory, falling back to the primary one.
    /// Used by voucher creation, where the factory can be overridden.
    pub fn account_config(&self, factory: Option<Address>) -> Result<&ConfigAccount, ConfigError> {
        match factory {
            Some(factory) => {
                let chain_id = self.primary_network()?.id;
                lookup(&self.config.accounts, chain_id, factory)
                    .ok_or_else(|| ConfigError::MissingAccount(format!("{chain_id}:{factory}")))
            }
            None => self.primary_account_config(),
        }
    }

    /// Envelope variant of the primary account entry.
    pub fn primary_account_variant(&self) -> Result<AccountVariant, ConfigError> {
        Ok(AccountVariant::from_paymaster_type(
            &self.primary_account_config()?.paymaster_type,
        ))
    }

    pub fn primary_session_config(&self) -> Result<&ConfigSession, ConfigError> {
        let ptr = self
            .config
            .community
            .primary_session_manager
            .as_ref()
            .ok_or(ConfigError::MissingSession)?;
        let sessions = self.config.sessions.as_ref().ok_or(ConfigError::MissingSession)?;
        lookup(sessions, ptr.chain_id, ptr.address).ok_or(ConfigError::MissingSession)
    }

    pub fn primary_card_config(&self) -> Result<&ConfigCard, ConfigError> {
        let ptr = self
            .config
            .community
            .primary_card_manager
            .as_ref()
            .ok_or(ConfigError::MissingCards)?;
        let cards = self.config.cards.as_ref().ok_or(ConfigError::MissingCards)?;
        lookup(cards, ptr.chain_id, ptr.address).ok_or(ConfigError::MissingCards)
    }

    /// Public URL of the community app, custom domain taking precedence.
    pub fn community_url(&self) -> String {
        match &self.config.community.custom_domain {
            Some(domain) => format!("https://{domain}"),
            None => {
                let base = dotenvy::var("BASE_DOMAIN")
                    .unwrap_or_else(|_| "commonswallet.org".to_string());
                format!("https://{}.{base}", self.config.community.alias)
            }
        }
    }

    pub const fn community(&self) -> &ConfigCommunity {
        &self.config.community
    }

    pub const fn tokens(&self) -> &HashMap<String, ConfigToken> {
        &self.config.tokens
    }

    pub const fn scan(&self) -> &ConfigScan {
        &self.config.scan
    }

    pub const fn accounts(&self) -> &HashMap<String, ConfigAccount> {
        &self.config.accounts
    }

    pub const fn chains(&self) -> &HashMap<String, ConfigChain> {
        &self.config.chains
    }

    pub const fn ipfs(&self) -> &ConfigIpfs {
        &self.config.ipfs
    }

    pub fn plugins(&self) -> Option<&[ConfigPlugin]> {
        self.config.plugins.as_deref()
    }

    pub fn config_location(&self) -> &str {
        &self.config.config_location
    }

    pub const fn version(&self) -> u64 {
        self.config.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CommunityConfig {
        let raw = r#"{
            "community": {
                "name": "Test Community",
                "description": "A test community",
                "url": "https://test.commonswallet.org",
                "alias": "test",
                "logo": "https://test.commonswallet.org/logo.png",
                "profile": { "address": "0x6872b14B11B127B8fD3ccB9e1A43fA92Bf2F6564", "chain_id": 137 },
                "primary_token": { "address": "0x8f8b1972eBf05D90E4E2B882A647A7C9eb3A4C29", "chain_id": 137 },
                "primary_account_factory": { "address": "0x940e47a0BFD36e125BBa3Ced1a9a0e965F0b6A06", "chain_id": 137 },
                "primary_session_manager": { "address": "0xE544c1dd8bcC27a412Ce2c21406a35F544F99035", "chain_id": 137 }
            },
            "tokens": {
                "137:0x8f8b1972ebf05d90e4e2b882a647a7c9eb3a4c29": {
                    "standard": "ERC20",
                    "name": "Test Token",
                    "address": "0x8f8b1972eBf05D90E4E2B882A647A7C9eb3A4C29",
                    "symbol": "TST",
                    "decimals": 6,
                    "chain_id": 137
                }
            },
            "scan": { "url": "https://polygonscan.com", "name": "Polygonscan" },
            "accounts": {
                "137:0x940e47a0bfd36e125bba3ced1a9a0e965f0b6a06": {
                    "chain_id": 137,
                    "entrypoint_address": "0xB8E2f3b1bcBD1787ed0eb14E25480f5D6E97eAbc",
                    "paymaster_address": "0x4E51552731aedCd70D725E4712A310Ae154D1E24",
                    "account_factory_address": "0x940e47a0BFD36e125BBa3Ced1a9a0e965F0b6A06",
                    "paymaster_type": "cw"
                }
            },
            "sessions": {
                "137:0xe544c1dd8bcc27a412ce2c21406a35f544f99035": {
                    "chain_id": 137,
                    "provider_address": "0x1dB0A6F5a7E5b74D0b0DAb6e41E0520e1f73e9d7",
                    "module_address": "0xE544c1dd8bcC27a412Ce2c21406a35F544F99035"
                }
            },
            "chains": {
                "137": { "id": 137, "node": { "url": "https://137.engine.test.org", "ws_url": "wss://137.engine.test.org" } }
            },
            "ipfs": { "url": "https://ipfs.internal.test.org" },
            "config_location": "https://config.test.org/test.json",
            "version": 4
        }"#;
        CommunityConfig::new(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn resolves_primary_entries() {
        let config = sample();
        assert_eq!(config.primary_token().unwrap().decimals, 6);
        assert_eq!(config.primary_network().unwrap().id, 137);
        assert_eq!(
            config.primary_rpc_url().unwrap(),
            "https://137.engine.test.org/v1/rpc/0x4E51552731aedCd70D725E4712A310Ae154D1E24"
        );
        assert_eq!(config.primary_account_variant().unwrap(), AccountVariant::Plain);
        assert!(config.primary_session_config().is_ok());
    }

    #[test]
    fn missing_cards_is_a_lookup_error() {
        let config = sample();
        assert!(matches!(config.primary_card_config(), Err(ConfigError::MissingCards)));
    }

    #[test]
    fn safe_paymaster_type_selects_safe_module_variant() {
        assert_eq!(
            AccountVariant::from_paymaster_type("cw-safe"),
            AccountVariant::SafeModule
        );
        assert_eq!(AccountVariant::from_paymaster_type("cw"), AccountVariant::Plain);
    }
}

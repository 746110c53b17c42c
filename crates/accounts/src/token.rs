//! Best-effort token metadata reads.

use crate::provider::{community_provider, view};
use cw_config::CommunityConfig;
use cw_core::abi::erc20;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct TokenMetadata {
    pub decimals: Option<u8>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

pub async fn get_token_decimals(config: &CommunityConfig) -> Option<u8> {
    let result = async {
        let provider = community_provider(config)?;
        let token = config.primary_token()?.address;
        view(&provider, token, erc20::decimalsCall {}).await
    }
    .await;
    match result {
        Ok(decimals) => Some(decimals),
        Err(e) => {
            warn!(error = %e, "failed to fetch token decimals");
            None
        }
    }
}

pub async fn get_token_name(config: &CommunityConfig) -> Option<String> {
    let result = async {
        let provider = community_provider(config)?;
        let token = config.primary_token()?.address;
        view(&provider, token, erc20::nameCall {}).await
    }
    .await;
    match result {
        Ok(name) => Some(name),
        Err(e) => {
            warn!(error = %e, "failed to fetch token name");
            None
        }
    }
}

pub async fn get_token_symbol(config: &CommunityConfig) -> Option<String> {
    let result = async {
        let provider = community_provider(config)?;
        let token = config.primary_token()?.address;
        view(&provider, token, erc20::symbolCall {}).await
    }
    .await;
    match result {
        Ok(symbol) => Some(symbol),
        Err(e) => {
            warn!(error = %e, "failed to fetch token symbol");
            None
        }
    }
}

pub async fn get_token_metadata(config: &CommunityConfig) -> TokenMetadata {
    TokenMetadata {
        decimals: get_token_decimals(config).await,
        name: get_token_name(config).await,
        symbol: get_token_symbol(config).await,
    }
}

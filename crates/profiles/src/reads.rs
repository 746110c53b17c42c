//! Registry lookups. Best-effort: a missing profile or an unreachable node
//! resolves to `None`, with unexpected failures logged.

use crate::error::ProfileError;
use crate::types::{Profile, ProfileWithTokenId, format_profile_image_links};
use alloy_primitives::{Address, U256};
use cw_accounts::{community_provider, view};
use cw_config::CommunityConfig;
use cw_core::abi::profile;
use cw_core::text::format_username_bytes32;
use tracing::warn;

/// Fetch and decode the profile JSON behind a token URI. Bare cids and
/// `ipfs://` URIs resolve through the community's gateway.
async fn download_profile(ipfs_url: &str, uri: &str) -> Result<Profile, ProfileError> {
    let url = if uri.starts_with("http") {
        uri.to_string()
    } else {
        format!("{}/{}", ipfs_url.trim_end_matches('/'), uri.trim_start_matches("ipfs://"))
    };
    Ok(reqwest::get(url).await?.error_for_status()?.json().await?)
}

/// Raw token URI for a registry id, without downloading the document.
pub async fn get_profile_uri_from_id(config: &CommunityConfig, id: U256) -> Option<String> {
    let result = async {
        let provider = community_provider(config)?;
        let contract = config.community().profile.address;
        view(&provider, contract, profile::tokenURICall { tokenId: id }).await
    }
    .await;
    match result {
        Ok(uri) => Some(uri),
        Err(e) => {
            warn!(id = %id, error = %e, "failed to fetch profile uri");
            None
        }
    }
}

pub async fn get_profile_from_id(config: &CommunityConfig, id: U256) -> Option<ProfileWithTokenId> {
    let result = async {
        let provider = community_provider(config)?;
        let contract = config.community().profile.address;
        let owner = view(&provider, contract, profile::fromIdToAddressCall { id }).await?;
        if owner == Address::ZERO {
            return Err(ProfileError::NotFound);
        }
        let uri = view(&provider, contract, profile::tokenURICall { tokenId: id }).await?;
        let fetched = download_profile(&config.ipfs().url, &uri).await?;
        Ok(ProfileWithTokenId {
            profile: format_profile_image_links(&config.ipfs().url, fetched),
            token_id: id,
        })
    }
    .await;
    match result {
        Ok(found) => Some(found),
        Err(ProfileError::NotFound) => None,
        Err(e) => {
            warn!(id = %id, error = %e, "failed to fetch profile");
            None
        }
    }
}

pub async fn get_profile_from_address(
    config: &CommunityConfig,
    address: Address,
) -> Option<ProfileWithTokenId> {
    let result = async {
        let provider = community_provider(config)?;
        let contract = config.community().profile.address;
        let id =
            view(&provider, contract, profile::fromAddressToIdCall { profile: address }).await?;
        if id == U256::ZERO {
            return Err(ProfileError::NotFound);
        }
        Ok(id)
    }
    .await;
    match result {
        Ok(id) => get_profile_from_id(config, id).await,
        Err(ProfileError::NotFound) => None,
        Err(e) => {
            warn!(address = %address, error = %e, "failed to resolve profile id");
            None
        }
    }
}

pub async fn get_profile_from_username(
    config: &CommunityConfig,
    username: &str,
) -> Option<ProfileWithTokenId> {
    let result = async {
        let provider = community_provider(config)?;
        let contract = config.community().profile.address;
        let encoded = format_username_bytes32(username)?;
        let uri =
            view(&provider, contract, profile::getFromUsernameCall { username: encoded }).await?;
        if uri.is_empty() {
            return Err(ProfileError::NotFound);
        }
        let fetched = download_profile(&config.ipfs().url, &uri).await?;
        let id = view(&provider, contract, profile::fromAddressToIdCall {
            profile: fetched.account,
        })
        .await?;
        Ok(ProfileWithTokenId {
            profile: format_profile_image_links(&config.ipfs().url, fetched),
            token_id: id,
        })
    }
    .await;
    match result {
        Ok(found) => Some(found),
        Err(ProfileError::NotFound) => None,
        Err(e) => {
            warn!(username = %username, error = %e, "failed to fetch profile by username");
            None
        }
    }
}

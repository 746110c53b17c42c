//! Profile create/update/delete workflows: pin content to IPFS, write the
//! registry through the sponsored user-operation pipeline, then clean up
//! content the update superseded.

use crate::error::ProfileError;
use crate::pin::Pinner;
use crate::reads::{get_profile_from_address, get_profile_uri_from_id};
use crate::types::{Profile, ProfileWithTokenId, cid_from_uri, format_profile_image_links};
use alloy_primitives::{Address, B256, U256};
use alloy_signer::Signer;
use cw_bundler::BundlerService;
use cw_config::CommunityConfig;
use futures::future::join_all;
use tracing::warn;

/// Placeholder avatar used when no images are uploaded.
pub const DEFAULT_PROFILE_IMAGE_IPFS_HASH: &str =
    "bafkreigngxh4cwk7nwbnipxwlo6kko4w3fokgkskqz2uhtdtjm73d6ddme";

#[derive(Debug, Clone)]
pub struct ProfileMetadata {
    pub username: String,
    /// Defaults to the username when absent.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Username of the profile this one derives from, carried through to
    /// the pinned document.
    pub parent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Avatar renditions. Only `large` is required; missing sizes are pinned
/// from the large image.
#[derive(Debug, Clone)]
pub struct ProfileImages {
    pub small: Option<ProfileImage>,
    pub medium: Option<ProfileImage>,
    pub large: ProfileImage,
}

async fn pin_image<P: Pinner>(pinner: &P, image: &ProfileImage) -> Result<String, ProfileError> {
    let cid = pinner.pin_file(image.name.clone(), image.bytes.clone()).await?;
    Ok(format!("ipfs://{cid}"))
}

/// Unpin the document and images of a profile that is being replaced or
/// deleted. Failures are logged and tolerated; the shared default image is
/// never unpinned.
async fn unpin_superseded<P: Pinner>(
    config: &CommunityConfig,
    pinner: &P,
    existing: &ProfileWithTokenId,
) {
    if let Some(uri) = get_profile_uri_from_id(config, existing.token_id).await
        && let Err(e) = pinner.unpin(cid_from_uri(&uri).to_string()).await
    {
        warn!(error = %e, "failed to unpin superseded profile document");
    }

    let cids: Vec<String> =
        [&existing.profile.image_small, &existing.profile.image_medium, &existing.profile.image]
            .into_iter()
            .map(|uri| cid_from_uri(uri).to_string())
            .filter(|cid| cid != DEFAULT_PROFILE_IMAGE_IPFS_HASH)
            .collect();
    let results = join_all(cids.iter().map(|cid| pinner.unpin(cid.clone()))).await;
    for (cid, result) in cids.iter().zip(results) {
        if let Err(e) = result {
            warn!(cid = %cid, error = %e, "failed to unpin superseded image");
        }
    }
}

/// Create or update the profile for `account`, signed by the community
/// backend key behind `signer`. Returns the submission hash.
pub async fn upsert_profile<P: Pinner, S: Signer + Sync>(
    config: &CommunityConfig,
    signer: &S,
    pinner: &P,
    account: Address,
    metadata: &ProfileMetadata,
    images: Option<&ProfileImages>,
) -> Result<B256, ProfileError> {
    let existing = get_profile_from_address(config, account).await;
    let sender = cw_accounts::get_account_address(config, signer.address(), U256::ZERO)
        .await
        .ok_or(ProfileError::AccountResolution)?;

    let default_image = format!("ipfs://{DEFAULT_PROFILE_IMAGE_IPFS_HASH}");
    let (image_small, image_medium, image) = match images {
        Some(images) => (
            pin_image(pinner, images.small.as_ref().unwrap_or(&images.large)).await?,
            pin_image(pinner, images.medium.as_ref().unwrap_or(&images.large)).await?,
            pin_image(pinner, &images.large).await?,
        ),
        None => (default_image.clone(), default_image.clone(), default_image),
    };

    let profile = Profile {
        account,
        username: metadata.username.to_lowercase(),
        name: metadata.name.clone().unwrap_or_else(|| metadata.username.clone()),
        description: metadata.description.clone().unwrap_or_default(),
        image,
        image_medium,
        image_small,
        parent: metadata.parent.clone(),
    };

    let document = format_profile_image_links(&config.ipfs().url, profile.clone());
    let cid = pinner
        .pin_json(format!("{}.json", profile.username), serde_json::to_value(&document)?)
        .await?;

    if let Some(existing) = existing {
        unpin_superseded(config, pinner, &existing).await;
    }

    let bundler = BundlerService::new(config)?;
    Ok(bundler.set_profile(signer, sender, account, &profile.username, &cid).await?)
}

/// Unpin a profile's content and burn its registry entry. Returns `None`
/// when no profile is registered for `account`.
pub async fn delete_profile<P: Pinner, S: Signer + Sync>(
    config: &CommunityConfig,
    signer: &S,
    pinner: &P,
    account: Address,
) -> Result<Option<B256>, ProfileError> {
    let Some(existing) = get_profile_from_address(config, account).await else {
        return Ok(None);
    };
    let sender = cw_accounts::get_account_address(config, signer.address(), U256::ZERO)
        .await
        .ok_or(ProfileError::AccountResolution)?;

    unpin_superseded(config, pinner, &existing).await;

    let bundler = BundlerService::new(config)?;
    Ok(Some(bundler.burn_profile(signer, sender, account).await?))
}

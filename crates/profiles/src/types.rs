//! The profile document stored on IPFS and referenced by the registry.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Profile metadata as pinned to IPFS. Image fields hold either an
/// `ipfs://` URI or a resolved gateway URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub account: Address,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    pub image_medium: String,
    pub image_small: String,
    /// Username of the profile this one was derived from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// A profile joined with its registry token id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileWithTokenId {
    #[serde(flatten)]
    pub profile: Profile,
    pub token_id: U256,
}

/// Rewrite `ipfs://` image URIs to gateway URLs under `ipfs_url`.
/// Already-resolved URLs pass through unchanged.
pub fn format_profile_image_links(ipfs_url: &str, mut profile: Profile) -> Profile {
    let base = ipfs_url.trim_end_matches('/');
    for image in [&mut profile.image_small, &mut profile.image_medium, &mut profile.image] {
        if let Some(cid) = image.strip_prefix("ipfs://") {
            *image = format!("{base}/{cid}");
        }
    }
    profile
}

/// Bare content id of a pinned URI: the last path segment, whether the
/// input is `ipfs://cid`, a gateway URL or already a bare cid.
pub fn cid_from_uri(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri)
}

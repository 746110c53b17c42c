//! Bearer vouchers.
//!
//! A voucher is a link embedding a fresh private key plus display metadata.
//! The derived counterfactual account is where the voucher's funds live;
//! whoever holds the link holds the key, and can spend them. There is no
//! revocation: secrecy of the link is the entire access control.

use alloy_primitives::{Address, B256, U256, hex};
use alloy_signer_local::PrivateKeySigner;
use cw_accounts::get_account_address_with_factory;
use cw_config::CommunityConfig;
use cw_core::{compress, decompress};
use tracing::info;
use url::Url;

use crate::error::LinkError;

const KEY_VERSION_TAG: &str = "v2-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voucher {
    pub alias: String,
    pub creator: Address,
    pub account: Address,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CreatedVoucher {
    pub link: String,
    pub account: Address,
}

/// Encode a private key for embedding: hex without the `0x` prefix, minus a
/// leading zero byte when present, behind the version tag. `decode_key`
/// restores the full width, so the strip is lossless.
fn encode_key(key: B256) -> String {
    let mut encoded = hex::encode(key);
    if let Some(stripped) = encoded.strip_prefix("00") {
        encoded = stripped.to_string();
    }
    format!("{KEY_VERSION_TAG}{encoded}")
}

fn decode_key(tagged: &str) -> Result<B256, LinkError> {
    let encoded = tagged.strip_prefix(KEY_VERSION_TAG).ok_or(LinkError::InvalidVoucher)?;
    if encoded.len() > 64 {
        return Err(LinkError::InvalidVoucher);
    }
    let padded = format!("{encoded:0>64}");
    padded.parse::<B256>().map_err(|_| LinkError::InvalidVoucher)
}

/// Create a voucher link for a freshly generated signer. Derives the
/// counterfactual account from the factory but writes nothing on-chain; the
/// voucher only becomes spendable once someone funds the account.
pub async fn create_voucher(
    config: &CommunityConfig,
    name: &str,
    creator: Address,
    signer: &PrivateKeySigner,
    factory_override: Option<Address>,
) -> Result<CreatedVoucher, LinkError> {
    let account =
        get_account_address_with_factory(config, signer.address(), U256::ZERO, factory_override)
            .await
            .ok_or(LinkError::AccountResolution)?;

    let alias = &config.community().alias;
    let params: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("alias", alias)
        .append_pair("creator", &creator.to_checksum(None))
        .append_pair("account", &account.to_checksum(None))
        .append_pair("name", name)
        .finish();
    let compressed_params = compress(&params)?;
    let compressed_key = compress(&encode_key(signer.to_bytes()))?;

    let link = format!(
        "{}/#/?voucher={compressed_key}&params={compressed_params}",
        config.community_url()
    );
    info!(account = %account, "voucher created");
    Ok(CreatedVoucher { link, account })
}

/// Reconstruct the signer and metadata from a voucher link.
pub fn parse_voucher(data: &str) -> Result<(Voucher, PrivateKeySigner), LinkError> {
    let url = Url::parse(&data.replace("#/", ""))?;
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };

    let compressed_key = param("voucher").ok_or(LinkError::InvalidVoucher)?;
    let key = decode_key(&decompress(&compressed_key)?)?;
    let signer = PrivateKeySigner::from_bytes(&key).map_err(|_| LinkError::InvalidVoucher)?;

    let compressed_params = param("params").ok_or(LinkError::InvalidVoucher)?;
    let decoded = decompress(&compressed_params)?;
    let pairs: Vec<(String, String)> =
        url::form_urlencoded::parse(decoded.trim_start_matches('?').as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
    let field = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };

    let alias = field("alias").ok_or(LinkError::InvalidVoucher)?;
    let creator = field("creator")
        .and_then(|v| v.parse::<Address>().ok())
        .ok_or(LinkError::InvalidVoucher)?;
    let account = field("account")
        .and_then(|v| v.parse::<Address>().ok())
        .ok_or(LinkError::InvalidVoucher)?;
    let name = field("name").unwrap_or_else(|| "Voucher".to_string());

    Ok((Voucher { alias, creator, account, name }, signer))
}

//! Receive-link generation.

use alloy_primitives::Address;
use cw_config::CommunityConfig;
use cw_core::compress;
use url::Url;

use crate::error::LinkError;

/// Optional tip rider on a receive link, e.g. for venues that split the
/// payment between a till account and staff.
#[derive(Debug, Clone)]
pub struct Tip {
    pub to: Address,
    pub amount: String,
    pub description: Option<String>,
}

/// Current receive link form: `sendto={account}@{alias}` plus optional
/// amount, description and tip fields.
pub fn generate_receive_link(
    base_url: &str,
    config: &CommunityConfig,
    account: Address,
    amount: Option<&str>,
    description: Option<&str>,
    tip: Option<&Tip>,
) -> Result<String, LinkError> {
    let alias = &config.community().alias;
    let mut url = Url::parse(base_url)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("alias", alias);
        pairs.append_pair("sendto", &format!("{}@{alias}", account.to_checksum(None)));
        if let Some(amount) = amount {
            pairs.append_pair("amount", amount);
        }
        if let Some(description) = description {
            pairs.append_pair("description", description);
        }
        if let Some(tip) = tip {
            pairs.append_pair("tipTo", &tip.to.to_checksum(None));
            pairs.append_pair("tipAmount", &tip.amount);
            if let Some(tip_description) = &tip.description {
                pairs.append_pair("tipDescription", tip_description);
            }
        }
    }
    Ok(url.into())
}

/// Legacy receive link: the whole parameter set compressed into a single
/// `receiveParams` value behind a `#/` fragment. Still emitted for QR codes
/// scanned by older app versions.
pub fn generate_legacy_receive_link(
    base_url: &str,
    config: &CommunityConfig,
    account: Address,
    amount: Option<&str>,
    description: Option<&str>,
) -> Result<String, LinkError> {
    let alias = &config.community().alias;
    let mut receive_params = format!("?address={}&alias={alias}", account.to_checksum(None));
    if let Some(amount) = amount {
        receive_params.push_str(&format!("&amount={amount}"));
    }
    if let Some(description) = description {
        receive_params.push_str(&format!("&message={description}"));
    }
    let compressed = compress(&receive_params)?;
    Ok(format!("{base_url}/#/?alias={alias}&receiveParams={compressed}"))
}

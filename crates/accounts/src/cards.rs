//! Card manager reads: counterfactual card addresses and instance owners.

use alloy_primitives::{Address, B256};
use cw_config::CommunityConfig;
use cw_core::abi::card_manager;
use cw_core::text::hash_identifier;
use tracing::warn;

use crate::provider::{community_provider, view};

/// Counterfactual address of the card identified by `hashed_serial` within
/// the community's card instance. Callers hash the raw serial themselves,
/// so NFC serials never leave the device.
pub async fn get_card_address(config: &CommunityConfig, hashed_serial: B256) -> Option<Address> {
    let result = async {
        let provider = community_provider(config)?;
        let card = config.primary_card_config()?;
        let instance_id = hash_identifier(&card.instance_id);
        view(
            &provider,
            card.address,
            card_manager::getCardAddressCall { instanceId: instance_id, hashedSerial: hashed_serial },
        )
        .await
    }
    .await;
    match result {
        Ok(address) => Some(address),
        Err(e) => {
            warn!(error = %e, "failed to fetch card address");
            None
        }
    }
}

/// Owner of the community's card instance, if one has been created.
pub async fn get_instance_owner(config: &CommunityConfig) -> Option<Address> {
    let result = async {
        let provider = community_provider(config)?;
        let card = config.primary_card_config()?;
        let instance_id = hash_identifier(&card.instance_id);
        view(&provider, card.address, card_manager::instanceOwnerCall { instanceId: instance_id }).await
    }
    .await;
    match result {
        Ok(owner) => Some(owner),
        Err(e) => {
            warn!(error = %e, "failed to fetch card instance owner");
            None
        }
    }
}

//! Account address resolution, ownership verification and the thin
//! read-only accessors. Reads here are best-effort: failures are logged and
//! surfaced as `None`/`false`, since a missing profile or an unreachable
//! node is an expected, non-exceptional outcome for a lookup.

mod cards;
mod error;
mod provider;
mod token;

pub use cards::{get_card_address, get_instance_owner};
pub use error::ViewError;
pub use provider::{community_provider, view};
pub use token::{TokenMetadata, get_token_decimals, get_token_metadata, get_token_name, get_token_symbol};

use alloy_primitives::{Address, B256, Bytes, Signature, U256};
use alloy_provider::Provider;
use cw_config::CommunityConfig;
use cw_core::abi::{access, account, erc20, factory, safe};
use tracing::warn;

/// EIP-1271 magic value returned by `isValidSignature` on success.
const EIP1271_MAGIC: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Counterfactual contract-account address for an owner key, from the
/// primary account factory. Best-effort; `None` when the node is unreachable.
pub async fn get_account_address(
    config: &CommunityConfig,
    owner: Address,
    salt: U256,
) -> Option<Address> {
    get_account_address_with_factory(config, owner, salt, None).await
}

/// Same as [`get_account_address`] but against an explicit factory entry
/// (used by vouchers, which may target a non-primary factory).
pub async fn get_account_address_with_factory(
    config: &CommunityConfig,
    owner: Address,
    salt: U256,
    factory_override: Option<Address>,
) -> Option<Address> {
    let result = async {
        let provider = community_provider(config)?;
        let factory_address = config.account_config(factory_override)?.account_factory_address;
        view(&provider, factory_address, factory::getAddressCall { owner, salt }).await
    }
    .await;

    match result {
        Ok(address) => Some(address),
        Err(e) => {
            warn!(owner = %owner, error = %e, "failed to resolve account address");
            None
        }
    }
}

/// Verify that `signature` over `message_hash` proves control of `account`.
///
/// Tries direct key recovery first (EOA-style), then the account's EIP-1271
/// `isValidSignature`, then falls back to `owner()` equality and Safe
/// `isOwner` membership for accounts that predate EIP-1271 support.
pub async fn verify_account_ownership(
    config: &CommunityConfig,
    account_address: Address,
    message_hash: B256,
    signature: &Bytes,
) -> bool {
    let Ok(parsed) = Signature::try_from(signature.as_ref()) else {
        warn!(account = %account_address, "malformed ownership signature");
        return false;
    };

    let recovered = match parsed.recover_address_from_msg(message_hash.as_slice()) {
        Ok(addr) => addr,
        Err(e) => {
            warn!(account = %account_address, error = %e, "signature recovery failed");
            return false;
        }
    };

    if recovered == account_address {
        return true;
    }

    let provider = match community_provider(config) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "failed to build provider for ownership check");
            return false;
        }
    };

    // Contract account: ask the account itself first.
    let eip1271 = view(
        &provider,
        account_address,
        account::isValidSignatureCall {
            hash: alloy_primitives::eip191_hash_message(message_hash.as_slice()),
            signature: signature.clone(),
        },
    )
    .await;
    match eip1271 {
        Ok(magic) if magic.as_slice() == EIP1271_MAGIC => return true,
        Ok(_) => {}
        Err(e) => {
            // isValidSignature not implemented; legacy accounts expose owner()
            warn!(account = %account_address, error = %e, "isValidSignature unavailable, falling back");
            match view(&provider, account_address, account::ownerCall {}).await {
                Ok(owner) if owner == recovered => return true,
                _ => {}
            }
        }
    }

    // Safe variant: the recovered key may be one of the Safe's owners.
    match view(&provider, account_address, safe::isOwnerCall { owner: recovered }).await {
        Ok(is_owner) => is_owner,
        Err(e) => {
            warn!(account = %account_address, error = %e, "ownership verification failed");
            false
        }
    }
}

/// Whether `account` holds `role` on the token contract. Errors count as
/// "no", matching the diagnostic use in the mint/burn pipeline.
pub async fn has_role(
    config: &CommunityConfig,
    token: Address,
    role: B256,
    account_address: Address,
) -> bool {
    let result = async {
        let provider = community_provider(config)?;
        view(&provider, token, access::hasRoleCall { role, account: account_address }).await
    }
    .await;

    match result {
        Ok(held) => held,
        Err(e) => {
            warn!(token = %token, account = %account_address, error = %e, "role check failed");
            false
        }
    }
}

/// Token balance of an account. Best-effort.
pub async fn get_account_balance(config: &CommunityConfig, address: Address) -> Option<U256> {
    let result = async {
        let provider = community_provider(config)?;
        let token = config.primary_token()?.address;
        view(&provider, token, erc20::balanceOfCall { account: address }).await
    }
    .await;

    match result {
        Ok(balance) => Some(balance),
        Err(e) => {
            warn!(address = %address, error = %e, "failed to fetch balance");
            None
        }
    }
}

/// Wait for a transaction to land with a success status. Best-effort bool;
/// polls once a second until `timeout`.
pub async fn wait_for_tx_success(
    config: &CommunityConfig,
    tx_hash: B256,
    timeout: std::time::Duration,
) -> bool {
    let provider = match community_provider(config) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "failed to build provider");
            return false;
        }
    };

    let poll = async {
        loop {
            match provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return receipt.status(),
                Ok(None) => {}
                Err(e) => {
                    warn!(tx_hash = %tx_hash, error = %e, "receipt fetch failed");
                }
            }
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        }
    };

    (tokio::time::timeout(timeout, poll).await).unwrap_or(false)
}

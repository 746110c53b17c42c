//! On-chain session lifecycle against the session manager module.

use alloy_primitives::{Address, B256, Bytes, Signature, U256};
use alloy_signer::Signer;
use chrono::Utc;
use cw_accounts::{community_provider, view};
use cw_bundler::BundlerService;
use cw_config::CommunityConfig;
use cw_core::CalldataBuilder;
use cw_core::abi::session_manager;
use tracing::debug;

use crate::error::SessionError;
use crate::hash::{session_request_hash, session_salt};

/// Window within which the provider must answer an incoming request.
const CHALLENGE_WINDOW_SECS: u64 = 120;

fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

fn calldata(config: &CommunityConfig) -> Result<CalldataBuilder, SessionError> {
    Ok(CalldataBuilder::new(config.primary_account_variant()?))
}

/// Submit a session request on-chain, sent from the provider sub-account.
/// The challenge window starts counting from now.
pub async fn submit_session_request<S: Signer + Sync>(
    config: &CommunityConfig,
    signer: &S,
    session_salt: B256,
    session_request_hash: B256,
    signed_session_request_hash: Bytes,
    signed_session_hash: Bytes,
    session_expiry: u64,
) -> Result<B256, SessionError> {
    let session = config.primary_session_config()?;
    let call_data = calldata(config)?.request_session(
        session.module_address,
        session_salt,
        session_request_hash,
        signed_session_request_hash,
        signed_session_hash,
        session_expiry,
        unix_now() + CHALLENGE_WINDOW_SECS,
    );
    let bundler = BundlerService::new(config)?;
    let hash = bundler
        .execute(signer, session.provider_address, call_data, None, None)
        .await?;
    Ok(hash)
}

/// Provider-side check of a pending request. Expiries are enforced before
/// any signature comparison; a request with valid signatures but a lapsed
/// challenge window still fails.
///
/// The provider attests the challenge value by re-signing the session hash
/// with its own key and comparing against what the requester stored.
pub async fn verify_incoming_session_request<S: Signer + Sync>(
    config: &CommunityConfig,
    signer: &S,
    request_hash: B256,
    session_hash: B256,
) -> Result<bool, SessionError> {
    let session = config.primary_session_config()?;
    let provider = community_provider(config)?;
    let stored = view(
        &provider,
        session.module_address,
        session_manager::sessionRequestsCall {
            provider: session.provider_address,
            sessionRequestHash: request_hash,
        },
    )
    .await?;

    let now = unix_now();
    let expiry = stored.expiry.to::<u64>();
    if expiry == 0 {
        return Err(SessionError::NotFound);
    }
    if expiry < now {
        return Err(SessionError::Expired);
    }
    if stored.challengeExpiry.to::<u64>() < now {
        return Err(SessionError::ChallengeExpired);
    }

    let signed = signer.sign_message(session_hash.as_slice()).await?;
    let matches = stored.signedSessionHash.as_ref() == signed.as_bytes();
    debug!(request_hash = %request_hash, matches, "incoming session request checked");
    Ok(matches)
}

/// Confirm a verified request on-chain, sent from the provider sub-account.
pub async fn confirm_session<S: Signer + Sync>(
    config: &CommunityConfig,
    signer: &S,
    request_hash: B256,
    session_hash: B256,
    signed_session_hash: Bytes,
) -> Result<B256, SessionError> {
    let session = config.primary_session_config()?;
    let call_data = calldata(config)?.confirm_session(
        session.module_address,
        request_hash,
        session_hash,
        signed_session_hash,
    );
    let bundler = BundlerService::new(config)?;
    let hash = bundler
        .execute(signer, session.provider_address, call_data, None, None)
        .await?;
    Ok(hash)
}

/// Revoke a session key. The operation is executed as the account being
/// revoked, so only that account (or its owner key) can do it.
pub async fn revoke_session<S: Signer + Sync>(
    config: &CommunityConfig,
    signer: &S,
    account: Address,
    session_owner: Address,
) -> Result<B256, SessionError> {
    let session = config.primary_session_config()?;
    let call_data = calldata(config)?.revoke_session(session.module_address, session_owner);
    let bundler = BundlerService::new(config)?;
    let hash = bundler.execute(signer, account, call_data, None, None).await?;
    Ok(hash)
}

/// Whether the session for `session_owner` on `account` has lapsed. The
/// on-chain answer is authoritative.
pub async fn is_session_expired(
    config: &CommunityConfig,
    account: Address,
    session_owner: Address,
) -> Result<bool, SessionError> {
    let session = config.primary_session_config()?;
    let provider = community_provider(config)?;
    let expired = view(
        &provider,
        session.module_address,
        session_manager::isExpiredCall { account, sessionOwner: session_owner },
    )
    .await?;
    Ok(expired)
}

/// Counterfactual address of the two-factor sub-account a provider gets for
/// a given salt.
pub async fn get_two_factor_address(
    config: &CommunityConfig,
    provider_account: Address,
    salt: B256,
) -> Result<Address, SessionError> {
    let session = config.primary_session_config()?;
    let provider = community_provider(config)?;
    let address = view(
        &provider,
        session.module_address,
        session_manager::getAddressCall {
            provider: provider_account,
            salt: U256::from_be_bytes(salt.0),
        },
    )
    .await?;
    Ok(address)
}

/// Pure signature check: was the request hash for `(source, type, expiry)`
/// signed by `session_owner`?
pub fn verify_session_request(
    config: &CommunityConfig,
    session_owner: Address,
    source: &str,
    session_type: &str,
    expiry: u64,
    signature: &[u8],
) -> Result<bool, SessionError> {
    let session = config.primary_session_config()?;
    let salt = session_salt(source, session_type);
    let request_hash = session_request_hash(session.provider_address, session_owner, salt, expiry);
    Ok(recovers_to(request_hash, signature, session_owner))
}

/// Pure signature check for the confirmation leg.
pub fn verify_session_confirm(
    session_owner: Address,
    session_hash: B256,
    signed_session_hash: &[u8],
) -> bool {
    recovers_to(session_hash, signed_session_hash, session_owner)
}

fn recovers_to(hash: B256, signature: &[u8], expected: Address) -> bool {
    let Ok(signature) = Signature::try_from(signature) else {
        return false;
    };
    signature
        .recover_address_from_msg(hash.as_slice())
        .is_ok_and(|recovered| recovered == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::session_hash;
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;

    fn signer() -> PrivateKeySigner {
        "4c0883a69102937d6231471b5dbb6204fe51296170827936ea5cce4b76994b0f"
            .parse::<PrivateKeySigner>()
            .unwrap()
    }

    #[test]
    fn confirm_verifies_a_signed_session_hash() {
        let signer = signer();
        let request_hash = session_request_hash(
            Address::ZERO,
            signer.address(),
            session_salt("+32478121212", "sms"),
            1746872952,
        );
        let hash = session_hash(request_hash, 123456);
        let signed = signer.sign_message_sync(hash.as_slice()).unwrap();

        assert!(verify_session_confirm(signer.address(), hash, &signed.as_bytes()));
        assert!(!verify_session_confirm(Address::ZERO, hash, &signed.as_bytes()));
        assert!(!verify_session_confirm(signer.address(), hash, &[0u8; 3]));
    }
}

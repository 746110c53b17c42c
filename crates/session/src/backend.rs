//! Session request flow against a community session backend.
//!
//! The backend fronts the provider: a POST opens a request and triggers the
//! out-of-band challenge, a PATCH answers it. The on-chain transactions are
//! the backend's job; the client only ever sees their hashes.

use alloy_primitives::{B256, Bytes};
use alloy_signer::Signer;
use chrono::Utc;
use cw_config::CommunityConfig;
use serde_json::json;
use tracing::info;

use crate::error::SessionError;
use crate::hash::{session_hash, session_request_hash, session_salt};

/// Sessions live for a year; the expiry is fixed at request time.
const SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct SessionRequestResult {
    pub tx_hash: B256,
    pub request_hash: B256,
}

fn backend_message(body: &serde_json::Value) -> Option<String> {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Open a session request: sign the request hash with the new session key
/// and hand it to the backend, which relays the challenge over `source`.
pub async fn send_session_request<S: Signer + Sync>(
    url: &str,
    config: &CommunityConfig,
    signer: &S,
    source: &str,
    session_type: &str,
) -> Result<SessionRequestResult, SessionError> {
    let session = config.primary_session_config()?;
    let owner = signer.address();
    let expiry = Utc::now().timestamp().max(0) as u64 + SESSION_TTL_SECS;

    let salt = session_salt(source, session_type);
    let request_hash = session_request_hash(session.provider_address, owner, salt, expiry);
    let signature = signer.sign_message(request_hash.as_slice()).await?;

    let body = json!({
        "provider": session.provider_address,
        "owner": owner,
        "source": source,
        "type": session_type,
        "expiry": expiry,
        "signature": Bytes::from(signature.as_bytes().to_vec()),
    });

    let response = reqwest::Client::new().post(url).json(&body).send().await?;
    let status = response.status();
    if status.as_u16() == 400 {
        return Err(SessionError::InvalidChallenge);
    }
    let payload: serde_json::Value = response.json().await.unwrap_or_default();
    if !status.is_success() {
        return Err(SessionError::Backend(
            backend_message(&payload).unwrap_or_else(|| format!("http status {status}")),
        ));
    }

    let tx_hash = payload
        .get("sessionRequestTxHash")
        .and_then(|v| v.as_str())
        .and_then(|v| v.parse::<B256>().ok())
        .ok_or_else(|| {
            SessionError::Backend(backend_message(&payload).unwrap_or_else(|| {
                "no request transaction hash; a challenge may already be pending for this source"
                    .to_string()
            }))
        })?;

    info!(owner = %owner, source, "session request sent");
    Ok(SessionRequestResult { tx_hash, request_hash })
}

/// Answer the challenge: derive the session hash from the received code,
/// sign it and PATCH the backend.
pub async fn confirm_session_request<S: Signer + Sync>(
    url: &str,
    config: &CommunityConfig,
    signer: &S,
    request_hash: B256,
    challenge: u64,
) -> Result<B256, SessionError> {
    let session = config.primary_session_config()?;
    let owner = signer.address();

    let hash = session_hash(request_hash, challenge);
    let signed_session_hash = signer.sign_message(hash.as_slice()).await?;

    let body = json!({
        "provider": session.provider_address,
        "owner": owner,
        "sessionRequestHash": request_hash,
        "sessionHash": hash,
        "signedSessionHash": Bytes::from(signed_session_hash.as_bytes().to_vec()),
    });

    let response = reqwest::Client::new().patch(url).json(&body).send().await?;
    let status = response.status();
    if status.as_u16() == 400 {
        return Err(SessionError::InvalidChallenge);
    }
    let payload: serde_json::Value = response.json().await.unwrap_or_default();
    if !status.is_success() {
        return Err(SessionError::Backend(
            backend_message(&payload).unwrap_or_else(|| format!("http status {status}")),
        ));
    }

    payload
        .get("sessionConfirmTxHash")
        .and_then(|v| v.as_str())
        .and_then(|v| v.parse::<B256>().ok())
        .ok_or_else(|| {
            SessionError::Backend(
                backend_message(&payload)
                    .unwrap_or_else(|| "no confirmation transaction hash".to_string()),
            )
        })
}
